// Page break guard: decide before drawing whether a block still fits.

use log::debug;

use crate::canvas::Canvas;
use crate::error::CvError;

/// Slack kept between the last block and the bottom margin.
pub const BREAK_BUFFER: f32 = 2.0;

/// Starts a new page when `estimated_height` (plus [`BREAK_BUFFER`]) would
/// run past the bottom margin. Returns whether a page was added.
///
/// Heights are estimates; a block taller than a whole page still overflows
/// and is not retried.
pub fn ensure_space(canvas: &mut Canvas, estimated_height: f32) -> Result<bool, CvError> {
    let bottom_margin = canvas.geometry().margins.bottom;
    ensure_space_above(canvas, estimated_height, bottom_margin)
}

/// [`ensure_space`] against an explicit bottom margin.
pub fn ensure_space_above(
    canvas: &mut Canvas,
    estimated_height: f32,
    bottom_margin: f32,
) -> Result<bool, CvError> {
    canvas.check_state()?;
    if !estimated_height.is_finite() || !bottom_margin.is_finite() {
        return Err(CvError::CorruptState(format!(
            "page break check with height {estimated_height} and margin {bottom_margin}"
        )));
    }

    let page_bottom = canvas.geometry().height - bottom_margin;
    if canvas.current_y() + estimated_height + BREAK_BUFFER > page_bottom {
        debug!(
            "Page break: y {:.1} + {:.1} exceeds {:.1}",
            canvas.current_y(),
            estimated_height,
            page_bottom
        );
        canvas.start_new_page();
        return Ok(true);
    }
    Ok(false)
}
