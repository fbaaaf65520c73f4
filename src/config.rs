// Page-level layout configuration

use clap::ValueEnum;

use crate::canvas::{Margins, PageGeometry};
use crate::dates::DEFAULT_ONGOING_LABEL;
use crate::error::CvError;

/// A4 dimensions in points
const A4_WIDTH_PT: f32 = 595.28;
const A4_HEIGHT_PT: f32 = 841.89;

/// US Letter dimensions in points
const LETTER_WIDTH_PT: f32 = 612.0;
const LETTER_HEIGHT_PT: f32 = 792.0;

/// Standard margin on all four sides
pub const DEFAULT_MARGIN_PT: f32 = 50.0;

/// Smallest content box side a margin may leave
const MIN_CONTENT_PT: f32 = 144.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    /// Width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (A4_WIDTH_PT, A4_HEIGHT_PT),
            PaperSize::Letter => (LETTER_WIDTH_PT, LETTER_HEIGHT_PT),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub paper: PaperSize,
    pub margin: f32,
    pub ongoing_label: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            margin: DEFAULT_MARGIN_PT,
            ongoing_label: DEFAULT_ONGOING_LABEL.to_string(),
        }
    }
}

impl LayoutConfig {
    /// Rejects margins that leave no usable content area.
    pub fn validate(&self) -> Result<(), CvError> {
        let (width, height) = self.paper.dimensions();
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(CvError::ConfigError(format!("margin must be >= 0, got {}", self.margin)));
        }
        let min_side = width.min(height);
        if min_side - 2.0 * self.margin < MIN_CONTENT_PT {
            return Err(CvError::ConfigError(format!(
                "margin {} leaves less than {MIN_CONTENT_PT}pt of content",
                self.margin
            )));
        }
        Ok(())
    }

    pub fn geometry(&self) -> PageGeometry {
        let (width, height) = self.paper.dimensions();
        PageGeometry {
            width,
            height,
            margins: Margins::uniform(self.margin),
        }
    }
}
