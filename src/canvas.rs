// Canvas: page geometry, cursor, active text style and the recorded pages.
//
// Coordinates are PDF points with the origin at the top-left of the page
// and y growing downwards; the PDF writer flips them on output.

use log::{debug, warn};

use crate::error::CvError;
use crate::metrics::{self, Font, TextMetrics, ASCENT};
use crate::styled_run::{layout_run, Align, Fragment, RunLayout, Segment, StyledRun};

// ============================================================================
// Value types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const LINK_BLUE: Color = Color::rgb(0, 0, 255);
    pub const DARK_GREY: Color = Color::rgb(0x33, 0x33, 0x33);
    pub const META_GREY: Color = Color::rgb(0x44, 0x44, 0x44);
    pub const RULE_GREY: Color = Color::rgb(0xcc, 0xcc, 0xcc);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(m: f32) -> Self {
        Self {
            top: m,
            right: m,
            bottom: m,
            left: m,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Lowest y content may reach.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margins.bottom
    }
}

/// A text string placed with its top-left corner at (`x`, `y`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        thickness: f32,
    },
    /// Filled circle, used for list bullets.
    Dot {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },
}

/// Clickable rectangle bound to a URL, top-left based like everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkHotspot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
    pub links: Vec<LinkHotspot>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Text ops sharing a top edge, joined left to right, in top-to-bottom order.
    pub fn text_lines(&self) -> Vec<String> {
        let mut texts: Vec<&TextOp> = self.texts().collect();
        texts.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

        let mut lines: Vec<(f32, String)> = Vec::new();
        for t in texts {
            match lines.last_mut() {
                Some((y, line)) if (*y - t.y).abs() < 0.01 => line.push_str(&t.text),
                _ => lines.push((t.y, t.text.clone())),
            }
        }
        lines.into_iter().map(|(_, line)| line).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefectKind {
    InvalidHotspot,
    MalformedUrl,
    InvalidGeometry,
}

/// Something left out of the document without failing it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDefect {
    pub kind: DefectKind,
    pub detail: String,
}

/// Options for [`Canvas::draw_text`].
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    /// Wrap width; defaults to the room between the start x and the right margin.
    pub width: Option<f32>,
    pub align: Align,
    pub underline: bool,
    /// Hold this text and continue the next `draw_text` call on the same line.
    pub continued: bool,
    /// Flow mode only: shift the left edge right by this much.
    pub indent: f32,
    /// Keep the text on one line whatever its width. Alignment is ignored.
    pub no_wrap: bool,
}

#[derive(Debug, Clone)]
struct PendingRun {
    run: StyledRun,
    at: Option<(f32, f32)>,
    options: TextOptions,
}

// ============================================================================
// Canvas
// ============================================================================

/// The mutable drawing surface for one document. Owned by a single builder.
#[derive(Debug)]
pub struct Canvas {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
    font: Font,
    font_size: f32,
    fill: Color,
    pending: Option<PendingRun>,
    defects: Vec<LayoutDefect>,
}

impl Canvas {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            y: geometry.margins.top,
            font: Font::Helvetica,
            font_size: 12.0,
            fill: Color::BLACK,
            pending: None,
            defects: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn defects(&self) -> &[LayoutDefect] {
        &self.defects
    }

    pub fn current_y(&self) -> f32 {
        self.y
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn left(&self) -> f32 {
        self.geometry.margins.left
    }

    pub fn right(&self) -> f32 {
        self.geometry.width - self.geometry.margins.right
    }

    pub fn top(&self) -> f32 {
        self.geometry.margins.top
    }

    pub fn bottom(&self) -> f32 {
        self.geometry.content_bottom()
    }

    pub fn content_width(&self) -> f32 {
        self.geometry.content_width()
    }

    // ------------------------------------------------------------------------
    // Active style
    // ------------------------------------------------------------------------

    pub fn set_font(&mut self, font: Font) -> &mut Self {
        self.font = font;
        self
    }

    pub fn set_font_size(&mut self, size: f32) -> &mut Self {
        self.font_size = size;
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.fill = color;
        self
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn fill_color(&self) -> Color {
        self.fill
    }

    /// Measures `text` with the active font and size.
    pub fn measure(&self, text: &str, max_width: f32) -> TextMetrics {
        metrics::measure(self.font, self.font_size, text, max_width)
    }

    pub fn width_of(&self, text: &str) -> f32 {
        metrics::width_of(self.font, self.font_size, text)
    }

    pub fn line_height(&self) -> f32 {
        metrics::line_height(self.font_size)
    }

    // ------------------------------------------------------------------------
    // Cursor and pages
    // ------------------------------------------------------------------------

    /// Advances the cursor by `lines` lines of the active font size.
    pub fn move_down(&mut self, lines: f32) {
        self.y += lines * self.line_height();
    }

    /// Appends a fresh page and puts the cursor at its top margin.
    pub fn start_new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.top();
        debug!("Started page {}", self.pages.len());
    }

    /// Errors when the cursor can no longer be trusted.
    pub fn check_state(&self) -> Result<(), CvError> {
        if !self.y.is_finite() {
            return Err(CvError::CorruptState(format!("cursor y is {}", self.y)));
        }
        if self.pages.is_empty() {
            return Err(CvError::CorruptState("no current page".to_string()));
        }
        Ok(())
    }

    fn page_mut(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub(crate) fn record_defect(&mut self, kind: DefectKind, detail: impl Into<String>) {
        let detail = detail.into();
        warn!("{detail}");
        self.defects.push(LayoutDefect { kind, detail });
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Registers a hotspot on the current page. Degenerate rectangles are
    /// dropped and recorded as defects.
    pub fn add_link(&mut self, x: f32, y: f32, width: f32, height: f32, url: &str) -> bool {
        let valid = [x, y, width, height].iter().all(|v| v.is_finite()) && width > 0.0 && height > 0.0;
        if !valid {
            self.record_defect(
                DefectKind::InvalidHotspot,
                format!("Skipping link to {url}: invalid rectangle ({x}, {y}, {width}, {height})"),
            );
            return false;
        }
        self.page_mut().links.push(LinkHotspot {
            x,
            y,
            width,
            height,
            url: url.to_string(),
        });
        true
    }

    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, thickness: f32) {
        if ![from.0, from.1, to.0, to.1, thickness].iter().all(|v| v.is_finite()) {
            self.record_defect(DefectKind::InvalidGeometry, "Skipping line with non-finite coordinates");
            return;
        }
        self.page_mut().ops.push(DrawOp::Line {
            from,
            to,
            color,
            thickness,
        });
    }

    pub fn draw_dot(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if ![cx, cy, radius].iter().all(|v| v.is_finite()) || radius <= 0.0 {
            self.record_defect(DefectKind::InvalidGeometry, "Skipping bullet with invalid geometry");
            return;
        }
        self.page_mut().ops.push(DrawOp::Dot {
            cx,
            cy,
            radius,
            color,
        });
    }

    /// Draws `text` in the active style.
    ///
    /// With `at == None` the text flows from the cursor, wraps, breaks pages
    /// line by line, and the cursor ends below it. With explicit coordinates
    /// it is placed there and the cursor stays put. `continued` text is held
    /// and joined with the next call into one styled run.
    ///
    /// Returns the height drawn (0 while a run is being continued).
    pub fn draw_text(
        &mut self,
        text: &str,
        at: Option<(f32, f32)>,
        options: &TextOptions,
    ) -> Result<f32, CvError> {
        let mut segment = Segment::new(text, self.font, self.font_size, self.fill);
        segment.underline = options.underline;

        let pending = match self.pending.take() {
            Some(mut p) => {
                p.run.segments.push(segment);
                p
            }
            None => PendingRun {
                run: StyledRun::new().segment(segment),
                at,
                options: options.clone(),
            },
        };

        if options.continued {
            self.pending = Some(pending);
            return Ok(0.0);
        }
        let layout = self.draw_run(&pending.run, pending.at, &pending.options)?;
        Ok(layout.height)
    }

    /// Draws a whole styled run, flowing or absolutely placed like
    /// [`Canvas::draw_text`].
    pub fn draw_run(
        &mut self,
        run: &StyledRun,
        at: Option<(f32, f32)>,
        options: &TextOptions,
    ) -> Result<RunLayout, CvError> {
        self.check_state()?;

        let origin_x = match at {
            Some((x, _)) => x,
            None => self.left() + options.indent,
        };
        let layout = if options.no_wrap {
            layout_run(run, run.natural_width() + 1.0, Align::Left)
        } else {
            let width = options.width.unwrap_or(self.right() - origin_x);
            layout_run(run, width, options.align)
        };

        match at {
            Some((x, y)) => {
                if !x.is_finite() || !y.is_finite() {
                    self.record_defect(
                        DefectKind::InvalidGeometry,
                        format!("Skipping text at non-finite position ({x}, {y})"),
                    );
                    return Ok(layout);
                }
                for line in &layout.lines {
                    let top = y + line.offset_y;
                    for frag in &line.fragments {
                        self.emit_fragment(run, frag, x, top);
                    }
                }
            }
            None => {
                for line in &layout.lines {
                    if self.y + line.height > self.bottom() && self.y > self.top() {
                        self.start_new_page();
                    }
                    let top = self.y;
                    for frag in &line.fragments {
                        self.emit_fragment(run, frag, origin_x, top);
                    }
                    self.y += line.height;
                }
            }
        }
        Ok(layout)
    }

    fn emit_fragment(&mut self, run: &StyledRun, frag: &Fragment, origin_x: f32, top: f32) {
        let Some(seg) = run.segments.get(frag.segment) else {
            return;
        };
        let x = origin_x + frag.x;
        self.page_mut().ops.push(DrawOp::Text(TextOp {
            x,
            y: top,
            text: frag.text.clone(),
            font: seg.font,
            size: seg.size,
            color: seg.color,
        }));
        if seg.underline {
            let base = top + seg.size * ASCENT + seg.size * 0.1;
            self.draw_line((x, base), (x + frag.width, base), seg.color, seg.size / 20.0);
        }
    }

    /// Draws a bulleted list at the cursor in the active style. Items wrap
    /// under their own first line.
    pub fn draw_list(&mut self, items: &[String], list: &ListOptions) -> Result<(), CvError> {
        for (i, item) in items.iter().enumerate() {
            self.check_state()?;
            if i > 0 {
                self.y += list.paragraph_gap;
            }
            if self.y + self.line_height() > self.bottom() && self.y > self.top() {
                self.start_new_page();
            }
            let cx = self.left() + list.bullet_indent + list.bullet_radius;
            let cy = self.y + self.font_size * ASCENT * 0.65;
            let color = self.fill;
            self.draw_dot(cx, cy, list.bullet_radius, color);

            let options = TextOptions {
                indent: list.text_indent,
                align: list.align,
                ..TextOptions::default()
            };
            self.draw_text(item, None, &options)?;
        }
        Ok(())
    }

    /// Hands back the finished pages and every recorded defect.
    pub fn finish(mut self) -> Result<(Vec<Page>, Vec<LayoutDefect>), CvError> {
        if let Some(pending) = self.pending.take() {
            self.draw_run(&pending.run, pending.at, &pending.options)?;
        }
        self.check_state()?;
        Ok((self.pages, self.defects))
    }
}

/// Bullet list geometry.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub bullet_radius: f32,
    pub bullet_indent: f32,
    /// Left edge of item text, relative to the left margin.
    pub text_indent: f32,
    pub paragraph_gap: f32,
    pub align: Align,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            bullet_radius: 1.5,
            bullet_indent: 0.0,
            text_indent: 15.0,
            paragraph_gap: 2.0,
            align: Align::Justify,
        }
    }
}
