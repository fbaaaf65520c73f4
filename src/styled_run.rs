//! Styled runs: one logical line built from differently styled segments.
//!
//! A run is a plain value. Every segment but the last is "continued": the
//! next segment starts where the previous one stopped instead of on a new
//! line. [`layout_run`] turns a run into positioned fragments, wrapping when
//! the available width runs out; the canvas then draws those fragments.

use log::warn;

use crate::canvas::Color;
use crate::metrics::{line_height, width_of, Font};

/// Smallest width budget a continued segment is ever given.
pub const MIN_SEGMENT_WIDTH: f32 = 20.0;

/// One styled piece of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub color: Color,
    pub underline: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, font: Font, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            font,
            size,
            color,
            underline: false,
        }
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// Ordered segments drawn left to right as one logical line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledRun {
    pub segments: Vec<Segment>,
}

impl StyledRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn text(self, text: impl Into<String>, font: Font, size: f32, color: Color) -> Self {
        self.segment(Segment::new(text, font, size, color))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text.is_empty())
    }

    /// Sum of the unwrapped widths of all segments.
    pub fn natural_width(&self) -> f32 {
        self.segments
            .iter()
            .map(|s| width_of(s.font, s.size, &s.text))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    /// Stretch inter-word gaps to the full width; a paragraph's last line stays left-aligned.
    Justify,
}

/// A contiguous piece of one segment on one line. `x` is relative to the run origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub segment: usize,
    pub text: String,
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLine {
    pub fragments: Vec<Fragment>,
    /// Offset of the line's top from the run's top.
    pub offset_y: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLayout {
    pub lines: Vec<RunLine>,
    /// Width each segment was allowed on the line it started on.
    pub budgets: Vec<f32>,
    pub height: f32,
}

#[derive(Debug)]
struct Piece {
    segment: usize,
    gap: String,
    word: String,
    x: f32,
    width: f32,
}

#[derive(Debug, Default)]
struct LineBuf {
    pieces: Vec<Piece>,
    height: f32,
    paragraph_end: bool,
    /// Ended because the next word didn't fit.
    wrapped: bool,
}

impl LineBuf {
    fn end_x(&self) -> f32 {
        self.pieces.last().map_or(0.0, |p| p.x + p.width)
    }
}

/// Splits a paragraph into (preceding whitespace, word) tokens. Trailing
/// whitespace becomes a token with an empty word.
fn tokenize(paragraph: &str) -> Vec<(String, String)> {
    let mut tokens = Vec::new();
    let mut gap = String::new();
    let mut word = String::new();
    for c in paragraph.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                tokens.push((std::mem::take(&mut gap), std::mem::take(&mut word)));
            }
            gap.push(' ');
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() || !gap.is_empty() {
        tokens.push((gap, word));
    }
    tokens
}

/// Lays a run out inside `total_width`.
///
/// The first segment gets the whole width. Each later segment's budget is
/// the width left after the natural widths of the segments before it,
/// clamped to [`MIN_SEGMENT_WIDTH`]. A segment's first line ends at its
/// budget; lines it wraps onto get the full width again.
pub fn layout_run(run: &StyledRun, total_width: f32, align: Align) -> RunLayout {
    let total = if total_width.is_finite() && total_width > 0.0 {
        total_width
    } else {
        warn!("Invalid run width {total_width}, laying out without wrapping");
        run.natural_width().max(MIN_SEGMENT_WIDTH)
    };

    let mut budgets = Vec::with_capacity(run.segments.len());
    let mut lines: Vec<LineBuf> = Vec::new();
    let mut line = LineBuf::default();
    let mut consumed = 0.0_f32;
    // The current line was started by a wrap, so it drops leading whitespace.
    let mut continuation = false;

    for (idx, seg) in run.segments.iter().enumerate() {
        let budget = if idx == 0 {
            total
        } else {
            (total - consumed).max(MIN_SEGMENT_WIDTH)
        };
        budgets.push(budget);
        consumed += width_of(seg.font, seg.size, &seg.text);

        let seg_height = line_height(seg.size);
        let mut limit = (line.end_x() + budget).min(total);
        line.height = line.height.max(seg_height);

        for (p_idx, paragraph) in seg.text.split('\n').enumerate() {
            if p_idx > 0 {
                line.paragraph_end = true;
                lines.push(std::mem::take(&mut line));
                line.height = seg_height;
                limit = total;
                continuation = false;
            }
            for (gap, word) in tokenize(paragraph) {
                let gap_width = width_of(seg.font, seg.size, &gap);
                let word_width = width_of(seg.font, seg.size, &word);
                let pen = line.end_x();

                if word.is_empty() {
                    let at_line_start = line.pieces.is_empty();
                    if (at_line_start && !continuation) || (!at_line_start && pen + gap_width <= limit) {
                        line.pieces.push(Piece {
                            segment: idx,
                            gap,
                            word,
                            x: pen,
                            width: gap_width,
                        });
                    }
                    continue;
                }

                if line.pieces.is_empty() {
                    let (gap, width) = if continuation {
                        (String::new(), word_width)
                    } else {
                        (gap, gap_width + word_width)
                    };
                    line.pieces.push(Piece {
                        segment: idx,
                        gap,
                        word,
                        x: 0.0,
                        width,
                    });
                } else if pen + gap_width + word_width <= limit + f32::EPSILON {
                    line.pieces.push(Piece {
                        segment: idx,
                        gap,
                        word,
                        x: pen,
                        width: gap_width + word_width,
                    });
                } else {
                    line.wrapped = true;
                    lines.push(std::mem::take(&mut line));
                    line.height = seg_height;
                    limit = total;
                    continuation = true;
                    line.pieces.push(Piece {
                        segment: idx,
                        gap: String::new(),
                        word,
                        x: 0.0,
                        width: word_width,
                    });
                }
            }
        }
    }
    line.paragraph_end = true;
    lines.push(line);

    while lines.last().is_some_and(|l| l.pieces.is_empty()) {
        lines.pop();
    }

    let mut offset_y = 0.0_f32;
    let mut out = Vec::with_capacity(lines.len());
    for mut buf in lines {
        if buf.wrapped {
            while buf.pieces.last().is_some_and(|p| p.word.is_empty()) {
                buf.pieces.pop();
            }
        }
        let fragments = place_fragments(&buf, total, align);
        out.push(RunLine {
            fragments,
            offset_y,
            height: buf.height,
        });
        offset_y += buf.height;
    }

    RunLayout {
        lines: out,
        budgets,
        height: offset_y,
    }
}

fn place_fragments(line: &LineBuf, total: f32, align: Align) -> Vec<Fragment> {
    let used = line.end_x();
    let slack = (total - used).max(0.0);

    if align == Align::Justify && !line.paragraph_end {
        let gaps = line
            .pieces
            .iter()
            .skip(1)
            .filter(|p| !p.gap.is_empty() && !p.word.is_empty())
            .count();
        if gaps > 0 {
            let extra = slack / gaps as f32;
            let mut shift = 0.0_f32;
            return line
                .pieces
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    if i > 0 && !p.gap.is_empty() && !p.word.is_empty() {
                        shift += extra;
                    }
                    Fragment {
                        segment: p.segment,
                        text: format!("{}{}", p.gap, p.word),
                        x: p.x + shift,
                        width: p.width,
                    }
                })
                .collect();
        }
    }

    let offset = match align {
        Align::Left | Align::Justify => 0.0,
        Align::Center => slack / 2.0,
        Align::Right => slack,
    };

    let mut fragments: Vec<Fragment> = Vec::new();
    for p in &line.pieces {
        match fragments.last_mut() {
            Some(f) if f.segment == p.segment => {
                f.text.push_str(&p.gap);
                f.text.push_str(&p.word);
                f.width += p.width;
            }
            _ => fragments.push(Fragment {
                segment: p.segment,
                text: format!("{}{}", p.gap, p.word),
                x: p.x + offset,
                width: p.width,
            }),
        }
    }
    fragments
}
