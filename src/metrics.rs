//! Static font metrics for the two built-in PDF faces the CV uses.
//!
//! Widths come from the Adobe Core 14 AFM files and are in 1/1000 em.
//! Tables cover ASCII 0x20..=0x7E; index = (char as usize) - 32.
//! Everything here is a pure function of (font, size, text, width).

use log::warn;

/// Helvetica ascender, as a fraction of the font size.
pub const ASCENT: f32 = 0.718;

/// Ascender + descender + line gap of Helvetica, as a fraction of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.156;

/// The built-in faces available to the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

/// Natural width and wrapped height of a string, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

struct WidthTable {
    widths: [u16; 95],
    /// Used for anything outside printable ASCII.
    fallback: u16,
}

#[rustfmt::skip]
static HELVETICA: WidthTable = WidthTable {
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n-z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    fallback: 556,
};

#[rustfmt::skip]
static HELVETICA_BOLD: WidthTable = WidthTable {
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A-M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a-m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n-z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    fallback: 611,
};

fn table(font: Font) -> &'static WidthTable {
    match font {
        Font::Helvetica => &HELVETICA,
        Font::HelveticaBold => &HELVETICA_BOLD,
    }
}

fn char_units(font: Font, c: char) -> u16 {
    let t = table(font);
    let c = if c == '\t' { ' ' } else { c };
    let code = c as usize;
    if (32..=126).contains(&code) {
        t.widths[code - 32]
    } else {
        t.fallback
    }
}

/// Unwrapped rendered width of `text` in points. Newlines are ignored.
pub fn width_of(font: Font, size: f32, text: &str) -> f32 {
    let units: u32 = text
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| char_units(font, c) as u32)
        .sum();
    units as f32 / 1000.0 * size
}

/// Height of one line of text at `size`.
pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR
}

/// Greedy word wrap. Explicit newlines always break; a word wider than
/// `max_width` gets a line to itself rather than being split.
///
/// A non-finite or non-positive `max_width` disables wrapping.
pub fn wrap_lines(font: Font, size: f32, text: &str, max_width: f32) -> Vec<String> {
    let limit = if max_width.is_finite() && max_width > 0.0 {
        max_width
    } else {
        warn!("Invalid wrap width {max_width}, measuring without wrapping");
        f32::INFINITY
    };
    if text.is_empty() {
        return Vec::new();
    }

    let space = width_of(font, size, " ");
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0_f32;
        for word in paragraph.split_whitespace() {
            let word_width = width_of(font, size, word);
            if line.is_empty() {
                line.push_str(word);
                line_width = word_width;
            } else if line_width + space + word_width > limit {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_width = word_width;
            } else {
                line.push(' ');
                line.push_str(word);
                line_width += space + word_width;
            }
        }
        lines.push(line);
    }
    lines
}

/// Natural width plus the height `text` occupies when wrapped at `max_width`.
pub fn measure(font: Font, size: f32, text: &str, max_width: f32) -> TextMetrics {
    let width = text
        .split('\n')
        .map(|p| width_of(font, size, p))
        .fold(0.0_f32, f32::max);
    let lines = wrap_lines(font, size, text, max_width).len();
    TextMetrics {
        width,
        height: lines as f32 * line_height(size),
    }
}
