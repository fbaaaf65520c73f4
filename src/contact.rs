//! Contact line under the name: location, email, phone, portfolio.
//!
//! Items go on one centered line when the whole line fits. Otherwise they
//! are laid out left-aligned and wrap between items. Centering needs the
//! full width up front, which only holds for a single line, so the choice
//! is made once from a probe of the joined text and then rendered by the
//! matching renderer.

use log::info;

use crate::canvas::{Canvas, Color, DefectKind, TextOptions};
use crate::error::CvError;
use crate::links::{mailto, normalize_url};
use crate::metrics::{self, Font};
use crate::profile::UserProfile;

/// Separator drawn between contact items.
pub const CONTACT_SEPARATOR: &str = "  |  ";

/// Label shown in place of the portfolio URL.
pub const PORTFOLIO_LABEL: &str = "Portfolio";

/// A probe taller than this many font sizes has wrapped.
const WRAP_DETECT_FACTOR: f32 = 1.3;

#[derive(Debug, Clone, PartialEq)]
pub struct ContactItem {
    pub text: String,
    pub link: Option<String>,
}

/// Where one item (and the separator after it, if any) lands.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub separator_x: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CenteredLine {
    pub items: Vec<PlacedItem>,
    /// Cursor position once the line is drawn.
    pub end_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLines {
    pub items: Vec<PlacedItem>,
    pub line_count: usize,
    pub end_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactLayout {
    Centered(CenteredLine),
    Wrapped(WrappedLines),
}

/// Builds the items in their fixed order. The second value names a
/// portfolio link that was dropped because it didn't parse.
pub fn contact_items(user: &UserProfile) -> (Vec<ContactItem>, Option<String>) {
    let mut items = Vec::new();
    let mut rejected = None;
    let present = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(location) = present(&user.location) {
        items.push(ContactItem {
            text: location,
            link: None,
        });
    }
    if let Some(email) = present(&user.email) {
        items.push(ContactItem {
            link: Some(mailto(&email)),
            text: email,
        });
    }
    if let Some(phone) = present(&user.phone_number) {
        items.push(ContactItem {
            text: phone,
            link: None,
        });
    }
    if let Some(portfolio) = present(&user.portfolio_link) {
        let link = normalize_url(&portfolio);
        if link.is_none() {
            rejected = Some(portfolio);
        }
        items.push(ContactItem {
            text: PORTFOLIO_LABEL.to_string(),
            link,
        });
    }
    (items, rejected)
}

/// Picks centered or wrapped layout and positions every item.
///
/// `left` and `available_width` describe the content box; `page_width` is
/// used for centering.
pub fn plan_contact_layout(
    items: &[ContactItem],
    font: Font,
    size: f32,
    left: f32,
    available_width: f32,
    page_width: f32,
    start_y: f32,
) -> ContactLayout {
    let probe = items
        .iter()
        .map(|i| i.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTACT_SEPARATOR);
    let probe_metrics = metrics::measure(font, size, &probe, available_width);
    let wrapped = probe_metrics.height > size * WRAP_DETECT_FACTOR
        || probe_metrics.width > available_width;

    let sep_width = metrics::width_of(font, size, CONTACT_SEPARATOR);
    let last = items.len().saturating_sub(1);

    if !wrapped {
        let mut x = (page_width - probe_metrics.width) / 2.0;
        let mut placed = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let width = metrics::width_of(font, size, &item.text);
            let separator_x = (index < last).then_some(x + width);
            placed.push(PlacedItem {
                index,
                x,
                y: start_y,
                width,
                separator_x,
            });
            x += width + if index < last { sep_width } else { 0.0 };
        }
        return ContactLayout::Centered(CenteredLine {
            items: placed,
            end_y: start_y + probe_metrics.height,
        });
    }

    let line_h = metrics::line_height(size);
    let mut x = left;
    let mut y = start_y;
    let mut line_count = 1;
    let mut placed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let width = metrics::width_of(font, size, &item.text);
        let with_sep = width + if index < last { sep_width } else { 0.0 };
        if x != left && x + with_sep > left + available_width {
            x = left;
            y += line_h;
            line_count += 1;
        }
        let separator_x = (index < last).then_some(x + width);
        placed.push(PlacedItem {
            index,
            x,
            y,
            width,
            separator_x,
        });
        x += with_sep;
    }
    ContactLayout::Wrapped(WrappedLines {
        items: placed,
        line_count,
        end_y: y + line_h,
    })
}

/// Draws the contact line at the cursor and leaves the cursor below it.
pub fn render_contact_line(
    canvas: &mut Canvas,
    user: &UserProfile,
    size: f32,
) -> Result<ContactLayout, CvError> {
    canvas.check_state()?;
    let (items, rejected) = contact_items(user);
    if let Some(raw) = rejected {
        canvas.record_defect(
            DefectKind::MalformedUrl,
            format!("Dropping portfolio link, not a valid URL: {raw:?}"),
        );
    }

    canvas
        .set_font(Font::Helvetica)
        .set_font_size(size)
        .set_fill_color(Color::BLACK);
    let layout = plan_contact_layout(
        &items,
        Font::Helvetica,
        size,
        canvas.left(),
        canvas.content_width(),
        canvas.geometry().width,
        canvas.current_y(),
    );

    match &layout {
        ContactLayout::Centered(line) => {
            draw_items(canvas, &items, &line.items, size, false)?;
            canvas.set_y(line.end_y);
        }
        ContactLayout::Wrapped(lines) => {
            info!(
                "Contact line too wide to center, wrapping over {} lines",
                lines.line_count
            );
            draw_items(canvas, &items, &lines.items, size, true)?;
            canvas.set_y(lines.end_y);
        }
    }
    canvas.set_fill_color(Color::BLACK);
    Ok(layout)
}

fn draw_items(
    canvas: &mut Canvas,
    items: &[ContactItem],
    placed: &[PlacedItem],
    size: f32,
    underline_links: bool,
) -> Result<(), CvError> {
    let plain = TextOptions {
        no_wrap: true,
        ..TextOptions::default()
    };
    let hotspot_height = if underline_links {
        metrics::line_height(size)
    } else {
        size
    };

    for p in placed {
        let Some(item) = items.get(p.index) else {
            continue;
        };
        match &item.link {
            Some(url) => {
                canvas.set_fill_color(Color::LINK_BLUE);
                let options = TextOptions {
                    underline: underline_links,
                    ..plain.clone()
                };
                canvas.draw_text(&item.text, Some((p.x, p.y)), &options)?;
                canvas.add_link(p.x, p.y, p.width, hotspot_height, url);
            }
            None => {
                canvas.set_fill_color(Color::BLACK);
                canvas.draw_text(&item.text, Some((p.x, p.y)), &plain)?;
            }
        }
        if let Some(sep_x) = p.separator_x {
            canvas.set_fill_color(Color::BLACK);
            canvas.draw_text(CONTACT_SEPARATOR, Some((sep_x, p.y)), &plain)?;
        }
    }
    Ok(())
}
