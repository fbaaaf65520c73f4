// PDF output: replays a laid-out document onto printpdf pages

use log::debug;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::utils::calculate_points_for_circle;
use printpdf::*;
use std::io::BufWriter;

use crate::builder::Document;
use crate::canvas::{self, DrawOp, LinkHotspot, TextOp};
use crate::error::CvError;
use crate::metrics::{Font, ASCENT};

const LAYER_NAME: &str = "Layer 1";

/// Built-in fonts registered once per document.
struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Helvetica => &self.regular,
            Font::HelveticaBold => &self.bold,
        }
    }
}

/// Serializes `document` to PDF bytes, one PDF page per laid-out page.
pub fn render_pdf(document: &Document) -> Result<Vec<u8>, CvError> {
    let geometry = document.geometry;
    let page_width = Mm::from(Pt(geometry.width));
    let page_height = Mm::from(Pt(geometry.height));

    let (doc, page1, layer1) =
        PdfDocument::new(document.info.title.as_str(), page_width, page_height, LAYER_NAME);
    let doc = doc
        .with_author(document.info.author.as_str())
        .with_subject(document.info.subject.as_str())
        .with_keywords(document.info.keywords.clone());

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| CvError::PdfError(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| CvError::PdfError(e.to_string()))?,
    };

    for (index, page) in document.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (p, l) = doc.add_page(page_width, page_height, LAYER_NAME);
            doc.get_page(p).get_layer(l)
        };

        let flip = Flip(geometry.height);
        for op in &page.ops {
            match op {
                DrawOp::Text(text) => draw_text(&layer, &fonts, flip, text),
                DrawOp::Line {
                    from,
                    to,
                    color,
                    thickness,
                } => draw_line(&layer, flip, *from, *to, *color, *thickness),
                DrawOp::Dot {
                    cx,
                    cy,
                    radius,
                    color,
                } => draw_dot(&layer, flip, *cx, *cy, *radius, *color),
            }
        }
        for link in &page.links {
            add_link(&layer, flip, link);
        }
    }
    debug!(
        "Writing {} page(s) for {:?}",
        document.pages.len(),
        document.info.title
    );

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| CvError::PdfError(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| CvError::PdfError(e.to_string()))
}

// ============================================================================
// Drawing Utilities
// ============================================================================

/// Converts top-left based point coordinates to PDF's bottom-left origin.
#[derive(Clone, Copy)]
struct Flip(f32);

impl Flip {
    fn y(self, y: f32) -> f32 {
        self.0 - y
    }
}

fn pdf_color(color: canvas::Color) -> Color {
    Color::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

fn draw_text(layer: &PdfLayerReference, fonts: &Fonts, flip: Flip, text: &TextOp) {
    if text.text.is_empty() {
        return;
    }
    // Text ops carry their top edge; PDF positions the baseline.
    let baseline = flip.y(text.y + text.size * ASCENT);
    layer.set_fill_color(pdf_color(text.color));
    layer.use_text(
        text.text.as_str(),
        text.size,
        Mm::from(Pt(text.x)),
        Mm::from(Pt(baseline)),
        fonts.get(text.font),
    );
}

fn draw_line(
    layer: &PdfLayerReference,
    flip: Flip,
    from: (f32, f32),
    to: (f32, f32),
    color: canvas::Color,
    thickness: f32,
) {
    layer.set_outline_color(pdf_color(color));
    layer.set_outline_thickness(thickness);
    let points = vec![
        (Point::new(Mm::from(Pt(from.0)), Mm::from(Pt(flip.y(from.1)))), false),
        (Point::new(Mm::from(Pt(to.0)), Mm::from(Pt(flip.y(to.1)))), false),
    ];
    layer.add_line(Line {
        points,
        is_closed: false,
    });
}

fn draw_dot(layer: &PdfLayerReference, flip: Flip, cx: f32, cy: f32, radius: f32, color: canvas::Color) {
    layer.set_fill_color(pdf_color(color));
    let ring = calculate_points_for_circle(Pt(radius), Pt(cx), Pt(flip.y(cy)));
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}

fn add_link(layer: &PdfLayerReference, flip: Flip, link: &LinkHotspot) {
    let rect = Rect::new(
        Mm::from(Pt(link.x)),
        Mm::from(Pt(flip.y(link.y + link.height))),
        Mm::from(Pt(link.x + link.width)),
        Mm::from(Pt(flip.y(link.y))),
    );
    layer.add_link_annotation(LinkAnnotation::new(
        rect,
        Some(BorderArray::Solid([0.0, 0.0, 0.0])),
        Some(ColorArray::Transparent),
        Actions::uri(link.url.clone()),
        Some(HighlightingMode::Invert),
    ));
}
