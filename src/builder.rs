// Document builder: header, contact line and sections in their fixed order

use log::{debug, warn};

use crate::canvas::{Canvas, Color, LayoutDefect, Page, PageGeometry, TextOptions};
use crate::config::LayoutConfig;
use crate::contact::render_contact_line;
use crate::error::CvError;
use crate::metrics::Font;
use crate::profile::ProfileData;
use crate::sections::{
    render_education, render_experience, render_projects, render_skills, render_summary,
    FONT_SIZE_BODY, SPACING_AFTER_TITLE,
};
use crate::styled_run::Align;

// ============================================================================
// Constants
// ============================================================================

const FONT_SIZE_NAME: f32 = 24.0;
const FONT_SIZE_SUBTITLE: f32 = 13.0;
const FONT_SIZE_CONTACT: f32 = 10.0;

const SPACING_HEADER: f32 = 0.5;

const RULE_THICKNESS: f32 = 0.5;

const MISSING_NAME: &str = "Name Missing";

// ============================================================================
// Data Structures
// ============================================================================

/// Metadata written into the PDF info dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: Vec<String>,
}

impl DocumentInfo {
    pub fn for_profile(profile: &ProfileData) -> Self {
        let name = non_blank(profile.user.full_name.as_deref()).unwrap_or(MISSING_NAME);
        let target = non_blank(profile.target_job_title.as_deref());

        let mut keywords = vec!["CV".to_string(), "Resume".to_string()];
        keywords.extend(target.map(str::to_string));
        keywords.extend(
            profile
                .skills
                .iter()
                .filter_map(|s| non_blank(Some(s.skill_name.as_str())))
                .map(str::to_string),
        );

        Self {
            title: match target {
                Some(t) => format!("{name} - {t}"),
                None => format!("{name} - CV"),
            },
            author: name.to_string(),
            subject: match target {
                Some(t) => format!("CV for {t}"),
                None => "Curriculum Vitae".to_string(),
            },
            keywords,
        }
    }
}

/// A laid-out CV: every page's drawing operations and link hotspots, ready
/// for the PDF writer.
#[derive(Debug, Clone)]
pub struct Document {
    pub info: DocumentInfo,
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    /// Items that were left out without failing the document.
    pub defects: Vec<LayoutDefect>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// Layout
// ============================================================================

/// Lays out a whole CV.
///
/// Order is fixed: name, subtitle, contact line, rule, summary, experience,
/// education, skills, projects. Empty collections leave no trace.
pub fn layout_document(profile: &ProfileData, config: &LayoutConfig) -> Result<Document, CvError> {
    config.validate()?;
    let geometry = config.geometry();
    let mut canvas = Canvas::new(geometry);

    draw_header(&mut canvas, profile)?;
    render_contact_line(&mut canvas, &profile.user, FONT_SIZE_CONTACT)?;
    draw_rule(&mut canvas);

    let label = config.ongoing_label.as_str();
    render_summary(&mut canvas, profile)?;
    render_experience(&mut canvas, &profile.experience, label)?;
    render_education(&mut canvas, &profile.education, label)?;
    render_skills(&mut canvas, &profile.skills)?;
    render_projects(&mut canvas, &profile.projects, label)?;

    let (pages, defects) = canvas.finish()?;
    if !defects.is_empty() {
        warn!("Layout finished with {} defect(s)", defects.len());
    }
    debug!("Laid out {} page(s)", pages.len());

    Ok(Document {
        info: DocumentInfo::for_profile(profile),
        geometry,
        pages,
        defects,
    })
}

fn draw_header(canvas: &mut Canvas, profile: &ProfileData) -> Result<(), CvError> {
    let centered = TextOptions {
        align: Align::Center,
        width: Some(canvas.content_width()),
        ..TextOptions::default()
    };

    let name = non_blank(profile.user.full_name.as_deref()).unwrap_or(MISSING_NAME);
    canvas
        .set_font(Font::HelveticaBold)
        .set_font_size(FONT_SIZE_NAME)
        .set_fill_color(Color::BLACK);
    canvas.draw_text(name, None, &centered)?;
    canvas.move_down(SPACING_HEADER / 2.0);

    match non_blank(profile.target_job_title.as_deref()) {
        Some(title) => {
            canvas
                .set_font(Font::Helvetica)
                .set_font_size(FONT_SIZE_SUBTITLE)
                .set_fill_color(Color::DARK_GREY);
            canvas.draw_text(title, None, &centered)?;
            canvas.move_down(SPACING_HEADER);
        }
        None => canvas.move_down(SPACING_HEADER / 2.0),
    }
    Ok(())
}

/// Thin grey rule across the content width, separating header from body.
fn draw_rule(canvas: &mut Canvas) {
    canvas
        .set_font(Font::Helvetica)
        .set_font_size(FONT_SIZE_CONTACT)
        .set_fill_color(Color::BLACK);
    canvas.move_down(SPACING_HEADER * 1.5);
    let y = canvas.current_y();
    canvas.draw_line(
        (canvas.left(), y),
        (canvas.right(), y),
        Color::RULE_GREY,
        RULE_THICKNESS,
    );
    canvas.move_down(SPACING_AFTER_TITLE);
    canvas.set_font_size(FONT_SIZE_BODY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawOp;
    use crate::profile::{Skill, UserProfile};

    fn profile() -> ProfileData {
        ProfileData {
            user: UserProfile {
                full_name: Some("Johnny Full".to_string()),
                email: Some("johnny@example.com".to_string()),
                ..UserProfile::default()
            },
            skills: vec![Skill {
                skill_name: "Rust".to_string(),
                category: None,
            }],
            target_job_title: Some("Backend Engineer".to_string()),
            ..ProfileData::default()
        }
    }

    #[test]
    fn test_document_info_with_target_title() {
        let info = DocumentInfo::for_profile(&profile());
        assert_eq!(info.title, "Johnny Full - Backend Engineer");
        assert_eq!(info.author, "Johnny Full");
        assert_eq!(info.subject, "CV for Backend Engineer");
        assert_eq!(info.keywords, vec!["CV", "Resume", "Backend Engineer", "Rust"]);
    }

    #[test]
    fn test_document_info_without_name_or_title() {
        let info = DocumentInfo::for_profile(&ProfileData::default());
        assert_eq!(info.title, "Name Missing - CV");
        assert_eq!(info.subject, "Curriculum Vitae");
        assert_eq!(info.keywords, vec!["CV", "Resume"]);
    }

    #[test]
    fn test_header_order() {
        let doc = layout_document(&profile(), &LayoutConfig::default()).unwrap();
        let lines = doc.pages[0].text_lines();
        assert_eq!(lines[0], "Johnny Full");
        assert_eq!(lines[1], "Backend Engineer");
        assert_eq!(lines[2], "johnny@example.com");
        // The summary section is titled with the target job title.
        assert_eq!(lines[3], "Backend Engineer");
        assert_eq!(lines[4], "Skills");
    }

    #[test]
    fn test_rule_spans_content_width() {
        let doc = layout_document(&profile(), &LayoutConfig::default()).unwrap();
        let rule = doc.pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Line { from, to, color, .. } if *color == Color::RULE_GREY => Some((*from, *to)),
                _ => None,
            })
            .unwrap();
        assert_eq!(rule.0 .0, 50.0);
        assert!((rule.1 .0 - (595.28 - 50.0)).abs() < 0.001);
        assert_eq!(rule.0 .1, rule.1 .1);
    }

    #[test]
    fn test_name_is_centered() {
        let doc = layout_document(&profile(), &LayoutConfig::default()).unwrap();
        let name = doc.pages[0].texts().next().unwrap();
        let width = crate::metrics::width_of(name.font, name.size, &name.text);
        let center = name.x + width / 2.0;
        assert!((center - 595.28 / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_invalid_margin_is_rejected() {
        let config = LayoutConfig {
            margin: 400.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            layout_document(&profile(), &config),
            Err(CvError::ConfigError(_))
        ));
    }
}
