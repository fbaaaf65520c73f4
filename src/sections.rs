// Section rendering: titles, dated item headings, bullet lists

use crate::canvas::{Canvas, Color, DefectKind, ListOptions, TextOptions};
use crate::dates::format_date_range;
use crate::error::CvError;
use crate::links::normalize_url;
use crate::metrics::Font;
use crate::page_break::{ensure_space, BREAK_BUFFER};
use crate::profile::{Education, Project, ProfileData, Skill, WorkExperience};
use crate::styled_run::{Align, StyledRun, MIN_SEGMENT_WIDTH};

// ============================================================================
// Constants
// ============================================================================

/// Font sizes in points
pub const FONT_SIZE_BODY: f32 = 10.0;
pub const FONT_SIZE_ITEM_TITLE: f32 = 12.0;
pub const FONT_SIZE_META: f32 = 9.0;
pub const FONT_SIZE_SECTION_TITLE: f32 = 14.0;

/// Vertical spacing, in lines of the active font size
const SPACING_BEFORE_TITLE: f32 = 1.0;
pub const SPACING_AFTER_TITLE: f32 = 0.5;
const SPACING_ITEM: f32 = 0.8;
const SPACING_SECTION_GAP: f32 = 1.5;
const SPACING_AFTER_LAST_ITEM: f32 = SPACING_SECTION_GAP - SPACING_ITEM;
const SPACING_IN_ITEM: f32 = 0.3;

/// Rough height of a section title line, used before it is drawn
const SECTION_TITLE_LINE_ESTIMATE: f32 = FONT_SIZE_SECTION_TITLE * 1.2;

/// Estimated height of an item heading plus its first body line
pub const SUBHEADING_BREAK_CHECK_HEIGHT: f32 = FONT_SIZE_ITEM_TITLE * 1.3 + FONT_SIZE_BODY * 1.3;

/// Gap between an item heading and its right-aligned date
const HEADING_DATE_GAP: f32 = 10.0;

const DEFAULT_SKILL_CATEGORY: &str = "Technical Skills";

// ============================================================================
// Shared pieces
// ============================================================================

/// Draws a section title with more room above than below, moving to a new
/// page first when the title and a little content wouldn't fit.
pub fn add_section_title(canvas: &mut Canvas, title: &str) -> Result<(), CvError> {
    canvas.check_state()?;
    // No extra space right under the top margin.
    if canvas.current_y() > canvas.top() + SECTION_TITLE_LINE_ESTIMATE {
        canvas.move_down(SPACING_BEFORE_TITLE);
    }

    // Room for the title plus the first item's heading, so the title never
    // ends up alone at the foot of a page.
    let required = SPACING_BEFORE_TITLE * SECTION_TITLE_LINE_ESTIMATE
        + SECTION_TITLE_LINE_ESTIMATE
        + SPACING_AFTER_TITLE * SECTION_TITLE_LINE_ESTIMATE
        + SUBHEADING_BREAK_CHECK_HEIGHT
        + BREAK_BUFFER;
    if canvas.current_y() > canvas.bottom() - required {
        canvas.start_new_page();
    }

    canvas
        .set_font(Font::HelveticaBold)
        .set_font_size(FONT_SIZE_SECTION_TITLE)
        .set_fill_color(Color::BLACK);
    canvas.draw_text(title, None, &TextOptions::default())?;
    canvas.move_down(SPACING_AFTER_TITLE);
    Ok(())
}

/// Non-empty trimmed lines of a multi-line text, one per bullet.
pub fn bullet_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// "Primary | Secondary" in bold with the date right-aligned on the same top
/// edge. The date goes first so the heading's width budget is known.
fn draw_dated_heading(
    canvas: &mut Canvas,
    primary: &str,
    secondary: &str,
    date: &str,
) -> Result<(), CvError> {
    let top = canvas.current_y();
    let left = canvas.left();
    let available = canvas.content_width();

    canvas
        .set_font(Font::Helvetica)
        .set_font_size(FONT_SIZE_BODY)
        .set_fill_color(Color::BLACK);
    let date_width = canvas.width_of(date);
    let heading_width = (available - date_width - HEADING_DATE_GAP).max(MIN_SEGMENT_WIDTH);

    let date_options = TextOptions {
        width: Some(available),
        align: Align::Right,
        ..TextOptions::default()
    };
    canvas.draw_text(date, Some((left, top)), &date_options)?;

    let heading = StyledRun::new()
        .text(primary, Font::HelveticaBold, FONT_SIZE_ITEM_TITLE, Color::BLACK)
        .text(" | ", Font::Helvetica, FONT_SIZE_ITEM_TITLE, Color::BLACK)
        .text(secondary, Font::HelveticaBold, FONT_SIZE_ITEM_TITLE, Color::BLACK);
    let heading_options = TextOptions {
        width: Some(heading_width),
        ..TextOptions::default()
    };
    canvas.draw_run(&heading, None, &heading_options)?;
    canvas
        .set_font(Font::HelveticaBold)
        .set_font_size(FONT_SIZE_ITEM_TITLE);
    Ok(())
}

fn draw_bullets(canvas: &mut Canvas, items: &[String]) -> Result<(), CvError> {
    canvas
        .set_font(Font::Helvetica)
        .set_font_size(FONT_SIZE_BODY)
        .set_fill_color(Color::BLACK);
    canvas.draw_list(items, &ListOptions::default())
}

// ============================================================================
// Sections
// ============================================================================

/// Summary section. Always drawn; titled with the target job title when one
/// is given.
pub fn render_summary(canvas: &mut Canvas, profile: &ProfileData) -> Result<(), CvError> {
    let title = non_blank(profile.target_job_title.as_deref()).unwrap_or("Professional Summary");
    add_section_title(canvas, title)?;

    if let Some(summary) = non_blank(profile.user.professional_summary.as_deref()) {
        canvas
            .set_font(Font::Helvetica)
            .set_font_size(FONT_SIZE_BODY)
            .set_fill_color(Color::BLACK);
        let options = TextOptions {
            align: Align::Justify,
            ..TextOptions::default()
        };
        canvas.draw_text(summary, None, &options)?;
    }
    canvas.move_down(SPACING_ITEM);
    canvas.move_down(SPACING_AFTER_LAST_ITEM);
    Ok(())
}

pub fn render_experience(
    canvas: &mut Canvas,
    experience: &[WorkExperience],
    ongoing_label: &str,
) -> Result<(), CvError> {
    if experience.is_empty() {
        return Ok(());
    }
    add_section_title(canvas, "Professional Experience")?;

    for exp in experience {
        ensure_space(canvas, SUBHEADING_BREAK_CHECK_HEIGHT)?;

        let title = non_blank(Some(exp.job_title.as_str())).unwrap_or("Job Title");
        let company = non_blank(Some(exp.company_name.as_str())).unwrap_or("Company Name");
        let dates = format_date_range(
            exp.start_date.as_deref(),
            exp.end_date.as_deref(),
            ongoing_label,
        );
        draw_dated_heading(canvas, title, company, &dates)?;

        let bullets = exp
            .responsibilities
            .as_deref()
            .map(bullet_lines)
            .unwrap_or_default();
        if !bullets.is_empty() {
            canvas.move_down(SPACING_IN_ITEM);
            draw_bullets(canvas, &bullets)?;
        }
        canvas.move_down(SPACING_ITEM);
    }
    canvas.move_down(SPACING_AFTER_LAST_ITEM);
    Ok(())
}

/// "Degree in Field", skipping whichever part is missing.
pub fn degree_heading(edu: &Education) -> String {
    [edu.degree.as_deref(), edu.field_of_study.as_deref()]
        .into_iter()
        .filter_map(non_blank)
        .collect::<Vec<_>>()
        .join(" in ")
}

pub fn render_education(
    canvas: &mut Canvas,
    education: &[Education],
    ongoing_label: &str,
) -> Result<(), CvError> {
    if education.is_empty() {
        return Ok(());
    }
    add_section_title(canvas, "Education")?;

    for edu in education {
        ensure_space(canvas, SUBHEADING_BREAK_CHECK_HEIGHT)?;

        let degree = degree_heading(edu);
        let degree = if degree.is_empty() { "Qualification" } else { degree.as_str() };
        let institution = non_blank(Some(edu.institution_name.as_str())).unwrap_or("Institution Name");
        let dates = format_date_range(
            edu.start_date.as_deref(),
            edu.end_date.as_deref(),
            ongoing_label,
        );
        draw_dated_heading(canvas, degree, institution, &dates)?;
        canvas.move_down(SPACING_ITEM);
    }
    canvas.move_down(SPACING_AFTER_LAST_ITEM);
    Ok(())
}

/// Skill names grouped by category, categories in first-seen order.
pub fn group_skills(skills: &[Skill]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for skill in skills {
        let Some(name) = non_blank(Some(skill.skill_name.as_str())) else {
            continue;
        };
        let category = non_blank(skill.category.as_deref()).unwrap_or(DEFAULT_SKILL_CATEGORY);
        match groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, names)) => names.push(name.to_string()),
            None => groups.push((category.to_string(), vec![name.to_string()])),
        }
    }
    groups
}

pub fn render_skills(canvas: &mut Canvas, skills: &[Skill]) -> Result<(), CvError> {
    let groups = group_skills(skills);
    if groups.is_empty() {
        return Ok(());
    }
    add_section_title(canvas, "Skills")?;

    for (category, names) in &groups {
        let line = StyledRun::new()
            .text(format!("{category}: "), Font::HelveticaBold, FONT_SIZE_BODY, Color::BLACK)
            .text(names.join(", "), Font::Helvetica, FONT_SIZE_BODY, Color::BLACK);
        canvas.draw_run(&line, None, &TextOptions::default())?;
        canvas.set_font(Font::Helvetica).set_font_size(FONT_SIZE_BODY);
        canvas.move_down(SPACING_IN_ITEM);
    }
    canvas.move_down(SPACING_SECTION_GAP - SPACING_IN_ITEM);
    Ok(())
}

pub fn render_projects(
    canvas: &mut Canvas,
    projects: &[Project],
    ongoing_label: &str,
) -> Result<(), CvError> {
    if projects.is_empty() {
        return Ok(());
    }
    add_section_title(canvas, "Projects")?;

    for proj in projects {
        ensure_space(canvas, SUBHEADING_BREAK_CHECK_HEIGHT)?;
        draw_project_name(canvas, proj)?;

        let dates = format_date_range(
            proj.start_date.as_deref(),
            proj.end_date.as_deref(),
            ongoing_label,
        );
        if !dates.is_empty() {
            canvas
                .set_font(Font::Helvetica)
                .set_font_size(FONT_SIZE_META)
                .set_fill_color(Color::META_GREY);
            canvas.draw_text(&dates, None, &TextOptions::default())?;
            canvas.set_fill_color(Color::BLACK);
            canvas.move_down(SPACING_IN_ITEM);
        }

        let technologies: Vec<&str> = proj
            .technologies
            .iter()
            .flatten()
            .filter_map(|t| non_blank(Some(t.as_str())))
            .collect();
        if !technologies.is_empty() {
            let line = StyledRun::new()
                .text("Technologies: ", Font::HelveticaBold, FONT_SIZE_BODY, Color::DARK_GREY)
                .text(technologies.join(", "), Font::Helvetica, FONT_SIZE_BODY, Color::DARK_GREY);
            canvas.draw_run(&line, None, &TextOptions::default())?;
            canvas
                .set_font(Font::Helvetica)
                .set_font_size(FONT_SIZE_BODY)
                .set_fill_color(Color::BLACK);
            canvas.move_down(SPACING_IN_ITEM);
        }

        let bullets = proj.description.as_deref().map(bullet_lines).unwrap_or_default();
        if !bullets.is_empty() {
            draw_bullets(canvas, &bullets)?;
        }
        canvas.move_down(SPACING_ITEM);
    }
    canvas.move_down(SPACING_AFTER_LAST_ITEM);
    Ok(())
}

/// Project name, drawn as a link with a hotspot when it has a usable URL.
fn draw_project_name(canvas: &mut Canvas, proj: &Project) -> Result<(), CvError> {
    let name = non_blank(proj.project_name.as_deref()).unwrap_or("Project Name");
    let link = match non_blank(proj.project_link.as_deref()) {
        Some(raw) => {
            let normalized = normalize_url(raw);
            if normalized.is_none() {
                canvas.record_defect(
                    DefectKind::MalformedUrl,
                    format!("Dropping link for project {name:?}, not a valid URL: {raw:?}"),
                );
            }
            normalized
        }
        None => None,
    };

    let top = canvas.current_y();
    let pages_before = canvas.page_count();
    let (font, color) = match link {
        Some(_) => (Font::Helvetica, Color::LINK_BLUE),
        None => (Font::HelveticaBold, Color::BLACK),
    };
    canvas
        .set_font(font)
        .set_font_size(FONT_SIZE_ITEM_TITLE)
        .set_fill_color(color);
    canvas.draw_text(name, None, &TextOptions::default())?;
    canvas.set_fill_color(Color::BLACK);

    if let Some(url) = link {
        let width = canvas.width_of(name).min(canvas.content_width());
        let height = canvas.measure(name, canvas.content_width()).height;
        // The name moved to a fresh page while drawing.
        let top = if canvas.page_count() > pages_before {
            canvas.top()
        } else {
            top
        };
        canvas.add_link(canvas.left(), top, width, height, &url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Margins, PageGeometry};

    fn canvas() -> Canvas {
        Canvas::new(PageGeometry {
            width: 595.28,
            height: 841.89,
            margins: Margins::uniform(50.0),
        })
    }

    fn experience(title: &str, company: &str, start: &str) -> WorkExperience {
        WorkExperience {
            company_name: company.to_string(),
            job_title: title.to_string(),
            start_date: Some(start.to_string()),
            end_date: None,
            responsibilities: Some("Lead team.\n\n  Ship code.  \n".to_string()),
        }
    }

    #[test]
    fn test_bullet_lines_trim_and_skip_blank() {
        assert_eq!(
            bullet_lines("Lead team.\n\n  Ship code.  \n"),
            vec!["Lead team.".to_string(), "Ship code.".to_string()]
        );
        assert!(bullet_lines("\n  \n").is_empty());
    }

    #[test]
    fn test_group_skills_keeps_first_seen_order() {
        let skill = |name: &str, category: Option<&str>| Skill {
            skill_name: name.to_string(),
            category: category.map(str::to_string),
        };
        let groups = group_skills(&[
            skill("React", Some("Frontend")),
            skill("Rust", None),
            skill("Vue", Some("Frontend")),
            skill("Go", Some("")),
        ]);
        assert_eq!(
            groups,
            vec![
                ("Frontend".to_string(), vec!["React".to_string(), "Vue".to_string()]),
                ("Technical Skills".to_string(), vec!["Rust".to_string(), "Go".to_string()]),
            ]
        );
    }

    #[test]
    fn test_degree_heading_joins_present_parts() {
        let edu = |degree: Option<&str>, field: Option<&str>| Education {
            degree: degree.map(str::to_string),
            field_of_study: field.map(str::to_string),
            ..Education::default()
        };
        assert_eq!(degree_heading(&edu(Some("M.Sc."), Some("Physics"))), "M.Sc. in Physics");
        assert_eq!(degree_heading(&edu(None, Some("Physics"))), "Physics");
        assert_eq!(degree_heading(&edu(Some("B.A."), Some(" "))), "B.A.");
        assert_eq!(degree_heading(&edu(None, None)), "");
    }

    #[test]
    fn test_experience_heading_and_bullets() {
        let mut c = canvas();
        render_experience(&mut c, &[experience("Lead Developer", "Alpha Tech", "2020-01-01")], "Present")
            .unwrap();
        let lines = c.pages()[0].text_lines();
        assert_eq!(lines[0], "Professional Experience");
        assert!(lines[1].starts_with("Lead Developer | Alpha Tech"));
        assert!(lines[1].ends_with("Jan 2020 - Present"));
        assert_eq!(lines[2], "Lead team.");
        assert_eq!(lines[3], "Ship code.");
    }

    #[test]
    fn test_date_is_right_aligned_on_heading_top() {
        let mut c = canvas();
        render_experience(&mut c, &[experience("Dev", "Co", "2020-01-01")], "Present").unwrap();
        let page = &c.pages()[0];
        let date = page.texts().find(|t| t.text == "Jan 2020 - Present").unwrap();
        let title = page.texts().find(|t| t.text == "Dev").unwrap();
        assert_eq!(date.y, title.y);
        let right = date.x + crate::metrics::width_of(date.font, date.size, &date.text);
        assert!((right - c.right()).abs() < 0.01);
    }

    #[test]
    fn test_empty_collections_draw_nothing() {
        let mut c = canvas();
        let y = c.current_y();
        render_experience(&mut c, &[], "Ongoing").unwrap();
        render_education(&mut c, &[], "Ongoing").unwrap();
        render_skills(&mut c, &[]).unwrap();
        render_projects(&mut c, &[], "Ongoing").unwrap();
        assert!(c.pages()[0].ops.is_empty());
        assert_eq!(c.current_y(), y);
    }

    #[test]
    fn test_summary_without_text_still_draws_title() {
        let mut c = canvas();
        render_summary(&mut c, &ProfileData::default()).unwrap();
        assert_eq!(c.pages()[0].text_lines(), vec!["Professional Summary".to_string()]);
    }

    #[test]
    fn test_section_title_moves_to_new_page_near_bottom() {
        let mut c = canvas();
        c.set_y(c.bottom() - 30.0);
        add_section_title(&mut c, "Skills").unwrap();
        assert_eq!(c.page_count(), 2);
        assert_eq!(c.pages()[1].text_lines(), vec!["Skills".to_string()]);
    }

    #[test]
    fn test_section_title_stays_with_first_item() {
        let mut c = canvas();
        c.set_font_size(FONT_SIZE_SECTION_TITLE);
        let y = c.bottom() - 42.0 - crate::metrics::line_height(FONT_SIZE_SECTION_TITLE);
        c.set_y(y);
        let job = WorkExperience {
            job_title: "Dev".to_string(),
            company_name: "Alpha".to_string(),
            ..WorkExperience::default()
        };
        render_experience(&mut c, &[job], "Present").unwrap();

        let page_of = |text: &str| {
            c.pages()
                .iter()
                .position(|p| p.texts().any(|t| t.text == text))
                .unwrap()
        };
        assert_eq!(page_of("Professional Experience"), page_of("Dev"));
        assert_eq!(c.page_count(), 2);
        assert!(c.pages()[0].ops.is_empty());
    }

    #[test]
    fn test_zero_width_project_hotspot_is_dropped() {
        // Margins leave no content width, so the name's hotspot has none either.
        let mut c = Canvas::new(PageGeometry {
            width: 100.0,
            height: 841.89,
            margins: Margins::uniform(50.0),
        });
        let projects = vec![Project {
            project_name: Some("Phoenix".to_string()),
            project_link: Some("https://github.com/x/phoenix".to_string()),
            ..Project::default()
        }];
        render_projects(&mut c, &projects, "Present").unwrap();
        assert!(c.pages().iter().all(|p| p.links.is_empty()));
        assert!(c
            .defects()
            .iter()
            .any(|d| d.kind == DefectKind::InvalidHotspot));
    }

    #[test]
    fn test_project_link_hotspot_and_fallback() {
        let mut c = canvas();
        let projects = vec![
            Project {
                project_name: Some("Phoenix".to_string()),
                project_link: Some("github.com/x/phoenix".to_string()),
                technologies: Some(vec!["Rust".to_string(), "Tokio".to_string()]),
                start_date: Some("2022-01-01".to_string()),
                ..Project::default()
            },
            Project {
                project_name: Some("Broken".to_string()),
                project_link: Some("not a link".to_string()),
                ..Project::default()
            },
        ];
        render_projects(&mut c, &projects, "Ongoing").unwrap();
        let page = &c.pages()[0];
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].url, "https://github.com/x/phoenix");
        assert_eq!(c.defects().len(), 1);
        assert_eq!(c.defects()[0].kind, DefectKind::MalformedUrl);

        let lines = page.text_lines();
        assert!(lines.contains(&"Jan 2022 - Ongoing".to_string()));
        assert!(lines.contains(&"Technologies: Rust, Tokio".to_string()));
        assert!(lines.contains(&"Broken".to_string()));
        let phoenix = page.texts().find(|t| t.text == "Phoenix").unwrap();
        assert_eq!(phoenix.color, Color::LINK_BLUE);
        let broken = page.texts().find(|t| t.text == "Broken").unwrap();
        assert_eq!(broken.font, Font::HelveticaBold);
    }
}
