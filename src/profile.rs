// Profile data handed to the engine by the calling layer

use serde::Deserialize;
use std::cmp::Ordering;

use crate::dates::parse_date;

/// Personal details shown in the header and summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub portfolio_link: Option<String>,
    pub professional_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub company_name: String,
    pub job_title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Newline-separated; each non-empty line becomes one bullet.
    pub responsibilities: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution_name: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub skill_name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Project {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub project_link: Option<String>,
}

/// Everything one document is built from. Read-only for the whole render.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    pub user: UserProfile,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    #[serde(alias = "targetJobTitle")]
    pub target_job_title: Option<String>,
}

impl ProfileData {
    /// Parses a profile from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Puts the collections in the order the engine expects: dated items
    /// newest first (undated last), skills by category then name
    /// (uncategorized last). Sorting is stable.
    pub fn normalize_order(&mut self) {
        self.experience
            .sort_by(|a, b| newest_first(a.start_date.as_deref(), b.start_date.as_deref()));
        self.education
            .sort_by(|a, b| newest_first(a.start_date.as_deref(), b.start_date.as_deref()));
        self.projects
            .sort_by(|a, b| newest_first(a.start_date.as_deref(), b.start_date.as_deref()));
        self.skills.sort_by(|a, b| {
            let by_category = match (a.category.as_deref(), b.category.as_deref()) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_category.then_with(|| a.skill_name.cmp(&b.skill_name))
        });
    }
}

fn newest_first(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a.and_then(parse_date), b.and_then(parse_date)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_accepts_camel_case_target_title() {
        let profile = ProfileData::from_json(
            r#"{"user": {"full_name": "Ada"}, "targetJobTitle": "Engineer"}"#,
        )
        .unwrap();
        assert_eq!(profile.target_job_title.as_deref(), Some("Engineer"));
        assert!(profile.experience.is_empty());
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn test_from_json_missing_collections_default_to_empty() {
        let profile = ProfileData::from_json(r#"{"user": {}}"#).unwrap();
        assert!(profile.user.full_name.is_none());
        assert!(profile.projects.is_empty());
        assert!(profile.target_job_title.is_none());
    }

    #[test]
    fn test_normalize_order_sorts_experience_newest_first() {
        let mut profile = ProfileData {
            experience: vec![
                WorkExperience {
                    job_title: "Old".to_string(),
                    start_date: Some("2015-03-01".to_string()),
                    ..Default::default()
                },
                WorkExperience {
                    job_title: "Undated".to_string(),
                    ..Default::default()
                },
                WorkExperience {
                    job_title: "New".to_string(),
                    start_date: Some("2021-07-01".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        profile.normalize_order();
        let titles: Vec<&str> = profile
            .experience
            .iter()
            .map(|e| e.job_title.as_str())
            .collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
    }

    #[test]
    fn test_normalize_order_sorts_skills_by_category_then_name() {
        let skill = |name: &str, category: Option<&str>| Skill {
            skill_name: name.to_string(),
            category: category.map(str::to_string),
        };
        let mut profile = ProfileData {
            skills: vec![
                skill("Rust", None),
                skill("React", Some("Frontend")),
                skill("Postgres", Some("Backend")),
                skill("Go", Some("Backend")),
            ],
            ..Default::default()
        };
        profile.normalize_order();
        let names: Vec<&str> = profile.skills.iter().map(|s| s.skill_name.as_str()).collect();
        assert_eq!(names, vec!["Go", "Postgres", "React", "Rust"]);
    }
}
