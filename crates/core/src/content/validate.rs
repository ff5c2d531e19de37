/// Document validation run before anything is committed.
use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use super::post::BlogPost;
use super::site_config::{SiteConfig, SKILL_LEVELS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("slug is required")]
    MissingSlug,
    #[error("slug is {0} characters long, the limit is 128")]
    SlugTooLong(usize),
    #[error("slug {slug:?} contains {bad:?}; use letters, digits, '-' or '_'")]
    InvalidSlug { slug: String, bad: char },
    #[error("title is required")]
    MissingTitle,
    #[error("date {0:?} is not an ISO date (YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("skill {name:?} has level {level}, expected 1 to 10")]
    SkillLevelOutOfRange { name: String, level: u8 },
    #[error("project id cannot be empty")]
    EmptyProjectId,
    #[error("project id {0:?} is used more than once")]
    DuplicateProjectId(String),
}

/// Validate the fields of a blog post that the codec cannot enforce.
pub fn validate_post(post: &BlogPost) -> Result<(), ValidationError> {
    if post.meta.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    validate_date(&post.meta.date)
}

/// Dates are stored as strings and sorted lexicographically, so only the
/// zero-padded ISO form keeps listing order meaningful.
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

pub fn validate_site_config(config: &SiteConfig) -> Result<(), ValidationError> {
    for skill in &config.about.skills {
        if !SKILL_LEVELS.contains(&skill.level) {
            return Err(ValidationError::SkillLevelOutOfRange {
                name: skill.name.clone(),
                level: skill.level,
            });
        }
    }

    let mut seen = HashSet::new();
    for project in &config.projects {
        if project.id.trim().is_empty() {
            return Err(ValidationError::EmptyProjectId);
        }
        if !seen.insert(project.id.as_str()) {
            return Err(ValidationError::DuplicateProjectId(project.id.clone()));
        }
    }
    Ok(())
}
