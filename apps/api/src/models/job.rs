use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// An analyzed job description. The uploaded file itself is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: Uuid,
    pub title: String,
    pub uploaded_at: DateTime<Utc>,
    /// Comma-joined extracted skills; the required-skill set for matching.
    pub all_skills: String,
    pub linkedin_skills: String,
    pub linkedin_search: Value,
    pub skill_categories: Value,
    pub role_category: String,
    pub experience_level: String,
    /// ` | `-joined
    pub key_responsibilities: String,
    /// ` | `-joined
    pub qualifications: String,
}

impl JobDescriptionRow {
    pub fn all_skills_list(&self) -> Vec<String> {
        split_list(&self.all_skills, ',')
    }

    pub fn linkedin_skills_list(&self) -> Vec<String> {
        split_list(&self.linkedin_skills, ',')
    }

    pub fn responsibilities_list(&self) -> Vec<String> {
        split_list(&self.key_responsibilities, '|')
    }

    pub fn qualifications_list(&self) -> Vec<String> {
        split_list(&self.qualifications, '|')
    }
}

fn split_list(joined: &str, separator: char) -> Vec<String> {
    joined
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
