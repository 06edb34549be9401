//! Archival log: one CSV row appended per analyzed job description.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveEntry {
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "All Skills Required")]
    pub all_skills: String,
    #[serde(rename = "LinkedIn Search Skills")]
    pub linkedin_skills: String,
    #[serde(rename = "LinkedIn Boolean Search")]
    pub linkedin_boolean_search: String,
    #[serde(rename = "Role Category")]
    pub role_category: String,
    #[serde(rename = "Experience Level")]
    pub experience_level: String,
    #[serde(rename = "Key Responsibilities")]
    pub key_responsibilities: String,
    #[serde(rename = "Qualifications")]
    pub qualifications: String,
    /// YYYY-MM-DD
    #[serde(rename = "Date Uploaded")]
    pub date_uploaded: String,
}

/// Appends `entry` to the log at `path`, writing the header only when the
/// file is new or empty. Existing rows are never rewritten.
pub fn append_to_archive(path: &Path, entry: &ArchiveEntry) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create archive directory {}", parent.display()))?;
    }

    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open archive {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    writer.serialize(entry)?;
    writer.flush()?;
    Ok(())
}
