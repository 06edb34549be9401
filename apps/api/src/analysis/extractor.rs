//! Skill extraction: turns raw JD text into a structured skill profile.
//!
//! Extraction never fails from the caller's point of view: any LLM or parse
//! error yields the sentinel from `SkillExtraction::extraction_failed`, which
//! the rest of the pipeline treats as ordinary input.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::prompts::{SKILL_EXTRACTION_PROMPT, SKILL_EXTRACTION_SYSTEM};
use crate::llm_client::LlmClient;

/// Only the head of a long JD is sent to the model.
const MAX_JD_CHARS: usize = 4000;
pub const EXTRACTION_FAILED_SKILL: &str = "Error extracting skills - please try again";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
    #[default]
    Unknown,
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior Level",
            ExperienceLevel::Executive => "Executive Level",
            ExperienceLevel::Unknown => UNKNOWN,
        }
    }
}

impl From<String> for ExperienceLevel {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "entry level" | "entry" => ExperienceLevel::Entry,
            "mid level" | "mid" => ExperienceLevel::Mid,
            "senior level" | "senior" => ExperienceLevel::Senior,
            "executive level" | "executive" => ExperienceLevel::Executive,
            _ => ExperienceLevel::Unknown,
        }
    }
}

impl From<ExperienceLevel> for String {
    fn from(level: ExperienceLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Models return qualifications either as a list or as one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Qualifications {
    List(Vec<String>),
    Text(String),
}

impl Default for Qualifications {
    fn default() -> Self {
        Qualifications::List(Vec::new())
    }
}

impl Qualifications {
    /// Storage form: list items joined with ` | `, text kept as is.
    pub fn joined(&self) -> String {
        match self {
            Qualifications::List(items) => items.join(" | "),
            Qualifications::Text(text) => text.clone(),
        }
    }
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Structured profile extracted from one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillExtraction {
    #[serde(default)]
    pub all_skills: Vec<String>,
    #[serde(default)]
    pub skill_categories: BTreeMap<String, Vec<String>>,
    #[serde(default = "unknown")]
    pub role_category: String,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub key_responsibilities: Vec<String>,
    #[serde(default)]
    pub qualifications: Qualifications,
    #[serde(default)]
    pub linkedin_optimized_skills: Option<Vec<String>>,
}

impl SkillExtraction {
    /// Sentinel returned when extraction fails.
    pub fn extraction_failed() -> Self {
        Self {
            all_skills: vec![EXTRACTION_FAILED_SKILL.to_string()],
            skill_categories: BTreeMap::new(),
            role_category: unknown(),
            experience_level: ExperienceLevel::Unknown,
            key_responsibilities: Vec::new(),
            qualifications: Qualifications::default(),
            linkedin_optimized_skills: None,
        }
    }

    pub fn is_extraction_failure(&self) -> bool {
        self.all_skills.len() == 1 && self.all_skills[0] == EXTRACTION_FAILED_SKILL
    }

    /// Skills to use for LinkedIn searches: the model's pick, else the first ten.
    pub fn linkedin_skills(&self) -> Vec<String> {
        match &self.linkedin_optimized_skills {
            Some(skills) if !skills.is_empty() => skills.clone(),
            _ => self.all_skills.iter().take(10).cloned().collect(),
        }
    }
}

/// Extracts a skill profile from JD text. Implementations must not fail.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, jd_text: &str, domain_hint: &str) -> SkillExtraction;
}

/// Skill extraction through the shared LLM client.
pub struct LlmSkillExtractor(pub LlmClient);

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    async fn extract(&self, jd_text: &str, domain_hint: &str) -> SkillExtraction {
        let prompt = build_prompt(jd_text, domain_hint);
        match self
            .0
            .call_json::<SkillExtraction>(&prompt, SKILL_EXTRACTION_SYSTEM)
            .await
        {
            Ok(extraction) => {
                info!(
                    "Extracted {} skills (role: {}, level: {})",
                    extraction.all_skills.len(),
                    extraction.role_category,
                    extraction.experience_level
                );
                extraction
            }
            Err(e) => {
                warn!("Skill extraction failed, using fallback: {e}");
                SkillExtraction::extraction_failed()
            }
        }
    }
}

fn build_prompt(jd_text: &str, domain_hint: &str) -> String {
    let domain_context = if domain_hint.trim().is_empty() {
        String::new()
    } else {
        format!("The job is in the {} domain.", domain_hint.trim())
    };
    let jd_head: String = jd_text.chars().take(MAX_JD_CHARS).collect();

    SKILL_EXTRACTION_PROMPT
        .replace("{domain_context}", &domain_context)
        .replace("{jd_text}", &jd_head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload_deserializes() {
        let json = r#"{
            "all_skills": ["Python", "SQL"],
            "skill_categories": {"Technical": ["Python", "SQL"]},
            "role_category": "IT",
            "experience_level": "Senior Level",
            "key_responsibilities": ["Build pipelines"],
            "qualifications": ["B.Tech"],
            "linkedin_optimized_skills": ["Python"]
        }"#;
        let parsed: SkillExtraction = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.experience_level, ExperienceLevel::Senior);
        assert_eq!(parsed.skill_categories["Technical"].len(), 2);
        assert_eq!(parsed.qualifications.joined(), "B.Tech");
        assert_eq!(parsed.linkedin_skills(), vec!["Python"]);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let parsed: SkillExtraction = serde_json::from_str(r#"{"all_skills": ["Excel"]}"#).unwrap();
        assert_eq!(parsed.role_category, "Unknown");
        assert_eq!(parsed.experience_level, ExperienceLevel::Unknown);
        assert!(parsed.key_responsibilities.is_empty());
        assert_eq!(parsed.qualifications, Qualifications::List(vec![]));
    }

    #[test]
    fn test_qualifications_as_plain_text() {
        let parsed: SkillExtraction =
            serde_json::from_str(r#"{"qualifications": "MBA preferred"}"#).unwrap();
        assert_eq!(parsed.qualifications.joined(), "MBA preferred");
    }

    #[test]
    fn test_unrecognized_experience_level_is_unknown() {
        let parsed: SkillExtraction =
            serde_json::from_str(r#"{"experience_level": "Wizard"}"#).unwrap();
        assert_eq!(parsed.experience_level, ExperienceLevel::Unknown);
    }

    #[test]
    fn test_experience_level_serializes_as_label() {
        let json = serde_json::to_string(&ExperienceLevel::Mid).unwrap();
        assert_eq!(json, r#""Mid Level""#);
    }

    #[test]
    fn test_sentinel_shape() {
        let sentinel = SkillExtraction::extraction_failed();
        assert!(sentinel.is_extraction_failure());
        assert_eq!(sentinel.all_skills, vec![EXTRACTION_FAILED_SKILL]);
        assert!(sentinel.skill_categories.is_empty());
        assert_eq!(sentinel.role_category, "Unknown");
        assert_eq!(sentinel.experience_level.as_str(), "Unknown");
    }

    #[test]
    fn test_linkedin_skills_fall_back_to_first_ten() {
        let extraction = SkillExtraction {
            all_skills: (0..15).map(|i| format!("s{i}")).collect(),
            ..SkillExtraction::extraction_failed()
        };
        let skills = extraction.linkedin_skills();
        assert_eq!(skills.len(), 10);
        assert_eq!(skills[0], "s0");
    }

    #[test]
    fn test_prompt_truncates_long_jd_and_adds_domain() {
        let long_jd = "x".repeat(10_000);
        let prompt = build_prompt(&long_jd, "Finance");
        assert!(prompt.contains("The job is in the Finance domain."));
        assert!(!prompt.contains(&"x".repeat(MAX_JD_CHARS + 1)));
        assert!(prompt.contains(&"x".repeat(MAX_JD_CHARS)));
    }
}
