//! LinkedIn boolean search strings built from a job's search skills.

use serde::{Deserialize, Serialize};

use crate::analysis::extractor::ExperienceLevel;

const AND_SKILLS: usize = 5;
const OR_SKILLS: usize = 10;
const TITLE_SKILLS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedInSearches {
    /// Every one of the top skills must appear.
    pub basic_and: String,
    /// Any of the top skills may appear.
    pub basic_or: String,
    pub title_and_skills: String,
    /// Title plus seniority keywords; empty when the level is unknown.
    pub experience_focused: String,
}

pub fn build_linkedin_searches(
    skills: &[String],
    job_title: &str,
    level: ExperienceLevel,
) -> LinkedInSearches {
    let quoted: Vec<String> = skills
        .iter()
        .map(|s| quote(s))
        .filter(|q| q != "\"\"")
        .collect();
    let title = quote(job_title);

    let basic_and = quoted
        .iter()
        .take(AND_SKILLS)
        .cloned()
        .collect::<Vec<_>>()
        .join(" AND ");

    let basic_or = any_of(&quoted[..quoted.len().min(OR_SKILLS)]);

    let title_and_skills = match any_of(&quoted[..quoted.len().min(TITLE_SKILLS)]) {
        skills if skills.is_empty() => title.clone(),
        skills => format!("{title} AND {skills}"),
    };

    let experience_focused = seniority_terms(level)
        .map(|terms| {
            let terms: Vec<String> = terms.iter().map(|t| quote(t)).collect();
            format!("{title} AND {}", any_of(&terms))
        })
        .unwrap_or_default();

    LinkedInSearches {
        basic_and,
        basic_or,
        title_and_skills,
        experience_focused,
    }
}

fn quote(term: &str) -> String {
    format!("\"{}\"", term.trim().replace('"', ""))
}

fn any_of(terms: &[String]) -> String {
    match terms {
        [] => String::new(),
        [single] => single.clone(),
        _ => format!("({})", terms.join(" OR ")),
    }
}

fn seniority_terms(level: ExperienceLevel) -> Option<&'static [&'static str]> {
    match level {
        ExperienceLevel::Entry => Some(&["Junior", "Entry Level", "Graduate", "Associate"]),
        ExperienceLevel::Mid => Some(&["Mid Level", "Specialist", "Analyst"]),
        ExperienceLevel::Senior => Some(&["Senior", "Lead", "Principal"]),
        ExperienceLevel::Executive => Some(&["Director", "Head of", "VP", "Chief"]),
        ExperienceLevel::Unknown => None,
    }
}
