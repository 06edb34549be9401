//! Match Scorer: how well one candidate's skills text covers a required-skill set.
//!
//! A required skill matches when it is a substring of, or contains, any one
//! candidate token. The first token satisfying it wins; each required skill
//! counts at most once.

use crate::matching::models::SkillMatch;
use crate::matching::normalize::split_skills;

/// Scores raw candidate skills text against an already normalized required list.
/// `None` skills text means "no skills data" and yields zero matches.
pub fn score_candidate(skills_text: Option<&str>, required: &[String]) -> SkillMatch {
    let total = required.len();
    let Some(text) = skills_text else {
        return SkillMatch::none(total);
    };

    let tokens = split_skills(text);

    let matched_skills: Vec<String> = required
        .iter()
        .filter(|skill| tokens.iter().any(|token| is_skill_match(skill, token)))
        .cloned()
        .collect();

    let matched = matched_skills.len();
    SkillMatch {
        matched_skills,
        match_percentage: match_percentage(matched, total),
        matched_skills_count: matched,
        total_required_skills: total,
    }
}

/// Bidirectional substring containment on normalized tokens.
fn is_skill_match(required: &str, candidate: &str) -> bool {
    candidate.contains(required) || required.contains(candidate)
}

/// matched / total × 100, one decimal place; 0 when nothing is required.
pub fn match_percentage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = matched as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
