//! Skill token normalization shared by required skills and candidate skills.

/// Trims surrounding whitespace and lowercases a single skill token.
pub fn normalize_skill(token: &str) -> String {
    token.trim().to_lowercase()
}

/// Splits comma-separated skills text into normalized tokens, dropping empty ones.
pub fn split_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(normalize_skill)
        .filter(|token| !token.is_empty())
        .collect()
}

/// True when `text` holds at least one non-empty comma-separated token.
pub fn has_skill_tokens(text: &str) -> bool {
    text.split(',').any(|token| !token.trim().is_empty())
}

/// Normalizes a required-skill list once, preserving order and duplicates.
pub fn normalize_required(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// True for cells that carry no data: blank, or the `nan` placeholder that
/// spreadsheet exporters write for missing values.
pub fn is_missing_cell(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("nan")
}
