use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::matching::normalize::is_missing_cell;

/// Rendered in place of any absent or blank candidate field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Named candidate columns as they appear in upstream spreadsheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    Name,
    Email,
    Contact,
    Location,
    CurrentCompany,
    Designation,
    Experience,
    Linkedin,
    Qualification,
    Skills,
    CvLink,
    Status,
}

impl CandidateField {
    pub const ALL: [CandidateField; 12] = [
        CandidateField::Name,
        CandidateField::Email,
        CandidateField::Contact,
        CandidateField::Location,
        CandidateField::CurrentCompany,
        CandidateField::Designation,
        CandidateField::Experience,
        CandidateField::Linkedin,
        CandidateField::Qualification,
        CandidateField::Skills,
        CandidateField::CvLink,
        CandidateField::Status,
    ];

    /// Column header used by the candidate spreadsheet and the export.
    pub fn header(self) -> &'static str {
        match self {
            CandidateField::Name => "Candidate Name",
            CandidateField::Email => "Email",
            CandidateField::Contact => "Contact",
            CandidateField::Location => "Location",
            CandidateField::CurrentCompany => "Current Company",
            CandidateField::Designation => "Designation",
            CandidateField::Experience => "Experience",
            CandidateField::Linkedin => "LinkedIn",
            CandidateField::Qualification => "Qualification",
            CandidateField::Skills => "Skills",
            CandidateField::CvLink => "CV Link",
            CandidateField::Status => "Status",
        }
    }

    /// Case-insensitive lookup of a spreadsheet header.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.header().eq_ignore_ascii_case(header))
    }
}

/// One row of candidate data. Only fields with real data are stored:
/// blank cells and `nan` placeholders are dropped on `set`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    fields: BTreeMap<CandidateField, String>,
}

impl CandidateRecord {
    pub fn set(&mut self, field: CandidateField, value: &str) {
        if is_missing_cell(value) {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value.trim().to_string());
        }
    }

    #[cfg(test)]
    pub fn with(mut self, field: CandidateField, value: &str) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: CandidateField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Field value, or `N/A` when absent.
    pub fn display(&self, field: CandidateField) -> &str {
        self.get(field).unwrap_or(NOT_AVAILABLE)
    }

    /// Raw skills text; `None` means the record cannot be scored.
    pub fn skills(&self) -> Option<&str> {
        self.get(CandidateField::Skills)
    }
}

/// Records of one source plus the columns its header actually carried.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    pub columns: Vec<CandidateField>,
    pub records: Vec<CandidateRecord>,
}

/// Score of one candidate against a required-skill set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// Normalized required skills that matched, in required-set order.
    pub matched_skills: Vec<String>,
    /// 0.0 – 100.0, one decimal place.
    pub match_percentage: f64,
    pub matched_skills_count: usize,
    pub total_required_skills: usize,
}

impl SkillMatch {
    pub fn none(total_required_skills: usize) -> Self {
        Self {
            matched_skills: Vec::new(),
            match_percentage: 0.0,
            matched_skills_count: 0,
            total_required_skills,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate: CandidateRecord,
    #[serde(flatten)]
    pub score: SkillMatch,
}

impl MatchResult {
    pub fn match_percentage(&self) -> f64 {
        self.score.match_percentage
    }
}

/// Thresholded candidates sorted by match percentage, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedMatchList {
    /// Candidate columns present in the source; drives the export layout.
    pub columns: Vec<CandidateField>,
    pub entries: Vec<MatchResult>,
}

impl RankedMatchList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether the candidate source could be read for a ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SourceStatus {
    Available {
        total_records: usize,
        scoreable_records: usize,
    },
    Unavailable {
        reason: String,
    },
}

/// Output of one ranking pass over a source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankReport {
    pub matches: RankedMatchList,
    pub source: SourceStatus,
}

impl RankReport {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            matches: RankedMatchList::default(),
            source: SourceStatus::Unavailable {
                reason: reason.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_drops_nan_and_blank_cells() {
        let record = CandidateRecord::default()
            .with(CandidateField::Name, "Asha Rao")
            .with(CandidateField::Skills, "nan")
            .with(CandidateField::Email, "   ");
        assert_eq!(record.get(CandidateField::Name), Some("Asha Rao"));
        assert_eq!(record.skills(), None);
        assert_eq!(record.display(CandidateField::Email), NOT_AVAILABLE);
    }

    #[test]
    fn test_from_header_is_case_insensitive() {
        assert_eq!(
            CandidateField::from_header(" current company "),
            Some(CandidateField::CurrentCompany)
        );
        assert_eq!(CandidateField::from_header("cv link"), Some(CandidateField::CvLink));
        assert_eq!(CandidateField::from_header("Hobbies"), None);
    }

    #[test]
    fn test_every_field_round_trips_through_its_header() {
        for field in CandidateField::ALL {
            assert_eq!(CandidateField::from_header(field.header()), Some(field));
        }
    }

    #[test]
    fn test_unavailable_report_is_empty() {
        let report = RankReport::unavailable("timeout");
        assert!(report.matches.is_empty());
        assert!(matches!(report.source, SourceStatus::Unavailable { ref reason } if reason == "timeout"));
    }
}
