//! Result Exporter: writes a ranked match list as a CSV table.
//!
//! The file is written to a temp file beside the target and renamed into
//! place, so a failed export never leaves a truncated file at `path`.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::matching::models::{CandidateField, MatchResult, RankedMatchList};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not move export into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// One column of the export table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumn {
    MatchPercentage,
    MatchedSkillsCount,
    TotalRequiredSkills,
    MatchedSkills,
    Candidate(CandidateField),
}

/// Fixed export order. Candidate columns are dropped when the source never had them.
pub const EXPORT_COLUMNS: [ExportColumn; 16] = [
    ExportColumn::MatchPercentage,
    ExportColumn::MatchedSkillsCount,
    ExportColumn::TotalRequiredSkills,
    ExportColumn::Candidate(CandidateField::Name),
    ExportColumn::Candidate(CandidateField::Email),
    ExportColumn::Candidate(CandidateField::Contact),
    ExportColumn::Candidate(CandidateField::Designation),
    ExportColumn::Candidate(CandidateField::CurrentCompany),
    ExportColumn::Candidate(CandidateField::Experience),
    ExportColumn::Candidate(CandidateField::Location),
    ExportColumn::Candidate(CandidateField::Qualification),
    ExportColumn::Candidate(CandidateField::Linkedin),
    ExportColumn::Candidate(CandidateField::Skills),
    ExportColumn::MatchedSkills,
    ExportColumn::Candidate(CandidateField::CvLink),
    ExportColumn::Candidate(CandidateField::Status),
];

impl ExportColumn {
    pub fn header(self) -> &'static str {
        match self {
            ExportColumn::MatchPercentage => "Match Percentage",
            ExportColumn::MatchedSkillsCount => "Matched Skills Count",
            ExportColumn::TotalRequiredSkills => "Total Required Skills",
            ExportColumn::MatchedSkills => "Matched Skills",
            ExportColumn::Candidate(field) => field.header(),
        }
    }

    fn value(self, result: &MatchResult) -> String {
        match self {
            ExportColumn::MatchPercentage => format!("{:.1}", result.score.match_percentage),
            ExportColumn::MatchedSkillsCount => result.score.matched_skills_count.to_string(),
            ExportColumn::TotalRequiredSkills => result.score.total_required_skills.to_string(),
            ExportColumn::MatchedSkills => result.score.matched_skills.join(", "),
            ExportColumn::Candidate(field) => result.candidate.display(field).to_string(),
        }
    }
}

/// Columns written for `list`: computed columns always, candidate columns
/// only if the source schema carried them.
pub fn export_columns(list: &RankedMatchList) -> Vec<ExportColumn> {
    EXPORT_COLUMNS
        .into_iter()
        .filter(|column| match column {
            ExportColumn::Candidate(field) => list.columns.contains(field),
            _ => true,
        })
        .collect()
}

/// Writes `list` to `path`, replacing any existing file.
pub fn export_matches(list: &RankedMatchList, path: &Path) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    write_table(list, staged.as_file_mut())?;
    staged.as_file_mut().sync_all()?;
    staged.persist(path)?;
    Ok(())
}

fn write_table<W: Write>(list: &RankedMatchList, out: W) -> Result<(), ExportError> {
    let columns = export_columns(list);
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(columns.iter().map(|c| c.header()))?;
    for result in &list.entries {
        writer.write_record(columns.iter().map(|c| c.value(result)))?;
    }
    writer.flush()?;
    Ok(())
}
