//! Candidate Record Source: rows of candidate data with a Skills column,
//! read from a local CSV or Excel file, or a shared Google Sheet.
//!
//! The ranker only sees `Arc<dyn CandidateSource>` / `&dyn CandidateSource`;
//! where the rows come from is decided once, in `open_source`.

use std::io::Cursor;

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Reader};
use thiserror::Error;

use crate::matching::models::{CandidateField, CandidatePool, CandidateRecord};
use crate::models::source::{CandidateSourceRow, SourceKind};

pub mod handlers;
pub mod local;
pub mod repository;
pub mod sheet;

pub use local::LocalFileSource;
pub use sheet::{extract_sheet_id, RemoteSheetSource};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("candidate file not found: {0}")]
    NotFound(String),

    #[error("unsupported candidate file format '{0}' (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not reach spreadsheet: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spreadsheet request failed with status {status}")]
    Status { status: u16 },

    #[error("malformed candidate data: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    EmptyWorkbook,

    #[error("candidate data has no 'Skills' column")]
    MissingSkillsColumn,

    #[error("invalid Google Sheets URL: {0}")]
    InvalidSheetUrl(String),
}

/// Read-only access to a pool of candidate records.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Materializes every record. Never mutates the underlying source.
    async fn load(&self) -> Result<CandidatePool, SourceError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Builds the concrete source for a registered source row.
pub fn open_source(
    row: &CandidateSourceRow,
    http: &reqwest::Client,
) -> Result<Box<dyn CandidateSource>, SourceError> {
    match row.source_kind() {
        SourceKind::LocalFile => Ok(Box::new(LocalFileSource::new(&row.location))),
        SourceKind::GoogleSheet => {
            let sheet_id = match &row.sheet_id {
                Some(id) => id.clone(),
                None => extract_sheet_id(&row.location)
                    .ok_or_else(|| SourceError::InvalidSheetUrl(row.location.clone()))?,
            };
            Ok(Box::new(RemoteSheetSource::new(http.clone(), sheet_id)))
        }
    }
}

/// Parses CSV bytes into a candidate pool.
pub fn parse_candidate_csv(bytes: &[u8]) -> Result<CandidatePool, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    pool_from_rows(&headers, &rows)
}

/// Parses the first worksheet of an `.xlsx`/`.xls` workbook into a candidate pool.
pub fn parse_candidate_workbook(bytes: Vec<u8>) -> Result<CandidatePool, SourceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SourceError::EmptyWorkbook)??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
    let headers = rows.next().ok_or(SourceError::MissingSkillsColumn)?;
    let rows: Vec<Vec<String>> = rows.collect();
    pool_from_rows(&headers, &rows)
}

/// Builds a pool from a header row and data rows. Headers are matched to known
/// candidate columns; unknown columns are ignored. A missing Skills column
/// makes the whole source unusable. Short rows leave trailing fields missing.
fn pool_from_rows<'a, H, R>(headers: H, rows: &'a [R]) -> Result<CandidatePool, SourceError>
where
    H: IntoIterator,
    H::Item: AsRef<str>,
    &'a R: IntoIterator,
    <&'a R as IntoIterator>::Item: AsRef<str>,
{
    let mapping: Vec<Option<CandidateField>> = headers
        .into_iter()
        .map(|header| CandidateField::from_header(header.as_ref()))
        .collect();

    if !mapping.contains(&Some(CandidateField::Skills)) {
        return Err(SourceError::MissingSkillsColumn);
    }

    let columns = CandidateField::ALL
        .into_iter()
        .filter(|field| mapping.contains(&Some(*field)))
        .collect();

    let records = rows
        .iter()
        .map(|row| {
            let mut record = CandidateRecord::default();
            for (value, field) in row.into_iter().zip(mapping.iter()) {
                if let Some(field) = field {
                    record.set(*field, value.as_ref());
                }
            }
            record
        })
        .collect();

    Ok(CandidatePool { columns, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    const SHEET: &str = "\
Candidate Name,Email,Skills,Status,Favourite Colour
Asha Rao,asha@example.com,\"Python, SQL, Docker\",Active,blue
Ben Ortiz,,nan,,green
Chen Li,chen@example.com,,Shortlisted,red
";

    #[test]
    fn test_parse_maps_known_columns_and_ignores_others() {
        let pool = parse_candidate_csv(SHEET.as_bytes()).unwrap();
        assert_eq!(
            pool.columns,
            vec![
                CandidateField::Name,
                CandidateField::Email,
                CandidateField::Skills,
                CandidateField::Status
            ]
        );
        assert_eq!(pool.records.len(), 3);
        assert_eq!(pool.records[0].skills(), Some("Python, SQL, Docker"));
    }

    #[test]
    fn test_parse_turns_nan_and_blank_into_missing() {
        let pool = parse_candidate_csv(SHEET.as_bytes()).unwrap();
        assert_eq!(pool.records[1].skills(), None);
        assert_eq!(pool.records[1].get(CandidateField::Email), None);
        assert_eq!(pool.records[2].skills(), None);
    }

    #[test]
    fn test_parse_without_skills_column_fails() {
        let err = parse_candidate_csv(b"Candidate Name,Email\nAsha,asha@example.com\n")
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingSkillsColumn));
    }

    #[test]
    fn test_parse_tolerates_short_rows() {
        let pool = parse_candidate_csv(b"Candidate Name,Skills,Status\nAsha,Rust\n").unwrap();
        assert_eq!(pool.records[0].skills(), Some("Rust"));
        assert_eq!(pool.records[0].get(CandidateField::Status), None);
    }

    #[test]
    fn test_worksheet_rows_map_like_csv_rows() {
        let headers = ["CANDIDATE NAME", "skills", "Notes"];
        let rows = vec![
            vec!["Asha".to_string(), "Python, SQL".to_string(), "x".to_string()],
            vec!["Ben".to_string(), String::new()],
        ];
        let pool = pool_from_rows(headers, &rows).unwrap();
        assert_eq!(pool.columns, vec![CandidateField::Name, CandidateField::Skills]);
        assert_eq!(pool.records[0].skills(), Some("Python, SQL"));
        assert_eq!(pool.records[1].get(CandidateField::Name), Some("Ben"));
        assert_eq!(pool.records[1].skills(), None);
    }

    #[test]
    fn test_unreadable_workbook_is_a_workbook_error() {
        let err = parse_candidate_workbook(b"not a spreadsheet".to_vec()).unwrap_err();
        assert!(matches!(err, SourceError::Workbook(_)));
    }

    fn source_row(kind: &str, location: &str, sheet_id: Option<&str>) -> CandidateSourceRow {
        CandidateSourceRow {
            id: Uuid::new_v4(),
            name: "Pool".to_string(),
            kind: kind.to_string(),
            location: location.to_string(),
            sheet_id: sheet_id.map(String::from),
            is_active: true,
            total_candidates: 0,
            last_synced: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_source_picks_backend_by_kind() {
        let http = reqwest::Client::new();
        let local = open_source(&source_row("local_file", "/tmp/c.csv", None), &http).unwrap();
        assert!(local.describe().contains("/tmp/c.csv"));

        let sheet = open_source(&source_row("google_sheet", "", Some("abc123")), &http).unwrap();
        assert!(sheet.describe().contains("abc123"));
    }

    #[test]
    fn test_open_source_rejects_sheet_without_id() {
        let http = reqwest::Client::new();
        let result = open_source(&source_row("google_sheet", "https://example.com", None), &http);
        assert!(matches!(result, Err(SourceError::InvalidSheetUrl(_))));
    }
}
