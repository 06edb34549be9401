use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    LocalFile,
    GoogleSheet,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::LocalFile => "local_file",
            SourceKind::GoogleSheet => "google_sheet",
        }
    }
}

/// A registered candidate spreadsheet: a CSV path on the server or a Google Sheet URL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateSourceRow {
    pub id: Uuid,
    pub name: String,
    /// `local_file` | `google_sheet`
    pub kind: String,
    pub location: String,
    pub sheet_id: Option<String>,
    pub is_active: bool,
    pub total_candidates: i32,
    pub last_synced: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CandidateSourceRow {
    pub fn source_kind(&self) -> SourceKind {
        match self.kind.as_str() {
            "google_sheet" => SourceKind::GoogleSheet,
            _ => SourceKind::LocalFile,
        }
    }
}
