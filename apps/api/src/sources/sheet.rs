use async_trait::async_trait;
use tracing::debug;

use crate::matching::models::CandidatePool;
use crate::sources::{parse_candidate_csv, CandidateSource, SourceError};

const SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Candidate records from a shared Google Sheet, fetched through its CSV export.
pub struct RemoteSheetSource {
    http: reqwest::Client,
    sheet_id: String,
}

impl RemoteSheetSource {
    pub fn new(http: reqwest::Client, sheet_id: String) -> Self {
        Self { http, sheet_id }
    }

    pub fn export_url(&self) -> String {
        format!("{SHEETS_BASE_URL}/{}/export?format=csv", self.sheet_id)
    }
}

#[async_trait]
impl CandidateSource for RemoteSheetSource {
    async fn load(&self) -> Result<CandidatePool, SourceError> {
        let response = self.http.get(self.export_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let pool = parse_candidate_csv(&body)?;
        debug!(
            "Fetched {} candidate rows from sheet {}",
            pool.records.len(),
            self.sheet_id
        );
        Ok(pool)
    }

    fn describe(&self) -> String {
        format!("google sheet {}", self.sheet_id)
    }
}

/// Pulls the sheet id out of a `.../spreadsheets/d/<id>/...` URL.
pub fn extract_sheet_id(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/spreadsheets/d/")?;
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    (!id.is_empty()).then_some(id)
}
