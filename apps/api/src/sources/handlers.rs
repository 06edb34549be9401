//! Axum route handlers for registering and syncing candidate sources.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::source::{CandidateSourceRow, SourceKind};
use crate::sources::repository::{get_source, insert_source, list_sources, mark_synced, NewSource};
use crate::sources::{
    extract_sheet_id, open_source, CandidateSource, LocalFileSource, RemoteSheetSource, SourceError,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddSourceRequest {
    pub name: String,
    pub kind: SourceKind,
    /// CSV or Excel path on the server, or the Google Sheet URL.
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct SourceResponse {
    pub source: CandidateSourceRow,
    pub message: String,
}

/// POST /api/v1/sources
///
/// Registers a source after proving it can be read.
pub async fn handle_add_source(
    State(state): State<AppState>,
    Json(request): Json<AddSourceRequest>,
) -> Result<(StatusCode, Json<SourceResponse>), AppError> {
    let name = request.name.trim();
    let location = request.location.trim();
    if name.is_empty() || location.is_empty() {
        return Err(AppError::Validation(
            "name and location are required".to_string(),
        ));
    }

    let sheet_id = match request.kind {
        SourceKind::GoogleSheet => Some(extract_sheet_id(location).ok_or_else(|| {
            AppError::Validation("Invalid Google Sheets URL. Please check and try again.".to_string())
        })?),
        SourceKind::LocalFile => None,
    };

    let source: Box<dyn CandidateSource> = match &sheet_id {
        Some(id) => Box::new(RemoteSheetSource::new(state.http.clone(), id.clone())),
        None => Box::new(LocalFileSource::new(location)),
    };
    let total = count_candidates(source.as_ref(), request.kind).await?;

    let row = insert_source(
        &state.db,
        NewSource {
            name,
            kind: request.kind,
            location,
            sheet_id: sheet_id.as_deref(),
            total_candidates: total,
        },
    )
    .await?;

    info!("Registered candidate source {} ({} candidates)", row.name, total);

    Ok((
        StatusCode::CREATED,
        Json(SourceResponse {
            message: format!("Source added successfully! {total} candidates found."),
            source: row,
        }),
    ))
}

/// GET /api/v1/sources
pub async fn handle_list_sources(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateSourceRow>>, AppError> {
    Ok(Json(list_sources(&state.db, false).await?))
}

/// POST /api/v1/sources/:id/sync
///
/// Re-reads the source and refreshes its candidate count.
pub async fn handle_sync_source(
    State(state): State<AppState>,
    Path(source_id): Path<Uuid>,
) -> Result<Json<SourceResponse>, AppError> {
    let row = get_source(&state.db, source_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate source {source_id} not found")))?;

    let source = open_source(&row, &state.http).map_err(|e| source_unavailable(e, row.source_kind()))?;
    let total = count_candidates(source.as_ref(), row.source_kind()).await?;
    let row = mark_synced(&state.db, source_id, total).await?;

    Ok(Json(SourceResponse {
        message: format!("Synced successfully! {total} candidates found."),
        source: row,
    }))
}

async fn count_candidates(source: &dyn CandidateSource, kind: SourceKind) -> Result<i32, AppError> {
    let pool = source.load().await.map_err(|e| source_unavailable(e, kind))?;
    Ok(i32::try_from(pool.records.len()).unwrap_or(i32::MAX))
}

fn source_unavailable(error: SourceError, kind: SourceKind) -> AppError {
    match kind {
        SourceKind::GoogleSheet => AppError::SourceUnavailable(format!(
            "{error}. Make sure the sheet is shared with anyone who has the link."
        )),
        SourceKind::LocalFile => AppError::SourceUnavailable(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_source_request_parses_kind() {
        let request: AddSourceRequest = serde_json::from_str(
            r#"{"name": "Pool", "kind": "google_sheet", "location": "https://docs.google.com/spreadsheets/d/abc/edit"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, SourceKind::GoogleSheet);
    }

    #[test]
    fn test_sheet_failures_mention_sharing() {
        let err = source_unavailable(SourceError::Status { status: 403 }, SourceKind::GoogleSheet);
        assert!(err.to_string().contains("shared"));
        let err = source_unavailable(SourceError::MissingSkillsColumn, SourceKind::LocalFile);
        assert!(err.to_string().contains("Skills"));
    }

    #[tokio::test]
    async fn test_count_candidates_from_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.csv");
        std::fs::write(&path, "Candidate Name,Skills\nA,Rust\nB,nan\n").unwrap();

        let total = count_candidates(&LocalFileSource::new(&path), SourceKind::LocalFile)
            .await
            .unwrap();
        assert_eq!(total, 2);
    }
}
