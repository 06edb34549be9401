//! Axum route handlers for the Matches API: rank a candidate source against a
//! job, show the session's last run, download its export once.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::exports::{export_file_name, resolve_export_path, sweep_stale_exports, take_export};
use crate::jobs::repository::get_job;
use crate::matching::export::export_matches;
use crate::matching::models::SourceStatus;
use crate::matching::ranker::load_and_rank;
use crate::session::{MatchSession, MatchSummary};
use crate::sources::open_source;
use crate::sources::repository::get_source;
use crate::state::AppState;

pub const NO_MATCHES_MESSAGE: &str =
    "No candidates found matching the criteria. Try lowering the match percentage.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RunMatchRequest {
    pub source_id: Uuid,
    pub min_match_percentage: f64,
    /// Caller identity; a new one is issued when absent.
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    NoMatches,
}

#[derive(Debug, Serialize)]
pub struct RunMatchResponse {
    pub status: MatchStatus,
    pub message: String,
    pub session_id: Uuid,
    pub source: SourceStatus,
    pub total_matches: usize,
    /// Best matches only; the export carries the full list.
    pub matches: Vec<MatchSummary>,
    pub download_available: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:id/matches
///
/// Ranks the chosen source against the job's skills, exports every match to a
/// transient CSV, and stores the run in the caller's session.
pub async fn handle_run_match(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<RunMatchRequest>,
) -> Result<Json<RunMatchResponse>, AppError> {
    validate_threshold(request.min_match_percentage)?;
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job description {job_id} not found")))?;
    let source_row = get_source(&state.db, request.source_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidate source {} not found", request.source_id))
        })?;
    if !source_row.is_active {
        return Err(AppError::Validation(format!(
            "Candidate source '{}' is inactive",
            source_row.name
        )));
    }

    let source = open_source(&source_row, &state.http)
        .map_err(|e| AppError::SourceUnavailable(e.to_string()))?;
    let required_skills = job.all_skills_list();
    let report = load_and_rank(source.as_ref(), &required_skills, request.min_match_percentage).await;

    if let SourceStatus::Unavailable { reason } = &report.source {
        return Err(AppError::SourceUnavailable(reason.clone()));
    }

    if report.matches.is_empty() {
        return Ok(Json(RunMatchResponse {
            status: MatchStatus::NoMatches,
            message: NO_MATCHES_MESSAGE.to_string(),
            session_id,
            source: report.source,
            total_matches: 0,
            matches: Vec::new(),
            download_available: false,
        }));
    }

    let file_name = export_file_name(&job.title, session_id, Utc::now());
    let export_dir = state.config.export_dir.clone();
    tokio::fs::create_dir_all(&export_dir)
        .await
        .map_err(|e| AppError::Export(e.into()))?;

    let path = export_dir.join(&file_name);
    let matches = report.matches;
    let (matches, exported) = tokio::task::spawn_blocking(move || {
        let result = export_matches(&matches, &path);
        (matches, result)
    })
    .await
    .map_err(anyhow::Error::from)?;
    exported?;

    let session = MatchSession::new(
        job.id,
        source_row.name.clone(),
        &matches.entries,
        Some(file_name),
    );
    state.sessions.save(session_id, &session).await?;

    match sweep_stale_exports(&export_dir, state.config.export_max_age()).await {
        Ok(0) => {}
        Ok(n) => info!("Removed {n} stale export(s)"),
        Err(e) => warn!("Export sweep failed: {e}"),
    }

    Ok(Json(RunMatchResponse {
        status: MatchStatus::Matched,
        message: format!(
            "Found {} matching candidates from {}!",
            matches.len(),
            source_row.name
        ),
        session_id,
        source: report.source,
        total_matches: session.total_matches,
        matches: session.matches,
        download_available: true,
    }))
}

/// GET /api/v1/jobs/:id/matches?session_id=
///
/// The last ranking run stored in the caller's session for this job.
pub async fn handle_show_matches(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<MatchSession>, AppError> {
    let session = state
        .sessions
        .load(query.session_id)
        .await?
        .filter(|s| s.job_id == job_id)
        .ok_or_else(|| AppError::NotFound("No match results for this job in the session".to_string()))?;
    Ok(Json(session))
}

/// GET /api/v1/jobs/:id/matches/download?session_id=
///
/// Serves the export from memory after deleting it from disk, then clears the
/// session. A second request gets 404.
pub async fn handle_download_matches(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<SessionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound("File not found".to_string());

    let session = state
        .sessions
        .load(query.session_id)
        .await?
        .filter(|s| s.job_id == job_id)
        .ok_or_else(not_found)?;
    let file_name = session.export_file.ok_or_else(not_found)?;
    let path = resolve_export_path(&state.config.export_dir, &file_name).ok_or_else(not_found)?;

    let bytes = match take_export(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(AppError::Internal(e.into())),
    };
    state.sessions.clear(query.session_id).await?;

    info!("Served and deleted export {file_name}");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

fn validate_threshold(min_match_percentage: f64) -> Result<(), AppError> {
    if !(0.0..=100.0).contains(&min_match_percentage) {
        return Err(AppError::Validation(
            "min_match_percentage must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}
