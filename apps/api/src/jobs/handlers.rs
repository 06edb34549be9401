//! Axum route handlers for the Jobs API: upload and analyze a job description,
//! list recent analyses, show one analysis.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::search::{build_linkedin_searches, LinkedInSearches};
use crate::analysis::text::extract_jd_text;
use crate::archive::{append_to_archive, ArchiveEntry};
use crate::errors::AppError;
use crate::jobs::repository::{get_job, insert_job, list_recent_jobs, NewJob};
use crate::models::job::JobDescriptionRow;
use crate::models::source::CandidateSourceRow;
use crate::sources::repository::list_sources;
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const RECENT_JOBS_LIMIT: i64 = 10;
const DOMAIN_HINTS: [&str; 6] = ["Technical", "Marketing", "Finance", "HR", "Sales", "Operations"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct UploadForm {
    title: String,
    domain: String,
    file_name: String,
    file: Bytes,
}

#[derive(Debug, Serialize)]
pub struct JobAnalysisResponse {
    pub job: JobDescriptionRow,
    pub linkedin_searches: LinkedInSearches,
    /// True when the LLM could not extract skills and the fallback was stored.
    pub extraction_failed: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: JobDescriptionRow,
    pub all_skills: Vec<String>,
    pub linkedin_skills: Vec<String>,
    pub linkedin_searches: LinkedInSearches,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
    pub related_skills: Vec<String>,
    /// Active sources the job can be matched against.
    pub sources: Vec<CandidateSourceRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
///
/// Multipart form: `title`, optional `domain`, `file` (.txt, .pdf or .docx).
/// Extracts text, runs skill extraction, stores the analysis, appends to the
/// archival log. The uploaded file is never written to disk.
pub async fn handle_upload_job(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<JobAnalysisResponse>), AppError> {
    let form = read_upload_form(multipart).await?;
    validate_upload(&form)?;

    let UploadForm {
        title,
        domain,
        file_name,
        file,
    } = form;

    let jd_text = tokio::task::spawn_blocking(move || extract_jd_text(&file_name, &file))
        .await
        .map_err(anyhow::Error::from)?
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let extraction = state.extractor.extract(&jd_text, &domain).await;
    let extraction_failed = extraction.is_extraction_failure();

    let linkedin_skills = extraction.linkedin_skills();
    let searches = build_linkedin_searches(&linkedin_skills, &title, extraction.experience_level);

    let all_skills = extraction.all_skills.join(", ");
    let linkedin_skills = linkedin_skills.join(", ");
    let key_responsibilities = extraction.key_responsibilities.join(" | ");
    let qualifications = extraction.qualifications.joined();
    let experience_level = extraction.experience_level.as_str();
    let linkedin_search = serde_json::to_value(&searches).map_err(anyhow::Error::from)?;
    let skill_categories =
        serde_json::to_value(&extraction.skill_categories).map_err(anyhow::Error::from)?;

    let job = insert_job(
        &state.db,
        NewJob {
            title: &title,
            all_skills: &all_skills,
            linkedin_skills: &linkedin_skills,
            linkedin_search: &linkedin_search,
            skill_categories: &skill_categories,
            role_category: &extraction.role_category,
            experience_level,
            key_responsibilities: &key_responsibilities,
            qualifications: &qualifications,
        },
    )
    .await?;

    info!("Analyzed job description {} ({})", job.id, job.title);

    let archive_path = state.config.archive_path.clone();
    let entry = ArchiveEntry {
        job_title: job.title.clone(),
        all_skills,
        linkedin_skills,
        linkedin_boolean_search: searches.basic_and.clone(),
        role_category: job.role_category.clone(),
        experience_level: job.experience_level.clone(),
        key_responsibilities,
        qualifications,
        date_uploaded: Utc::now().format("%Y-%m-%d").to_string(),
    };
    match tokio::task::spawn_blocking(move || append_to_archive(&archive_path, &entry)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Could not append job {} to archive: {e:#}", job.id),
        Err(e) => warn!("Archive task for job {} failed: {e}", job.id),
    }

    let message = if extraction_failed {
        "Job description saved, but skills could not be extracted. Please try again.".to_string()
    } else {
        "Job description analyzed successfully! The uploaded file was discarded.".to_string()
    };

    Ok((
        StatusCode::CREATED,
        Json(JobAnalysisResponse {
            job,
            linkedin_searches: searches,
            extraction_failed,
            message,
        }),
    ))
}

/// GET /api/v1/jobs
///
/// The ten most recently analyzed job descriptions.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobDescriptionRow>>, AppError> {
    let jobs = list_recent_jobs(&state.db, RECENT_JOBS_LIMIT).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
///
/// Full analysis for one job plus the active sources it can be matched against.
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job description {job_id} not found")))?;

    let sources = list_sources(&state.db, true).await?;
    let all_skills = job.all_skills_list();
    let related_skills = state.skills_map.expand(&all_skills, &[]);
    let linkedin_searches =
        serde_json::from_value(job.linkedin_search.clone()).unwrap_or_default();

    Ok(Json(JobDetailResponse {
        all_skills,
        linkedin_skills: job.linkedin_skills_list(),
        linkedin_searches,
        responsibilities: job.responsibilities_list(),
        qualifications: job.qualifications_list(),
        related_skills,
        sources,
        job,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Form parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut title = None;
    let mut domain = String::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(read_text(field).await?),
            "domain" => domain = read_text(field).await?,
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?;
                file = Some((file_name, bytes));
            }
            _ => {}
        }
    }

    let (file_name, file) =
        file.ok_or_else(|| AppError::Validation("A job description file is required".to_string()))?;

    Ok(UploadForm {
        title: title.unwrap_or_default().trim().to_string(),
        domain: domain.trim().to_string(),
        file_name,
        file,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed form field: {e}")))
}

fn validate_upload(form: &UploadForm) -> Result<(), AppError> {
    if form.title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if form.file.is_empty() {
        return Err(AppError::Validation("The uploaded file is empty".to_string()));
    }
    if form.file.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File too large: maximum size is {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    if !form.domain.is_empty() && !DOMAIN_HINTS.contains(&form.domain.as_str()) {
        return Err(AppError::Validation(format!(
            "Unknown domain '{}'. Expected one of: {}",
            form.domain,
            DOMAIN_HINTS.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, domain: &str, size: usize) -> UploadForm {
        UploadForm {
            title: title.to_string(),
            domain: domain.to_string(),
            file_name: "jd.txt".to_string(),
            file: Bytes::from(vec![b'a'; size]),
        }
    }

    #[test]
    fn test_valid_upload_passes() {
        assert!(validate_upload(&form("Analyst", "", 100)).is_ok());
        assert!(validate_upload(&form("Analyst", "Finance", 100)).is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(matches!(
            validate_upload(&form("", "", 100)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_oversized_or_empty_file_rejected() {
        assert!(validate_upload(&form("Analyst", "", 0)).is_err());
        assert!(validate_upload(&form("Analyst", "", MAX_UPLOAD_BYTES + 1)).is_err());
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let err = validate_upload(&form("Analyst", "Astrology", 10)).unwrap_err();
        assert!(err.to_string().contains("Astrology"));
    }
}
