use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::JobDescriptionRow;

/// Fields written when a job description is analyzed.
pub struct NewJob<'a> {
    pub title: &'a str,
    pub all_skills: &'a str,
    pub linkedin_skills: &'a str,
    pub linkedin_search: &'a serde_json::Value,
    pub skill_categories: &'a serde_json::Value,
    pub role_category: &'a str,
    pub experience_level: &'a str,
    pub key_responsibilities: &'a str,
    pub qualifications: &'a str,
}

pub async fn insert_job(pool: &PgPool, job: NewJob<'_>) -> Result<JobDescriptionRow, sqlx::Error> {
    sqlx::query_as::<_, JobDescriptionRow>(
        r#"
        INSERT INTO job_descriptions
            (id, title, all_skills, linkedin_skills, linkedin_search, skill_categories,
             role_category, experience_level, key_responsibilities, qualifications)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.title)
    .bind(job.all_skills)
    .bind(job.linkedin_skills)
    .bind(job.linkedin_search)
    .bind(job.skill_categories)
    .bind(job.role_category)
    .bind(job.experience_level)
    .bind(job.key_responsibilities)
    .bind(job.qualifications)
    .fetch_one(pool)
    .await
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<JobDescriptionRow>, sqlx::Error> {
    sqlx::query_as::<_, JobDescriptionRow>("SELECT * FROM job_descriptions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Newest first.
pub async fn list_recent_jobs(pool: &PgPool, limit: i64) -> Result<Vec<JobDescriptionRow>, sqlx::Error> {
    sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT * FROM job_descriptions ORDER BY uploaded_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
