use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::source::{CandidateSourceRow, SourceKind};

pub struct NewSource<'a> {
    pub name: &'a str,
    pub kind: SourceKind,
    pub location: &'a str,
    pub sheet_id: Option<&'a str>,
    pub total_candidates: i32,
}

/// Inserts a source that has just been loaded successfully.
pub async fn insert_source(
    pool: &PgPool,
    source: NewSource<'_>,
) -> Result<CandidateSourceRow, sqlx::Error> {
    sqlx::query_as::<_, CandidateSourceRow>(
        r#"
        INSERT INTO candidate_sources
            (id, name, kind, location, sheet_id, total_candidates, last_synced)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(source.name)
    .bind(source.kind.as_str())
    .bind(source.location)
    .bind(source.sheet_id)
    .bind(source.total_candidates)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get_source(pool: &PgPool, id: Uuid) -> Result<Option<CandidateSourceRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateSourceRow>("SELECT * FROM candidate_sources WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_sources(
    pool: &PgPool,
    active_only: bool,
) -> Result<Vec<CandidateSourceRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateSourceRow>(
        "SELECT * FROM candidate_sources WHERE is_active OR NOT $1 ORDER BY created_at DESC",
    )
    .bind(active_only)
    .fetch_all(pool)
    .await
}

pub async fn mark_synced(
    pool: &PgPool,
    id: Uuid,
    total_candidates: i32,
) -> Result<CandidateSourceRow, sqlx::Error> {
    sqlx::query_as::<_, CandidateSourceRow>(
        r#"
        UPDATE candidate_sources
        SET total_candidates = $1, last_synced = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(total_candidates)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await
}
