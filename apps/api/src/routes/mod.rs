pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::matching::handlers as matches;
use crate::sources::handlers as sources;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted JD file.
const UPLOAD_BODY_LIMIT: usize = jobs::MAX_UPLOAD_BYTES + 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job descriptions
        .route(
            "/api/v1/jobs",
            post(jobs::handle_upload_job)
                .get(jobs::handle_list_jobs)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        // Candidate sources
        .route(
            "/api/v1/sources",
            post(sources::handle_add_source).get(sources::handle_list_sources),
        )
        .route("/api/v1/sources/:id/sync", post(sources::handle_sync_source))
        // Matching
        .route(
            "/api/v1/jobs/:id/matches",
            post(matches::handle_run_match).get(matches::handle_show_matches),
        )
        .route(
            "/api/v1/jobs/:id/matches/download",
            get(matches::handle_download_matches),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::analysis::extractor::{SkillExtraction, SkillExtractor};
    use crate::analysis::skills_map::SkillsMap;
    use crate::config::Config;
    use crate::session::SessionStore;

    struct NoopExtractor;

    #[async_trait]
    impl SkillExtractor for NoopExtractor {
        async fn extract(&self, _jd_text: &str, _domain_hint: &str) -> SkillExtraction {
            SkillExtraction::extraction_failed()
        }
    }

    /// State whose backends are never contacted: the pool connects lazily and
    /// the Redis client only parses its URL.
    fn offline_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/jd_match_test".to_string(),
            redis_url: "redis://127.0.0.1/".to_string(),
            anthropic_api_key: "test".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            data_dir: "data".into(),
            export_dir: "data/matched_candidates".into(),
            archive_path: "data/job_descriptions.csv".into(),
            skills_map_path: "data/skills_map.json".into(),
            export_max_age_hours: 24,
            export_sweep_interval_secs: 3600,
        };
        AppState {
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            sessions: SessionStore::new(redis::Client::open(config.redis_url.as_str()).unwrap()),
            http: reqwest::Client::new(),
            extractor: Arc::new(NoopExtractor),
            skills_map: Arc::new(SkillsMap::default()),
            config,
        }
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = build_router(offline_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_out_of_range_threshold_rejected_before_any_lookup() {
        let body = format!(
            r#"{{"source_id": "{}", "min_match_percentage": 150}}"#,
            uuid::Uuid::nil()
        );
        let request = Request::post(format!("/api/v1/jobs/{}/matches", uuid::Uuid::nil()))
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = build_router(offline_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_job_id_is_rejected() {
        let response = build_router(offline_state())
            .oneshot(
                Request::get("/api/v1/jobs/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
