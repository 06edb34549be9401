use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::extractor::SkillExtractor;
use crate::analysis::skills_map::SkillsMap;
use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds clients and configuration only; no request data lives here.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub sessions: SessionStore,
    /// Shared HTTP client for remote spreadsheet fetches.
    pub http: reqwest::Client,
    /// Pluggable skill extractor. Default: LlmSkillExtractor.
    pub extractor: Arc<dyn SkillExtractor>,
    pub skills_map: Arc<SkillsMap>,
    pub config: Config,
}
