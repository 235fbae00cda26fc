use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::token::JwtKeys;
use crate::config::Config;
use crate::jobs::store::JobStore;
use crate::llm_client::TextGenerator;
use crate::resume::static_analyzer::StaticAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Job application storage. `PgJobStore` over `db` in production.
    pub jobs: Arc<dyn JobStore>,
    /// Text generation backend. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn TextGenerator>,
    pub jwt: JwtKeys,
    pub analyzer: Arc<StaticAnalyzer>,
    pub config: Config,
}
