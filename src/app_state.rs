use std::sync::Arc;
use sqlx::SqlitePool;
use crate::{config::AppConfig, llm::RequestAnalyzer};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: SqlitePool,
    pub analyzer: Arc<dyn RequestAnalyzer>,
}
