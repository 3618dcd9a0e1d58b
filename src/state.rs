//! Shared application state, built once at startup and injected into every handler.

use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Pre-shared key required on mutating routes.
    pub api_key: Arc<str>,
}
