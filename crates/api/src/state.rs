use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (regular application role).
    pub pool: agapefy_db::DbPool,
    /// Pool connected with the service role, which may read rows across
    /// users. `None` when `SERVICE_DATABASE_URL` is not configured.
    pub service_pool: Option<agapefy_db::DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
