use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notify::EmailService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: crewpath_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// SMTP notification service; `None` when `SMTP_HOST` is not configured.
    pub email: Option<Arc<EmailService>>,
}
