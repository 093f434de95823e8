use std::sync::Arc;

use regatta_workflow::WorkflowExecutor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: regatta_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External workflow service. A fake in integration tests.
    pub workflow: Arc<dyn WorkflowExecutor>,
}
