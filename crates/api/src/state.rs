use std::sync::Arc;

use inkflow_alimtalk::Dispatcher;
use inkflow_rewrite::RewriteGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// The notification and rewrite gateways are injected here at construction
/// time so handlers never reach for process-wide globals and tests can
/// substitute fakes.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inkflow_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Notification dispatcher wrapping the configured alimtalk provider.
    pub notifier: Arc<Dispatcher>,
    /// Rewrite/generation gateway.
    pub rewriter: Arc<dyn RewriteGateway>,
}
