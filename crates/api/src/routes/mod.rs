pub mod alimtalk;
pub mod clients;
pub mod confirm;
pub mod health;
pub mod manuscripts;
pub mod rewrite;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clients                              list, create
/// /clients/{id}                         get, update, deactivate
///
/// /templates                            list, create
/// /templates/{id}                       get, update, deactivate
///
/// /manuscripts                          list, bulk dispatch (POST)
/// /manuscripts/stats                    counts per status
/// /manuscripts/{id}                     detail, staff patch
/// /manuscripts/{id}/resend              resend with fresh token (POST)
/// /manuscripts/{id}/change-template     cancel + replace (POST)
/// /custom-send                          one-off custom manuscript (POST)
///
/// /confirm/{token}                      public: view group, act (GET, POST)
///
/// /rewrite                              rewrite proxy (POST)
/// /custom-generate                      generation proxy (POST)
///
/// /alimtalk/send                        manual notification send (POST)
/// /alimtalk/logs                        recent send log (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Client management.
        .nest("/clients", clients::router())
        // Template management.
        .nest("/templates", templates::router())
        // Manuscript lifecycle + bulk dispatch.
        .nest("/manuscripts", manuscripts::router())
        // One-off custom sends.
        .merge(manuscripts::custom_send_router())
        // Public tokenized confirmation.
        .nest("/confirm", confirm::router())
        // Rewrite/generation proxies.
        .merge(rewrite::router())
        // Manual notification send + log.
        .nest("/alimtalk", alimtalk::router())
}
