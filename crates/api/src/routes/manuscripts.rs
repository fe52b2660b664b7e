//! Route definitions for the manuscript lifecycle.
//!
//! ```text
//! GET    /                      list_manuscripts
//! POST   /                      bulk_create (dispatch orchestrator)
//! GET    /stats                 manuscript_stats
//! GET    /{id}                  get_manuscript
//! PUT    /{id}                  update_manuscript
//! POST   /{id}/resend           resend_manuscript
//! POST   /{id}/change-template  change_template
//! ```
//!
//! Plus the top-level custom-send route:
//!
//! ```text
//! POST   /custom-send           custom_send
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::manuscripts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(manuscripts::list_manuscripts).post(manuscripts::bulk_create),
        )
        .route("/stats", get(manuscripts::manuscript_stats))
        .route(
            "/{id}",
            get(manuscripts::get_manuscript).put(manuscripts::update_manuscript),
        )
        .route("/{id}/resend", post(manuscripts::resend_manuscript))
        .route("/{id}/change-template", post(manuscripts::change_template))
}

/// Top-level custom-send route, merged beside `/manuscripts`.
pub fn custom_send_router() -> Router<AppState> {
    Router::new().route("/custom-send", post(manuscripts::custom_send))
}
