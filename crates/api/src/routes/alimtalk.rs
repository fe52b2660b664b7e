//! Route definitions for manual notification sends and the send log.
//!
//! ```text
//! POST   /send    manual_send
//! GET    /logs    list_logs
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alimtalk;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send", post(alimtalk::manual_send))
        .route("/logs", get(alimtalk::list_logs))
}
