//! Route definitions for the rewrite/generation proxies.
//!
//! ```text
//! POST   /rewrite            rewrite
//! POST   /custom-generate    custom_generate
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::rewrite;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rewrite", post(rewrite::rewrite))
        .route("/custom-generate", post(rewrite::custom_generate))
}
