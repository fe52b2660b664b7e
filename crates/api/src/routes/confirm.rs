//! Route definitions for the public confirmation endpoint.
//!
//! ```text
//! GET    /{token}    get_by_token
//! POST   /{token}    act_by_token (approve / request revision)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::confirm;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{token}",
        get(confirm::get_by_token).post(confirm::act_by_token),
    )
}
