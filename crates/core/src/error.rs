use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// An unknown confirm token. Deliberately carries no detail so the public
    /// endpoint cannot be used to probe which tokens ever existed.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A confirmation action found no pending manuscripts left to act on.
    /// Carries the current status of the token's manuscript so the client UI
    /// can explain what already happened.
    #[error("Already processed: status is {status}")]
    AlreadyProcessed { status: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A failure in an outbound gateway (rewrite/generation).
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
