//! Typed errors for catalog, cart and chat operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommerceError>;

#[derive(Debug, Error)]
pub enum CommerceError {
    /// Malformed caller input (empty item list, unknown filter field).
    /// Surfaced to HTTP clients as 400.
    #[error("validation error: {0}")]
    Validation(String),

    /// Cart or product absent where its existence was required. Surfaced as 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// LLM or messaging provider call failed (network, auth, quota).
    /// Surfaced as 500 with the provider message for diagnostics.
    #[error("remote service error: {0}")]
    RemoteService(String),

    /// Store call failed. Surfaced as 500.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ai_client::AiError> for CommerceError {
    fn from(e: ai_client::AiError) -> Self {
        CommerceError::RemoteService(e.to_string())
    }
}
