//! Error types for the adaptive tutor

use thiserror::Error;

/// Errors that can occur in the tutoring pipeline
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Tutorial session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TutorError {
    /// Whether this error reports a missing player or session
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TutorError::PlayerNotFound(_) | TutorError::SessionNotFound(_)
        )
    }
}
