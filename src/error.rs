use std::time::Duration;

use thiserror::Error;

/// Failure of an external collaborator (embedding, grammar or sentiment service).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by [`crate::scoring::RubricScorer::analyze`] and collaborator startup.
#[derive(Debug, Error)]
pub enum RubricError {
    #[error("Empty transcript")]
    EmptyTranscript,

    #[error("invalid duration: {0} seconds (must be a positive number)")]
    InvalidDuration(f64),

    #[error("{service} unavailable: {source}")]
    CollaboratorUnavailable {
        service: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("{service} failed: {source}")]
    Collaborator {
        service: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("analysis timed out after {0:?}")]
    TimedOut(Duration),
}

impl RubricError {
    pub(crate) fn collaborator(service: &'static str, source: ServiceError) -> Self {
        Self::Collaborator { service, source }
    }

    pub(crate) fn unavailable(service: &'static str, source: ServiceError) -> Self {
        Self::CollaboratorUnavailable { service, source }
    }

    /// True for input problems the caller can fix (as opposed to service failures).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyTranscript | Self::InvalidDuration(_))
    }
}
