//! Errors raised by external collaborators.

use thiserror::Error;

/// Failure of an analysis lookup, candidate source or recommendation store.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The backing service could not answer
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SourceError {
    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }
}
