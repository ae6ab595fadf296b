use thiserror::Error;

/// Errors that can occur when generating a justification
#[derive(Error, Debug)]
pub enum ReasonError {
    #[error("Failed to reach text generation service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Text generation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from text generation service: {0}")]
    InvalidResponse(String),

    #[error("Text generation service returned no text")]
    EmptyResponse,

    #[error("Text generation is misconfigured: {0}")]
    Config(String),
}
