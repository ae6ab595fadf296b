//! Failures of a recommendation request.

use sources::SourceError;
use thiserror::Error;

/// Stable category of a [`RecommendationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    UpstreamFailure,
    InvalidRequest,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::UpstreamFailure => "upstream_failure",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Terminal failures. No partial list accompanies any of these.
#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("Analysis not found: {analysis_id}")]
    AnalysisNotFound { analysis_id: String },

    #[error("{stage} failed: {source}")]
    Upstream {
        stage: &'static str,
        #[source]
        source: SourceError,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecommendationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecommendationError::AnalysisNotFound { .. } => ErrorKind::NotFound,
            RecommendationError::Upstream { .. } => ErrorKind::UpstreamFailure,
            RecommendationError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            RecommendationError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn upstream(stage: &'static str, source: SourceError) -> Self {
        RecommendationError::Upstream { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        let not_found = RecommendationError::AnalysisNotFound {
            analysis_id: "a1".to_string(),
        };
        assert_eq!(not_found.kind().as_str(), "not_found");
        assert_eq!(not_found.to_string(), "Analysis not found: a1");

        let upstream = RecommendationError::upstream(
            "Candidate fetch",
            SourceError::unavailable("restaurants", "timeout"),
        );
        assert_eq!(upstream.kind().as_str(), "upstream_failure");
        assert!(upstream.to_string().starts_with("Candidate fetch failed"));

        assert_eq!(
            RecommendationError::InvalidRequest("x".into()).kind().as_str(),
            "invalid_request"
        );
        assert_eq!(RecommendationError::Internal("x".into()).kind().as_str(), "internal");
    }
}
