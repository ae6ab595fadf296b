//! Justification text for restaurant recommendations.
//!
//! This crate provides:
//! - `JustificationGenerator`: restaurant name + health analysis -> short text
//! - `GeminiClient`: calls a Gemini model over HTTP
//! - `TemplateGenerator`: offline, deterministic text
//! - `generate_or_fallback`: best-effort wrapper that never fails
//!
//! Generation is best effort. Callers go through [`generate_or_fallback`],
//! which swaps in [`FALLBACK_REASON`] on any error and records that it did.

pub mod error;
pub mod gemini;
pub mod template;

use async_trait::async_trait;
use health_data::HealthAnalysis;
use tracing::warn;

pub use error::ReasonError;
pub use gemini::{GeminiClient, GeminiConfig};
pub use template::TemplateGenerator;

/// Longest justification kept, in characters.
pub const MAX_REASON_CHARS: usize = 100;

/// Substituted whenever generation fails.
pub const FALLBACK_REASON: &str =
    "Based on your health profile, this restaurant offers suitable meal choices.";

/// Produces a short free-text reason for recommending a restaurant.
#[async_trait]
pub trait JustificationGenerator: Send + Sync {
    async fn generate(
        &self,
        restaurant_name: &str,
        analysis: &HealthAnalysis,
    ) -> Result<String, ReasonError>;
}

/// Where a justification's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonOrigin {
    Generated,
    Fallback,
}

impl ReasonOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonOrigin::Generated => "generated",
            ReasonOrigin::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Justification {
    pub text: String,
    pub origin: ReasonOrigin,
}

impl Justification {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: ReasonOrigin::Generated,
        }
    }

    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_REASON.to_string(),
            origin: ReasonOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == ReasonOrigin::Fallback
    }
}

/// Ask `generator` for a reason, falling back to [`FALLBACK_REASON`] on error.
pub async fn generate_or_fallback(
    generator: &dyn JustificationGenerator,
    restaurant_name: &str,
    analysis: &HealthAnalysis,
) -> Justification {
    match generator.generate(restaurant_name, analysis).await {
        Ok(text) => Justification::generated(text),
        Err(e) => {
            warn!(
                "Justification for {} degraded to fallback: {}",
                restaurant_name, e
            );
            Justification::fallback()
        }
    }
}

/// Trim whitespace and cap at [`MAX_REASON_CHARS`]. `None` when nothing is left.
pub fn normalize_reason(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.char_indices().nth(MAX_REASON_CHARS) {
        Some((cut, _)) => Some(trimmed[..cut].trim_end().to_string()),
        None => Some(trimmed.to_string()),
    }
}
