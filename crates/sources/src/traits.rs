//! Collaborator traits the recommendation pipeline depends on.
//!
//! Each trait is object safe so the orchestrator can hold them behind
//! `Arc<dyn ...>` and tests can swap in hand-written mocks.

use crate::error::SourceError;
use async_trait::async_trait;
use health_data::{Coordinate, HealthAnalysis, Recommendation, Restaurant};

/// Resolves an analysis id to its record.
#[async_trait]
pub trait AnalysisLookup: Send + Sync {
    /// `Ok(None)` means the id does not exist; `Err` means the lookup itself failed.
    async fn get_analysis(&self, id: &str) -> Result<Option<HealthAnalysis>, SourceError>;
}

/// Produces restaurant candidates.
#[async_trait]
pub trait RestaurantSource: Send + Sync {
    /// Restaurants within `radius_km` of `center`, annotated with `distance_km`.
    async fn nearby(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<Restaurant>, SourceError>;

    /// Up to `limit` restaurants without distance information.
    async fn list(&self, limit: usize) -> Result<Vec<Restaurant>, SourceError>;
}

/// Append-only sink for produced recommendations.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Write the whole batch in one append.
    async fn append(&self, batch: &[Recommendation]) -> Result<(), SourceError>;
}
