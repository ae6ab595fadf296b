//! # Sources Crate
//!
//! External collaborators of the recommendation pipeline, expressed as
//! traits, plus the implementations used in local runs.
//!
//! ## Components
//!
//! ### Traits
//! - `AnalysisLookup`: analysis id -> `HealthAnalysis` or not-found
//! - `RestaurantSource`: geo-radius query (with `distance_km`) or an
//!   unfiltered, limited listing
//! - `RecommendationStore`: single batched append of results
//!
//! ### Implementations
//! - `IndexedSource`: lookups and queries over a shared `DataIndex`
//! - `JsonlRecommendationStore`: append-only JSON Lines file
//! - `MemoryRecommendationStore`: in-memory, handy for tests
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{IndexedSource, RestaurantSource};
//! use health_data::{Coordinate, DataIndex};
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_dir("data/sample".as_ref())?);
//! let source = IndexedSource::new(data_index);
//! let nearby = source.nearby(Coordinate::new(25.0330, 121.5654), 5.0).await?;
//! ```

pub mod error;
pub mod indexed;
pub mod store;
pub mod traits;
pub mod types;

pub use error::SourceError;
pub use indexed::IndexedSource;
pub use store::{JsonlRecommendationStore, MemoryRecommendationStore};
pub use traits::{AnalysisLookup, RecommendationStore, RestaurantSource};
pub use types::{Candidate, CandidateSource, GeoQuery};

#[cfg(test)]
mod tests {
    use super::*;
    use health_data::Restaurant;

    fn restaurant(distance_km: Option<f64>) -> Restaurant {
        Restaurant {
            id: "r1".to_string(),
            name: "Test Kitchen".to_string(),
            address: String::new(),
            latitude: 25.0,
            longitude: 121.5,
            phone: None,
            website: None,
            rating: 4.0,
            price_range: None,
            cuisine_types: vec![],
            health_focus: vec![],
            opening_hours: String::new(),
            distance_km,
        }
    }

    #[test]
    fn test_candidate_distance_only_when_nearby() {
        let nearby = Candidate::new(restaurant(Some(0.8)), CandidateSource::Nearby);
        let listed = Candidate::new(restaurant(Some(0.8)), CandidateSource::Listing);

        assert_eq!(nearby.distance_km(), Some(0.8));
        assert_eq!(listed.distance_km(), None);
    }

    #[test]
    fn test_geo_query_validation() {
        assert!(GeoQuery::new(25.0330, 121.5654, 5.0).is_valid());
        assert!(!GeoQuery::new(25.0330, 121.5654, 0.0).is_valid());
        assert!(!GeoQuery::new(25.0330, 121.5654, f64::INFINITY).is_valid());
        assert!(!GeoQuery::new(95.0, 121.5654, 5.0).is_valid());
    }
}
