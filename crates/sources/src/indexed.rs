//! Index-backed source
//!
//! Serves analysis lookups and restaurant queries straight out of a
//! shared, read-only [`DataIndex`]. Stands in for the hosted database
//! (and its `get_nearby_restaurants` radius query) in local runs.

use crate::error::SourceError;
use crate::traits::{AnalysisLookup, RestaurantSource};
use async_trait::async_trait;
use health_data::{Coordinate, DataIndex, HealthAnalysis, Restaurant};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Analysis lookup and restaurant source over an in-memory index.
#[derive(Clone)]
pub struct IndexedSource {
    /// Shared reference to the data index (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,
}

impl IndexedSource {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }
}

#[async_trait]
impl AnalysisLookup for IndexedSource {
    async fn get_analysis(&self, id: &str) -> Result<Option<HealthAnalysis>, SourceError> {
        Ok(self.data_index.get_analysis(id).cloned())
    }
}

#[async_trait]
impl RestaurantSource for IndexedSource {
    #[instrument(skip(self), fields(lat = center.latitude, lng = center.longitude))]
    async fn nearby(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<Restaurant>, SourceError> {
        let data_index = Arc::clone(&self.data_index);
        // The radius scan fans out over rayon; keep it off the async workers.
        let restaurants =
            tokio::task::spawn_blocking(move || data_index.restaurants_within(center, radius_km))
                .await
                .map_err(|e| SourceError::unavailable("restaurant index", e.to_string()))?;

        debug!("Found {} restaurants within {} km", restaurants.len(), radius_km);
        Ok(restaurants)
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: usize) -> Result<Vec<Restaurant>, SourceError> {
        let restaurants = self.data_index.list_restaurants(limit);
        debug!("Listed {} restaurants", restaurants.len());
        Ok(restaurants)
    }
}
