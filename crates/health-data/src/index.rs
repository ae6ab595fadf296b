//! In-memory index over restaurants and health analyses.
//!
//! The index owns the data; lookups hand out references and the radius
//! query hands out annotated clones so callers never see a
//! `distance_km` that belongs to someone else's query.

use crate::error::{DataLoadError, Result};
use crate::geo::Coordinate;
use crate::loader::{self, ANALYSES_FILE, RESTAURANTS_FILE};
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Holds every restaurant and analysis of a dataset.
///
/// Restaurants keep their insertion order so that unfiltered listings
/// are stable between calls.
#[derive(Debug, Default)]
pub struct DataIndex {
    restaurants: Vec<Restaurant>,
    restaurant_positions: HashMap<RestaurantId, usize>,
    analyses: HashMap<AnalysisId, HealthAnalysis>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dataset directory containing restaurants.json and analyses.json.
    ///
    /// Both files are parsed in parallel.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let restaurants_path = data_dir.join(RESTAURANTS_FILE);
        let analyses_path = data_dir.join(ANALYSES_FILE);

        let (restaurants, analyses) = rayon::join(
            || loader::parse_restaurants(&restaurants_path),
            || loader::parse_analyses(&analyses_path),
        );
        let restaurants = restaurants?;
        let analyses = analyses?;

        let mut index = DataIndex::new();
        for restaurant in restaurants {
            index.insert_restaurant(restaurant)?;
        }
        for analysis in analyses {
            index.insert_analysis(analysis)?;
        }

        let (restaurants, analyses) = index.counts();
        info!(
            "Loaded {} restaurants and {} analyses from {}",
            restaurants,
            analyses,
            data_dir.display()
        );
        Ok(index)
    }

    /// Insert a restaurant. Ids must be unique.
    pub fn insert_restaurant(&mut self, restaurant: Restaurant) -> Result<()> {
        if self.restaurant_positions.contains_key(&restaurant.id) {
            return Err(DataLoadError::DuplicateId {
                entity: "restaurant".to_string(),
                id: restaurant.id,
            });
        }
        self.restaurant_positions
            .insert(restaurant.id.clone(), self.restaurants.len());
        self.restaurants.push(restaurant);
        Ok(())
    }

    /// Insert an analysis. Ids must be unique.
    pub fn insert_analysis(&mut self, analysis: HealthAnalysis) -> Result<()> {
        if self.analyses.contains_key(&analysis.id) {
            return Err(DataLoadError::DuplicateId {
                entity: "analysis".to_string(),
                id: analysis.id,
            });
        }
        self.analyses.insert(analysis.id.clone(), analysis);
        Ok(())
    }

    pub fn get_restaurant(&self, id: &str) -> Option<&Restaurant> {
        self.restaurant_positions
            .get(id)
            .map(|&pos| &self.restaurants[pos])
    }

    pub fn get_analysis(&self, id: &str) -> Option<&HealthAnalysis> {
        self.analyses.get(id)
    }

    /// All analysis ids, sorted.
    pub fn analysis_ids(&self) -> Vec<AnalysisId> {
        let mut ids: Vec<AnalysisId> = self.analyses.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// All restaurants in insertion order.
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// The first `limit` restaurants in insertion order, without distance.
    pub fn list_restaurants(&self, limit: usize) -> Vec<Restaurant> {
        self.restaurants
            .iter()
            .take(limit)
            .map(|r| Restaurant {
                distance_km: None,
                ..r.clone()
            })
            .collect()
    }

    /// Restaurants within `radius_km` of `center`, nearest first.
    ///
    /// Each returned restaurant carries its `distance_km`. Equal distances
    /// keep insertion order.
    pub fn restaurants_within(&self, center: Coordinate, radius_km: f64) -> Vec<Restaurant> {
        let mut nearby: Vec<Restaurant> = self
            .restaurants
            .par_iter()
            .filter_map(|restaurant| {
                let distance = center.distance_to(&restaurant.coordinate());
                (distance <= radius_km).then(|| Restaurant {
                    distance_km: Some(distance),
                    ..restaurant.clone()
                })
            })
            .collect();

        nearby.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        nearby
    }

    /// (restaurants, analyses)
    pub fn counts(&self) -> (usize, usize) {
        (self.restaurants.len(), self.analyses.len())
    }
}
