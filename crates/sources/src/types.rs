//! Candidate types shared by sources and the pipeline.

use health_data::{Coordinate, Restaurant};

/// Which kind of query produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Geo-radius query; the restaurant carries `distance_km`
    Nearby,
    /// Unfiltered listing; no distance information
    Listing,
}

/// A restaurant under consideration for recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub restaurant: Restaurant,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new(restaurant: Restaurant, source: CandidateSource) -> Self {
        Self { restaurant, source }
    }

    /// Distance from the requester, only for location-aware candidates.
    pub fn distance_km(&self) -> Option<f64> {
        match self.source {
            CandidateSource::Nearby => self.restaurant.distance_km,
            CandidateSource::Listing => None,
        }
    }
}

/// Location part of a recommendation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoQuery {
    pub center: Coordinate,
    pub radius_km: f64,
}

impl GeoQuery {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            center: Coordinate::new(latitude, longitude),
            radius_km,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_valid() && self.radius_km.is_finite() && self.radius_km > 0.0
    }
}
