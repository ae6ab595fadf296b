//! # Health Data Crate
//!
//! Domain types and dataset handling for the health-aware restaurant
//! recommender.
//!
//! ## Main Components
//!
//! - **types**: HealthMetrics, HealthAnalysis, Restaurant, Recommendation
//! - **geo**: haversine distance between coordinates
//! - **loader**: parse JSON dataset files
//! - **index**: in-memory DataIndex with a geo-radius query
//! - **error**: error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use health_data::{Coordinate, DataIndex};
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_dir(Path::new("data/sample"))?;
//! let analysis = index.get_analysis("analysis-hypertension").unwrap();
//! let nearby = index.restaurants_within(Coordinate::new(25.0330, 121.5654), 5.0);
//! ```

pub mod error;
pub mod geo;
pub mod index;
pub mod loader;
pub mod types;

pub use error::{DataLoadError, Result};
pub use geo::{Coordinate, calculate_distance};
pub use index::DataIndex;
pub use types::{
    // Type aliases
    AnalysisId,
    ReportId,
    RestaurantId,
    UserId,
    // Core types
    BloodPressure,
    BloodSugar,
    BodyWeight,
    Cholesterol,
    DietaryRecommendations,
    HealthAnalysis,
    HealthMetrics,
    KidneyFunction,
    LiverFunction,
    Recommendation,
    Restaurant,
    Thyroid,
    // Enums
    HealthStatus,
    PriceRange,
    RiskLevel,
};
