//! Server crate for the health-aware restaurant recommender.
//!
//! This crate contains the orchestrator that coordinates all components
//! of the recommendation pipeline, its error taxonomy and the
//! environment configuration used by the binaries.

pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::{ConfigError, ServerConfig};
pub use error::{ErrorKind, RecommendationError};
pub use orchestrator::{
    LocationQuery, PipelineConfig, RecommendationOrchestrator, RecommendationRequest,
    RecommendationResponse, RestaurantRecommendation,
};
