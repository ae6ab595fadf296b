//! Filter implementations for the candidate pipeline.

pub mod health_focus;

pub use health_focus::HealthFocusFilter;
