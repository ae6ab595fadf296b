//! Pipeline for signal extraction, filtering and scoring of restaurant candidates.
//!
//! This crate provides:
//! - Health signals derived from metrics, with a declarative signal table
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - Scorer for ranking the survivors
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. `SignalSet::from_metrics` turns an analysis into active signals
//! 2. Filters remove candidates that miss a tag an active signal requires
//! 3. `Scorer` computes a bounded score for each remaining candidate
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, Scorer, SignalSet};
//! use pipeline::filters::HealthFocusFilter;
//!
//! let signals = SignalSet::from_metrics(&analysis.health_metrics);
//! let pipeline = FilterPipeline::new().add_filter(HealthFocusFilter);
//! let filtered = pipeline.apply(candidates, &signals)?;
//!
//! let scorer = Scorer::new();
//! let scores: Vec<_> = filtered.iter().map(|c| scorer.score(c, &signals)).collect();
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod scoring;
pub mod signals;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use scoring::{ScoreBreakdown, Scorer};
pub use signals::{SIGNAL_RULES, Signal, SignalRule, SignalSet};
pub use traits::Filter;
