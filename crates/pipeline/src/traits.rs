//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to candidate sets.

use crate::signals::SignalSet;
use anyhow::Result;
use sources::Candidate;

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across request tasks
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - Retained candidates keep their relative order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `signals` - Health signals of the analysis being served
    fn apply(&self, candidates: Vec<Candidate>, signals: &SignalSet) -> Result<Vec<Candidate>>;
}
