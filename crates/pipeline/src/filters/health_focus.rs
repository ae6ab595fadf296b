//! Filter to keep only restaurants that answer every active health signal.

use crate::signals::SignalSet;
use crate::traits::Filter;
use anyhow::Result;
use sources::Candidate;

/// Keeps a candidate only if its `health_focus` satisfies every active signal.
///
/// ## Algorithm
/// - No active signals: every candidate passes untouched
/// - Otherwise: for each active signal's rule, at least one of the rule's
///   tags must be declared by the restaurant (AND across signals, OR
///   within a signal)
/// - A restaurant with no `health_focus` satisfies nothing
pub struct HealthFocusFilter;

impl Filter for HealthFocusFilter {
    fn name(&self) -> &str {
        "HealthFocusFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, signals: &SignalSet) -> Result<Vec<Candidate>> {
        if signals.is_empty() {
            return Ok(candidates);
        }

        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                signals
                    .active_rules()
                    .all(|rule| rule.is_satisfied_by(&candidate.restaurant))
            })
            .collect();
        Ok(filtered)
    }
}
