//! Health signals derived from raw metrics.
//!
//! A signal is a boolean condition computed against a fixed cutoff.
//! Which restaurant tags answer a signal, and how much a match is worth,
//! lives in [`SIGNAL_RULES`] so that adding a signal is a table entry
//! rather than another branch in the filter and the scorer.

use health_data::{HealthMetrics, Restaurant};
use std::fmt;

/// Systolic pressure above this is hypertensive (mmHg).
pub const SYSTOLIC_THRESHOLD: f64 = 140.0;
/// Diastolic pressure above this is hypertensive (mmHg).
pub const DIASTOLIC_THRESHOLD: f64 = 90.0;
/// Fasting blood sugar above this is hyperglycemic (mg/dL).
pub const FASTING_SUGAR_THRESHOLD: f64 = 126.0;
/// Total cholesterol above this is hypercholesterolemic (mg/dL).
pub const TOTAL_CHOLESTEROL_THRESHOLD: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Hypertensive,
    Hyperglycemic,
    Hypercholesterolemic,
}

impl Signal {
    pub const ALL: [Signal; 3] = [
        Signal::Hypertensive,
        Signal::Hyperglycemic,
        Signal::Hypercholesterolemic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Signal::Hypertensive => "hypertensive",
            Signal::Hyperglycemic => "hyperglycemic",
            Signal::Hypercholesterolemic => "hypercholesterolemic",
        }
    }

    /// The table entry for this signal, looked up by key.
    pub fn rule(&self) -> Option<&'static SignalRule> {
        SIGNAL_RULES.iter().find(|rule| rule.signal == *self)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a signal to the tags that satisfy it and the score it earns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRule {
    pub signal: Signal,
    /// Any one of these tags satisfies the signal
    pub required_tags: &'static [&'static str],
    pub score_delta: f64,
}

impl SignalRule {
    pub fn is_satisfied_by(&self, restaurant: &Restaurant) -> bool {
        self.required_tags
            .iter()
            .any(|tag| restaurant.has_health_focus(tag))
    }
}

/// Active rules are reported in this order.
pub static SIGNAL_RULES: [SignalRule; 3] = [
    SignalRule {
        signal: Signal::Hypertensive,
        required_tags: &["low-sodium"],
        score_delta: 0.2,
    },
    SignalRule {
        signal: Signal::Hyperglycemic,
        required_tags: &["low-sugar", "keto"],
        score_delta: 0.2,
    },
    SignalRule {
        signal: Signal::Hypercholesterolemic,
        required_tags: &["low-fat"],
        score_delta: 0.2,
    },
];

/// The three signals derived from one metrics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalSet {
    pub hypertensive: bool,
    pub hyperglycemic: bool,
    pub hypercholesterolemic: bool,
}

impl SignalSet {
    /// Derive signals from metrics. Anything not reported counts as absent.
    pub fn from_metrics(metrics: &HealthMetrics) -> Self {
        let above = |value: Option<f64>, threshold: f64| value.is_some_and(|v| v > threshold);

        Self {
            hypertensive: above(metrics.systolic(), SYSTOLIC_THRESHOLD)
                || above(metrics.diastolic(), DIASTOLIC_THRESHOLD),
            hyperglycemic: above(metrics.fasting_blood_sugar(), FASTING_SUGAR_THRESHOLD),
            hypercholesterolemic: above(metrics.total_cholesterol(), TOTAL_CHOLESTEROL_THRESHOLD),
        }
    }

    pub fn is_active(&self, signal: Signal) -> bool {
        match signal {
            Signal::Hypertensive => self.hypertensive,
            Signal::Hyperglycemic => self.hyperglycemic,
            Signal::Hypercholesterolemic => self.hypercholesterolemic,
        }
    }

    /// Rules of the active signals, in table order.
    pub fn active_rules(&self) -> impl Iterator<Item = &'static SignalRule> + '_ {
        SIGNAL_RULES
            .iter()
            .filter(move |rule| self.is_active(rule.signal))
    }

    pub fn active(&self) -> Vec<Signal> {
        self.active_rules().map(|rule| rule.signal).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active_rules().next().is_none()
    }
}
