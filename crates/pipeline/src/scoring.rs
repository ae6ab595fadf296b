//! Recommendation scoring.
//!
//! A score starts at [`BASE_SCORE`] and collects bonuses for matched
//! signals, the restaurant's rating and, for location-aware candidates,
//! proximity. The sum is clamped to `[0, 1]`.

use crate::signals::SignalSet;
use sources::Candidate;

pub const BASE_SCORE: f64 = 0.5;
/// Multiplied by the 0-5 rating.
pub const RATING_WEIGHT: f64 = 0.1;
pub const NEAR_DISTANCE_KM: f64 = 1.0;
pub const NEAR_BONUS: f64 = 0.1;
pub const MID_DISTANCE_KM: f64 = 3.0;
pub const MID_BONUS: f64 = 0.05;

/// Components of a score, kept so callers can explain a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub signal_bonus: f64,
    pub rating_bonus: f64,
    pub distance_bonus: f64,
    /// Clamped sum of the components
    pub total: f64,
}

impl ScoreBreakdown {
    /// Sum before clamping.
    pub fn raw(&self) -> f64 {
        self.base + self.signal_bonus + self.rating_bonus + self.distance_bonus
    }
}

/// Stateless scorer; cheap to share across concurrent tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer;

impl Scorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, candidate: &Candidate, signals: &SignalSet) -> ScoreBreakdown {
        let restaurant = &candidate.restaurant;

        let signal_bonus = signals
            .active_rules()
            .filter(|rule| rule.is_satisfied_by(restaurant))
            .map(|rule| rule.score_delta)
            .sum();

        let rating_bonus = restaurant.rating * RATING_WEIGHT;

        let distance_bonus = match candidate.distance_km() {
            Some(d) if d < NEAR_DISTANCE_KM => NEAR_BONUS,
            Some(d) if d < MID_DISTANCE_KM => MID_BONUS,
            _ => 0.0,
        };

        let mut breakdown = ScoreBreakdown {
            base: BASE_SCORE,
            signal_bonus,
            rating_bonus,
            distance_bonus,
            total: 0.0,
        };
        breakdown.total = clamp_score(breakdown.raw());
        breakdown
    }
}

/// Clamp to `[0, 1]`, mapping NaN and infinities to 0.
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_data::Restaurant;
    use sources::CandidateSource;

    fn candidate(
        rating: f64,
        tags: &[&str],
        distance_km: Option<f64>,
        source: CandidateSource,
    ) -> Candidate {
        Candidate::new(
            Restaurant {
                id: "r1".to_string(),
                name: "Scored".to_string(),
                address: String::new(),
                latitude: 25.0,
                longitude: 121.5,
                phone: None,
                website: None,
                rating,
                price_range: None,
                cuisine_types: vec![],
                health_focus: tags.iter().map(|t| t.to_string()).collect(),
                opening_hours: String::new(),
                distance_km,
            },
            source,
        )
    }

    fn all_signals() -> SignalSet {
        SignalSet {
            hypertensive: true,
            hyperglycemic: true,
            hypercholesterolemic: true,
        }
    }

    #[test]
    fn test_best_case_clamps_to_one() {
        let c = candidate(
            5.0,
            &["low-sodium", "low-sugar", "low-fat"],
            Some(0.5),
            CandidateSource::Nearby,
        );
        let breakdown = Scorer::new().score(&c, &all_signals());

        assert!((breakdown.signal_bonus - 0.6).abs() < 1e-9);
        assert!((breakdown.rating_bonus - 0.5).abs() < 1e-9);
        assert_eq!(breakdown.distance_bonus, NEAR_BONUS);
        assert!(breakdown.raw() > 1.0);
        assert_eq!(breakdown.total, 1.0);
    }

    #[test]
    fn test_baseline_is_half() {
        let c = candidate(0.0, &[], None, CandidateSource::Listing);
        let breakdown = Scorer::new().score(&c, &SignalSet::default());

        assert_eq!(breakdown.total, 0.5);
        assert_eq!(breakdown.signal_bonus, 0.0);
        assert_eq!(breakdown.distance_bonus, 0.0);
    }

    #[test]
    fn test_distance_bands() {
        let scorer = Scorer::new();
        let signals = SignalSet::default();

        let mid = candidate(0.0, &[], Some(2.0), CandidateSource::Nearby);
        assert_eq!(scorer.score(&mid, &signals).distance_bonus, MID_BONUS);

        let far = candidate(0.0, &[], Some(4.0), CandidateSource::Nearby);
        assert_eq!(scorer.score(&far, &signals).distance_bonus, 0.0);

        // Listing candidates never earn proximity, even with a stale distance.
        let listed = candidate(0.0, &[], Some(0.2), CandidateSource::Listing);
        assert_eq!(scorer.score(&listed, &signals).distance_bonus, 0.0);
    }

    #[test]
    fn test_tags_without_signals_earn_nothing() {
        let c = candidate(3.0, &["low-sodium", "keto"], None, CandidateSource::Listing);
        let breakdown = Scorer::new().score(&c, &SignalSet::default());

        assert_eq!(breakdown.signal_bonus, 0.0);
        assert!((breakdown.total - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_keto_counts_for_hyperglycemia() {
        let signals = SignalSet {
            hyperglycemic: true,
            ..Default::default()
        };
        let c = candidate(0.0, &["keto"], None, CandidateSource::Listing);

        assert!((Scorer::new().score(&c, &signals).total - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let scorer = Scorer::new();
        for rating in [-10.0, 0.0, 2.5, 5.0, 50.0, f64::NAN, f64::INFINITY] {
            for distance in [None, Some(0.0), Some(1.5), Some(10.0)] {
                let c = candidate(rating, &["low-fat"], distance, CandidateSource::Nearby);
                let total = scorer.score(&c, &all_signals()).total;
                assert!((0.0..=1.0).contains(&total), "score {total} out of range");
            }
        }
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(f64::NEG_INFINITY), 0.0);
        assert_eq!(clamp_score(-0.3), 0.0);
        assert_eq!(clamp_score(0.42), 0.42);
        assert_eq!(clamp_score(1.7), 1.0);
    }
}
