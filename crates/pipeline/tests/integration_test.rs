//! Integration tests for the pipeline.
//!
//! These tests verify that signal extraction, filtering and scoring work
//! together over a realistic index query.

use health_data::{BloodPressure, BloodSugar, Coordinate, DataIndex, HealthMetrics, Restaurant};
use pipeline::filters::HealthFocusFilter;
use pipeline::{FilterPipeline, Scorer, SignalSet};
use sources::{Candidate, CandidateSource};
use std::sync::Arc;

const TAIPEI_101: (f64, f64) = (25.0330, 121.5654);

fn restaurant(id: &str, latitude: f64, longitude: f64, rating: f64, tags: &[&str]) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        name: format!("Restaurant {id}"),
        address: "Xinyi District, Taipei".to_string(),
        latitude,
        longitude,
        phone: None,
        website: None,
        rating,
        price_range: None,
        cuisine_types: vec!["taiwanese".to_string()],
        health_focus: tags.iter().map(|t| t.to_string()).collect(),
        opening_hours: "11:00-21:00".to_string(),
        distance_km: None,
    }
}

fn create_test_setup() -> (Arc<DataIndex>, Vec<Candidate>) {
    let mut index = DataIndex::new();

    // Next door, answers both signals
    index
        .insert_restaurant(restaurant("both", 25.0335, 121.5650, 4.5, &["low-sodium", "keto"]))
        .unwrap();
    // About 2 km away, answers both signals
    index
        .insert_restaurant(restaurant("mid", 25.0150, 121.5654, 4.0, &["low-sodium", "low-sugar"]))
        .unwrap();
    // Close, but only low-sodium
    index
        .insert_restaurant(restaurant("salt-only", 25.0340, 121.5660, 4.8, &["low-sodium"]))
        .unwrap();
    // Close, no tags at all
    index
        .insert_restaurant(restaurant("untagged", 25.0325, 121.5640, 5.0, &[]))
        .unwrap();
    // Outside a 5 km radius
    index
        .insert_restaurant(restaurant("far", 25.1000, 121.5654, 4.9, &["low-sodium", "keto"]))
        .unwrap();

    let index = Arc::new(index);

    let center = Coordinate::new(TAIPEI_101.0, TAIPEI_101.1);
    let candidates = index
        .restaurants_within(center, 5.0)
        .into_iter()
        .map(|r| Candidate::new(r, CandidateSource::Nearby))
        .collect();

    (index, candidates)
}

fn hypertensive_and_hyperglycemic() -> SignalSet {
    SignalSet::from_metrics(&HealthMetrics {
        blood_pressure: Some(BloodPressure {
            systolic: Some(150.0),
            diastolic: Some(92.0),
        }),
        blood_sugar: Some(BloodSugar {
            fasting: Some(131.0),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[test]
fn test_full_pipeline_filters_correctly() {
    let (_index, candidates) = create_test_setup();
    assert_eq!(candidates.len(), 4, "far restaurant is outside the radius");

    let signals = hypertensive_and_hyperglycemic();
    let pipeline = FilterPipeline::new().add_filter(HealthFocusFilter);

    let filtered = pipeline.apply(candidates, &signals).unwrap();

    let ids: Vec<&str> = filtered.iter().map(|c| c.restaurant.id.as_str()).collect();
    assert_eq!(ids, vec!["both", "mid"]);
}

#[test]
fn test_no_signals_keeps_everything() {
    let (_index, candidates) = create_test_setup();
    let before = candidates.clone();

    let pipeline = FilterPipeline::new().add_filter(HealthFocusFilter);
    let filtered = pipeline.apply(candidates, &SignalSet::default()).unwrap();

    assert_eq!(filtered, before);
}

#[test]
fn test_scoring_after_filtering() {
    let (_index, candidates) = create_test_setup();
    let signals = hypertensive_and_hyperglycemic();

    let filtered = FilterPipeline::new()
        .add_filter(HealthFocusFilter)
        .apply(candidates, &signals)
        .unwrap();

    let scorer = Scorer::new();
    let scores: Vec<f64> = filtered
        .iter()
        .map(|c| scorer.score(c, &signals).total)
        .collect();

    // both: 0.5 + 0.4 + 0.45 + 0.1 clamps to 1.0
    assert_eq!(scores[0], 1.0);
    // mid: 0.5 + 0.4 + 0.4 + 0.05 clamps to 1.0 too
    assert_eq!(scores[1], 1.0);
    for score in scores {
        assert!((0.0..=1.0).contains(&score));
    }
}

#[test]
fn test_listing_candidates_score_without_distance() {
    let (index, _) = create_test_setup();
    let signals = SignalSet::default();
    let scorer = Scorer::new();

    for restaurant in index.list_restaurants(20) {
        let expected = (0.5 + restaurant.rating * 0.1).min(1.0);
        let candidate = Candidate::new(restaurant, CandidateSource::Listing);
        let breakdown = scorer.score(&candidate, &signals);

        assert_eq!(breakdown.distance_bonus, 0.0);
        assert!((breakdown.total - expected).abs() < 1e-9);
    }
}
