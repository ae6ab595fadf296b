//! Loader for JSON dataset files.
//!
//! A dataset directory holds two files, each a JSON array:
//! - restaurants.json: `[Restaurant, ...]`
//! - analyses.json: `[HealthAnalysis, ...]`

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const RESTAURANTS_FILE: &str = "restaurants.json";
pub const ANALYSES_FILE: &str = "analyses.json";

/// Read a JSON array of records from `path`.
fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| DataLoadError::ParseError {
        file: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        source,
    })
}

/// Parse restaurants.json and validate every record.
pub fn parse_restaurants(path: &Path) -> Result<Vec<Restaurant>> {
    let restaurants: Vec<Restaurant> = read_json_array(path)?;
    for restaurant in &restaurants {
        validate_restaurant(restaurant)?;
    }
    Ok(restaurants)
}

/// Parse analyses.json.
pub fn parse_analyses(path: &Path) -> Result<Vec<HealthAnalysis>> {
    let analyses: Vec<HealthAnalysis> = read_json_array(path)?;
    for analysis in &analyses {
        if analysis.id.trim().is_empty() {
            return Err(DataLoadError::InvalidValue {
                field: "analysis.id".to_string(),
                value: analysis.id.clone(),
            });
        }
    }
    Ok(analyses)
}

fn validate_restaurant(restaurant: &Restaurant) -> Result<()> {
    if restaurant.id.trim().is_empty() {
        return Err(DataLoadError::InvalidValue {
            field: "restaurant.id".to_string(),
            value: restaurant.id.clone(),
        });
    }
    if !(0.0..=5.0).contains(&restaurant.rating) {
        return Err(DataLoadError::InvalidValue {
            field: format!("rating of {}", restaurant.id),
            value: restaurant.rating.to_string(),
        });
    }
    if !restaurant.coordinate().is_valid() {
        return Err(DataLoadError::InvalidValue {
            field: format!("coordinates of {}", restaurant.id),
            value: format!("({}, {})", restaurant.latitude, restaurant.longitude),
        });
    }
    Ok(())
}
