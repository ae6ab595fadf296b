//! Core domain types for health analyses, restaurants and recommendations.
//!
//! Every metric in [`HealthMetrics`] is optional: an absent value means the
//! report did not include it, never that it was zero. JSON `null` and a
//! missing key deserialize the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::geo::Coordinate;

/// Treat an explicit `null` list the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque identifier of a health analysis
pub type AnalysisId = String;

/// Opaque identifier of the uploaded report an analysis was derived from
pub type ReportId = String;

/// Opaque identifier of a restaurant
pub type RestaurantId = String;

/// Opaque identifier of the user a recommendation was produced for
pub type UserId = String;

// =============================================================================
// Health metrics
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    #[serde(default)]
    pub systolic: Option<f64>,
    #[serde(default)]
    pub diastolic: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BloodSugar {
    #[serde(default)]
    pub fasting: Option<f64>,
    #[serde(default)]
    pub postprandial: Option<f64>,
    #[serde(default)]
    pub hba1c: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cholesterol {
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub hdl: Option<f64>,
    #[serde(default)]
    pub ldl: Option<f64>,
    #[serde(default)]
    pub triglycerides: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiverFunction {
    #[serde(default)]
    pub alt: Option<f64>,
    #[serde(default)]
    pub ast: Option<f64>,
    #[serde(default)]
    pub ggt: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KidneyFunction {
    #[serde(default)]
    pub creatinine: Option<f64>,
    #[serde(default)]
    pub egfr: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thyroid {
    #[serde(default)]
    pub tsh: Option<f64>,
    #[serde(default)]
    pub t3: Option<f64>,
    #[serde(default)]
    pub t4: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyWeight {
    /// Kilograms
    #[serde(default)]
    pub current: Option<f64>,
    /// Centimeters
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub bmi: Option<f64>,
}

/// Structured metrics extracted from a medical report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    #[serde(default)]
    pub blood_pressure: Option<BloodPressure>,
    #[serde(default)]
    pub blood_sugar: Option<BloodSugar>,
    #[serde(default)]
    pub cholesterol: Option<Cholesterol>,
    #[serde(default)]
    pub liver_function: Option<LiverFunction>,
    #[serde(default)]
    pub kidney_function: Option<KidneyFunction>,
    #[serde(default)]
    pub thyroid: Option<Thyroid>,
    #[serde(default)]
    pub weight: Option<BodyWeight>,
}

impl HealthMetrics {
    pub fn systolic(&self) -> Option<f64> {
        self.blood_pressure.as_ref()?.systolic
    }

    pub fn diastolic(&self) -> Option<f64> {
        self.blood_pressure.as_ref()?.diastolic
    }

    pub fn fasting_blood_sugar(&self) -> Option<f64> {
        self.blood_sugar.as_ref()?.fasting
    }

    pub fn total_cholesterol(&self) -> Option<f64> {
        self.cholesterol.as_ref()?.total
    }
}

// =============================================================================
// Health analysis
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Fair => "fair",
            HealthStatus::Poor => "poor",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietaryRecommendations {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recommended_foods: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub avoid_foods: Vec<String>,
    #[serde(default)]
    pub general_advice: String,
}

/// AI-produced assessment of one report. Read-only once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAnalysis {
    pub id: AnalysisId,
    pub report_id: ReportId,
    pub health_metrics: HealthMetrics,
    pub risk_level: RiskLevel,
    pub health_status: HealthStatus,
    #[serde(default)]
    pub dietary_recommendations: DietaryRecommendations,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub health_warnings: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Restaurants
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    Low,
    Medium,
    High,
}

/// A restaurant candidate.
///
/// `distance_km` is only populated by location-aware queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// 0-5 scale
    pub rating: f64,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cuisine_types: Vec<String>,
    /// Declared health tags such as "low-sodium". Missing means none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub health_focus: Vec<String>,
    #[serde(default)]
    pub opening_hours: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl Restaurant {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Exact, case-sensitive tag membership.
    pub fn has_health_focus(&self, tag: &str) -> bool {
        self.health_focus.iter().any(|t| t == tag)
    }
}

// =============================================================================
// Recommendations
// =============================================================================

/// A scored, justified pairing of a restaurant with an analysis.
///
/// Written once by the recommendation pipeline and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: uuid::Uuid,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub analysis_id: AnalysisId,
    pub restaurant_id: RestaurantId,
    /// Always within `0.0..=1.0`
    pub score: f64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn new(
        user_id: Option<UserId>,
        analysis_id: AnalysisId,
        restaurant_id: RestaurantId,
        score: f64,
        reason: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id,
            analysis_id,
            restaurant_id,
            score,
            reason,
            created_at: Utc::now(),
        }
    }
}
