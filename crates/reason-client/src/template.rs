//! Offline generator that fills a sentence template from the analysis.

use crate::error::ReasonError;
use crate::{JustificationGenerator, normalize_reason};
use async_trait::async_trait;
use health_data::{HealthAnalysis, RiskLevel};

/// Deterministic justifications, used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl JustificationGenerator for TemplateGenerator {
    async fn generate(
        &self,
        restaurant_name: &str,
        analysis: &HealthAnalysis,
    ) -> Result<String, ReasonError> {
        let focus = match analysis.risk_level {
            RiskLevel::High => "carefully chosen dishes",
            RiskLevel::Medium => "balanced options",
            RiskLevel::Low => "healthy choices",
        };

        let text = match analysis.dietary_recommendations.recommended_foods.first() {
            Some(food) => format!(
                "{} offers {} and {} for your {} health.",
                restaurant_name, focus, food, analysis.health_status
            ),
            None => format!(
                "{} offers {} for your {} health.",
                restaurant_name, focus, analysis.health_status
            ),
        };

        normalize_reason(&text).ok_or(ReasonError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_data::{DietaryRecommendations, HealthMetrics, HealthStatus};

    fn analysis(risk_level: RiskLevel, foods: &[&str]) -> HealthAnalysis {
        HealthAnalysis {
            id: "a1".to_string(),
            report_id: "rep1".to_string(),
            health_metrics: HealthMetrics::default(),
            risk_level,
            health_status: HealthStatus::Good,
            dietary_recommendations: DietaryRecommendations {
                recommended_foods: foods.iter().map(|f| f.to_string()).collect(),
                ..Default::default()
            },
            health_warnings: vec![],
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_template_mentions_restaurant_and_food() {
        let text = TemplateGenerator::new()
            .generate("Xinyi Greens", &analysis(RiskLevel::Medium, &["leafy greens"]))
            .await
            .unwrap();

        assert_eq!(
            text,
            "Xinyi Greens offers balanced options and leafy greens for your good health."
        );
    }

    #[tokio::test]
    async fn test_template_without_recommended_foods() {
        let text = TemplateGenerator::new()
            .generate("Keto Corner", &analysis(RiskLevel::High, &[]))
            .await
            .unwrap();

        assert_eq!(text, "Keto Corner offers carefully chosen dishes for your good health.");
    }

    #[tokio::test]
    async fn test_template_is_deterministic() {
        let generator = TemplateGenerator::new();
        let a = analysis(RiskLevel::Low, &["oats"]);

        let first = generator.generate("Oat House", &a).await.unwrap();
        let second = generator.generate("Oat House", &a).await.unwrap();
        assert_eq!(first, second);
    }
}
