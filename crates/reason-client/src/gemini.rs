//! Gemini client for the Google Generative Language REST API.

use crate::error::ReasonError;
use crate::{JustificationGenerator, MAX_REASON_CHARS, normalize_reason};
use async_trait::async_trait;
use health_data::HealthAnalysis;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: String,
}

/// Generates justifications with a Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ReasonError> {
        if config.api_key.trim().is_empty() {
            return Err(ReasonError::Config("API key is empty".to_string()));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, ReasonError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                ReasonError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, body);
            return Err(ReasonError::Api {
                status: status.as_u16(),
                body,
            });
        }

        extract_text(&body)
    }
}

#[async_trait]
impl JustificationGenerator for GeminiClient {
    async fn generate(
        &self,
        restaurant_name: &str,
        analysis: &HealthAnalysis,
    ) -> Result<String, ReasonError> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(restaurant_name, analysis),
                }],
            }],
        };

        let text = self.call_gemini_api(request).await?;
        debug!("Generated justification for {}", restaurant_name);
        normalize_reason(&text).ok_or(ReasonError::EmptyResponse)
    }
}

/// Prompt sent for one restaurant and analysis.
pub fn build_prompt(restaurant_name: &str, analysis: &HealthAnalysis) -> String {
    format!(
        "Based on the following information, explain why this restaurant suits the user.\n\n\
         Restaurant: {}\n\
         Health status: {}\n\
         Risk level: {}\n\
         Dietary advice: {}\n\n\
         Give one short, specific reason tied to the user's health needs.\n\
         Plain text only, at most {} characters.",
        restaurant_name,
        analysis.health_status,
        analysis.risk_level,
        analysis.dietary_recommendations.general_advice,
        MAX_REASON_CHARS,
    )
}

/// First text part of the first candidate.
fn extract_text(body: &str) -> Result<String, ReasonError> {
    let response: GeminiResponse = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse Gemini response: {}", e);
        ReasonError::InvalidResponse(e.to_string())
    })?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or(ReasonError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_data::{DietaryRecommendations, HealthMetrics, HealthStatus, RiskLevel};

    fn analysis() -> HealthAnalysis {
        HealthAnalysis {
            id: "a1".to_string(),
            report_id: "rep1".to_string(),
            health_metrics: HealthMetrics::default(),
            risk_level: RiskLevel::High,
            health_status: HealthStatus::Fair,
            dietary_recommendations: DietaryRecommendations {
                general_advice: "Cut back on salt".to_string(),
                ..Default::default()
            },
            health_warnings: vec![],
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_prompt_carries_analysis_summary() {
        let prompt = build_prompt("Xinyi Greens", &analysis());

        assert!(prompt.contains("Restaurant: Xinyi Greens"));
        assert!(prompt.contains("Health status: fair"));
        assert!(prompt.contains("Risk level: high"));
        assert!(prompt.contains("Dietary advice: Cut back on salt"));
        assert!(prompt.contains("at most 100 characters"));
    }

    #[test]
    fn test_extract_text_takes_first_part() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Low-sodium broths."}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second candidate"}]}}
            ]
        }"#;

        assert_eq!(extract_text(body).unwrap(), "Low-sodium broths.");
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let err = extract_text(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, ReasonError::EmptyResponse));

        let err = extract_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap_err();
        assert!(matches!(err, ReasonError::EmptyResponse));
    }

    #[test]
    fn test_extract_text_rejects_garbage() {
        let err = extract_text("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ReasonError::InvalidResponse(_)));
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let err = GeminiClient::new(GeminiConfig::new("  ")).unwrap_err();
        assert!(matches!(err, ReasonError::Config(_)));
    }

    #[test]
    fn test_config_builder() {
        let config = GeminiConfig::new("key")
            .with_model("gemini-1.5-flash")
            .with_timeout(Duration::from_secs(3));
        let client = GeminiClient::new(config).unwrap();

        assert_eq!(client.model(), "gemini-1.5-flash");
        assert_eq!(client.config.timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let mut config = GeminiConfig::new("key").with_timeout(Duration::from_secs(2));
        config.base_url = "http://127.0.0.1:9".to_string();
        let client = GeminiClient::new(config).unwrap();

        let result = client.generate("Xinyi Greens", &analysis()).await;
        assert!(matches!(result, Err(ReasonError::Transport(_))));
    }
}
