//! Environment configuration.
//!
//! | variable | default |
//! |---|---|
//! | `HEALTH_RECS_DATA_DIR` | `data/sample` |
//! | `HEALTH_RECS_RECOMMENDATIONS_PATH` | `data/recommendations.jsonl` |
//! | `HEALTH_RECS_TOP_N` | 10 |
//! | `HEALTH_RECS_LISTING_LIMIT` | 20 |
//! | `HEALTH_RECS_DEFAULT_RADIUS_KM` | 5 |
//! | `GEMINI_API_KEY` | unset: offline template generator |
//! | `GEMINI_MODEL` | `gemini-pro` |
//! | `GEMINI_TIMEOUT_SECS` | 15 |

use crate::orchestrator::PipelineConfig;
use reason_client::{
    GeminiClient, GeminiConfig, JustificationGenerator, ReasonError, TemplateGenerator,
};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_DATA_DIR: &str = "data/sample";
pub const DEFAULT_RECOMMENDATIONS_PATH: &str = "data/recommendations.jsonl";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {var} value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub recommendations_path: PathBuf,
    pub pipeline: PipelineConfig,
    /// `None` selects the offline template generator
    pub gemini: Option<GeminiConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            recommendations_path: PathBuf::from(DEFAULT_RECOMMENDATIONS_PATH),
            pipeline: PipelineConfig::default(),
            gemini: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or is out of range
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = PipelineConfig::default();

        let top_n: usize = parse_or("HEALTH_RECS_TOP_N", &lookup, defaults.top_n)?;
        let listing_limit: usize =
            parse_or("HEALTH_RECS_LISTING_LIMIT", &lookup, defaults.listing_limit)?;
        let default_radius_km: f64 = parse_or(
            "HEALTH_RECS_DEFAULT_RADIUS_KM",
            &lookup,
            defaults.default_radius_km,
        )?;

        if top_n == 0 {
            return Err(invalid("HEALTH_RECS_TOP_N", "0", "must be at least 1"));
        }
        if !default_radius_km.is_finite() || default_radius_km <= 0.0 {
            return Err(invalid(
                "HEALTH_RECS_DEFAULT_RADIUS_KM",
                &default_radius_km.to_string(),
                "must be a positive number",
            ));
        }

        let gemini = match lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()) {
            Some(api_key) => {
                let timeout_secs: u64 = parse_or("GEMINI_TIMEOUT_SECS", &lookup, 15)?;
                let model = lookup("GEMINI_MODEL").unwrap_or_else(|| "gemini-pro".to_string());
                Some(
                    GeminiConfig::new(api_key)
                        .with_model(model)
                        .with_timeout(Duration::from_secs(timeout_secs)),
                )
            }
            None => None,
        };

        Ok(Self {
            data_dir: lookup("HEALTH_RECS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            recommendations_path: lookup("HEALTH_RECS_RECOMMENDATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RECOMMENDATIONS_PATH)),
            pipeline: PipelineConfig {
                top_n,
                listing_limit,
                default_radius_km,
            },
            gemini,
        })
    }

    /// Gemini when an API key is configured, otherwise the template generator.
    pub fn build_generator(&self) -> Result<Arc<dyn JustificationGenerator>, ReasonError> {
        match &self.gemini {
            Some(config) => {
                info!("Using Gemini model {} for justifications", config.model);
                Ok(Arc::new(GeminiClient::new(config.clone())?))
            }
            None => {
                info!("GEMINI_API_KEY not set, using template justifications");
                Ok(Arc::new(TemplateGenerator::new()))
            }
        }
    }
}

fn parse_or<T>(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &raw, &e.to_string())),
        None => Ok(default),
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("data/sample"));
        assert_eq!(
            config.recommendations_path,
            PathBuf::from("data/recommendations.jsonl")
        );
        assert_eq!(config.pipeline.top_n, 10);
        assert_eq!(config.pipeline.listing_limit, 20);
        assert_eq!(config.pipeline.default_radius_km, 5.0);
        assert!(config.gemini.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HEALTH_RECS_DATA_DIR", "/srv/health"),
            ("HEALTH_RECS_TOP_N", "5"),
            ("HEALTH_RECS_LISTING_LIMIT", " 50 "),
            ("HEALTH_RECS_DEFAULT_RADIUS_KM", "2.5"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-flash"),
            ("GEMINI_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/health"));
        assert_eq!(config.pipeline.top_n, 5);
        assert_eq!(config.pipeline.listing_limit, 50);
        assert_eq!(config.pipeline.default_radius_km, 2.5);

        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "secret");
        assert_eq!(gemini.model, "gemini-1.5-flash");
        assert_eq!(gemini.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_unparseable_number_is_an_error() {
        let err = ServerConfig::from_lookup(lookup_from(&[("HEALTH_RECS_TOP_N", "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains("HEALTH_RECS_TOP_N"));

        assert!(
            ServerConfig::from_lookup(lookup_from(&[("HEALTH_RECS_DEFAULT_RADIUS_KM", "-1")]))
                .is_err()
        );
        assert!(ServerConfig::from_lookup(lookup_from(&[("HEALTH_RECS_TOP_N", "0")])).is_err());
    }

    #[test]
    fn test_blank_api_key_means_offline() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini.is_none());
        assert!(config.build_generator().is_ok());
    }
}
