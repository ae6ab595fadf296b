//! Simple test harness for the recommendation orchestrator.
//!
//! Loads the dataset named by the environment, then requests
//! recommendations for every analysis in it, once without a location and
//! once around Taipei 101.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use health_data::DataIndex;
use server::{RecommendationOrchestrator, RecommendationRequest, ServerConfig};
use sources::JsonlRecommendationStore;

const TAIPEI_101: (f64, f64) = (25.0330, 121.5654);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting health-recs server test harness");

    let config = ServerConfig::from_env()?;

    info!("Loading data index from {}...", config.data_dir.display());
    let data_index = Arc::new(DataIndex::load_from_dir(&config.data_dir)?);
    info!("Data index loaded successfully");

    let generator = config.build_generator()?;
    let store = Arc::new(JsonlRecommendationStore::new(config.recommendations_path.clone()));
    let orchestrator = RecommendationOrchestrator::from_index(data_index.clone(), generator, store)
        .with_config(config.pipeline);

    for analysis_id in data_index.analysis_ids() {
        let requests = [
            RecommendationRequest::new(analysis_id.clone()),
            RecommendationRequest::new(analysis_id.clone()).with_location(
                TAIPEI_101.0,
                TAIPEI_101.1,
                None,
            ),
        ];

        for request in &requests {
            let mode = if request.location.is_some() { "nearby" } else { "listing" };
            match orchestrator.get_recommendations(request).await {
                Ok(response) => {
                    info!(
                        "{} ({}): {} recommendations",
                        analysis_id,
                        mode,
                        response.recommendations.len()
                    );
                    for (i, rec) in response.recommendations.iter().enumerate() {
                        info!(
                            "{}. {} - Score: {:.3} [{}]",
                            i + 1,
                            rec.restaurant.name,
                            rec.score(),
                            rec.reason_origin.as_str()
                        );
                        info!("   {}", rec.reason());
                    }
                    if let Some(e) = response.persistence_error {
                        warn!("Recommendations were not saved: {}", e);
                    }
                }
                Err(e) => warn!("{} ({}) failed [{}]: {}", analysis_id, mode, e.kind().as_str(), e),
            }
        }
    }

    Ok(())
}
