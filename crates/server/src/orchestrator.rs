//! # Recommendation Orchestrator
//!
//! This module coordinates the entire recommendation pipeline:
//! 1. Validate the request
//! 2. Look up the health analysis
//! 3. Fetch candidates (radius query with a location, listing without)
//! 4. Extract health signals and apply filters
//! 5. Score and justify every survivor concurrently
//! 6. Sort by score and keep the top N
//! 7. Persist the batch, reporting but not failing on store errors

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use health_data::{DataIndex, HealthAnalysis, Recommendation, Restaurant, UserId};
use pipeline::filters::HealthFocusFilter;
use pipeline::{FilterPipeline, ScoreBreakdown, Scorer, SignalSet};
use reason_client::{JustificationGenerator, ReasonOrigin, generate_or_fallback};
use sources::{
    AnalysisLookup, Candidate, CandidateSource, GeoQuery, IndexedSource, RecommendationStore,
    RestaurantSource,
};

use crate::error::RecommendationError;

/// Tunables of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    /// Recommendations kept after sorting
    pub top_n: usize,
    /// Restaurants fetched when the request has no location
    pub listing_limit: usize,
    /// Radius used when a location comes without one
    pub default_radius_km: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            listing_limit: 20,
            default_radius_km: 5.0,
        }
    }
}

/// Requester position for location-aware recommendations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub analysis_id: String,
    pub location: Option<LocationQuery>,
    pub user_id: Option<UserId>,
}

impl RecommendationRequest {
    pub fn new(analysis_id: impl Into<String>) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            location: None,
            user_id: None,
        }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64, radius_km: Option<f64>) -> Self {
        self.location = Some(LocationQuery {
            latitude,
            longitude,
            radius_km,
        });
        self
    }

    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// One ranked restaurant with its persisted record and score explanation.
#[derive(Debug, Clone)]
pub struct RestaurantRecommendation {
    pub restaurant: Restaurant,
    pub record: Recommendation,
    pub breakdown: ScoreBreakdown,
    pub reason_origin: ReasonOrigin,
}

impl RestaurantRecommendation {
    pub fn score(&self) -> f64 {
        self.record.score
    }

    pub fn reason(&self) -> &str {
        &self.record.reason
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationResponse {
    /// At most `top_n`, highest score first
    pub recommendations: Vec<RestaurantRecommendation>,
    pub analysis: HealthAnalysis,
    /// Set when the store rejected the batch; the list is still valid
    pub persistence_error: Option<String>,
}

impl RecommendationResponse {
    pub fn fallback_count(&self) -> usize {
        self.recommendations
            .iter()
            .filter(|r| r.reason_origin == ReasonOrigin::Fallback)
            .count()
    }
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    analyses: Arc<dyn AnalysisLookup>,
    restaurants: Arc<dyn RestaurantSource>,
    generator: Arc<dyn JustificationGenerator>,
    store: Arc<dyn RecommendationStore>,
    filter_pipeline: Arc<FilterPipeline>,
    scorer: Scorer,
    config: PipelineConfig,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator with the health-focus filter and default config.
    pub fn new(
        analyses: Arc<dyn AnalysisLookup>,
        restaurants: Arc<dyn RestaurantSource>,
        generator: Arc<dyn JustificationGenerator>,
        store: Arc<dyn RecommendationStore>,
    ) -> Self {
        Self {
            analyses,
            restaurants,
            generator,
            store,
            filter_pipeline: Arc::new(FilterPipeline::new().add_filter(HealthFocusFilter)),
            scorer: Scorer::new(),
            config: PipelineConfig::default(),
        }
    }

    /// Serve analyses and restaurants from one in-memory index.
    pub fn from_index(
        data_index: Arc<DataIndex>,
        generator: Arc<dyn JustificationGenerator>,
        store: Arc<dyn RecommendationStore>,
    ) -> Self {
        let source = Arc::new(IndexedSource::new(data_index));
        Self::new(source.clone(), source, generator, store)
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_filter_pipeline(mut self, filter_pipeline: FilterPipeline) -> Self {
        self.filter_pipeline = Arc::new(filter_pipeline);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Main entry point: ranked, justified recommendations for one analysis.
    #[instrument(skip(self, request), fields(analysis_id = %request.analysis_id))]
    pub async fn get_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, RecommendationError> {
        let start_time = Instant::now();

        let geo = self.validate(request)?;

        let analysis = self.lookup_analysis(&request.analysis_id).await?;

        let candidates = self.fetch_candidates(geo).await?;
        info!("Fetched {} candidates", candidates.len());

        let signals = SignalSet::from_metrics(&analysis.health_metrics);
        debug!("Active signals: {:?}", signals.active());

        let filtered = self.apply_filters(candidates, &signals)?;
        info!("Filtering complete, {} candidates remain", filtered.len());

        let scored = self
            .score_all(filtered, &signals, &analysis, request.user_id.as_ref())
            .await;

        let recommendations = self.rank_and_select(scored);

        let persistence_error = self.persist(&recommendations).await;

        info!(
            "Returning {} recommendations in {:.2?}",
            recommendations.len(),
            start_time.elapsed()
        );

        Ok(RecommendationResponse {
            recommendations,
            analysis,
            persistence_error,
        })
    }

    /// Reject malformed requests before any collaborator is called.
    fn validate(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Option<GeoQuery>, RecommendationError> {
        if request.analysis_id.trim().is_empty() {
            return Err(RecommendationError::InvalidRequest(
                "analysis id is empty".to_string(),
            ));
        }

        let Some(location) = request.location else {
            return Ok(None);
        };

        let geo = GeoQuery::new(
            location.latitude,
            location.longitude,
            location.radius_km.unwrap_or(self.config.default_radius_km),
        );

        if !geo.center.is_valid() {
            return Err(RecommendationError::InvalidRequest(format!(
                "coordinates ({}, {}) are out of range",
                location.latitude, location.longitude
            )));
        }
        if !geo.is_valid() {
            return Err(RecommendationError::InvalidRequest(format!(
                "radius {} km must be a positive number",
                geo.radius_km
            )));
        }

        Ok(Some(geo))
    }

    async fn lookup_analysis(&self, analysis_id: &str) -> Result<HealthAnalysis, RecommendationError> {
        self.analyses
            .get_analysis(analysis_id)
            .await
            .map_err(|e| RecommendationError::upstream("Analysis lookup", e))?
            .ok_or_else(|| RecommendationError::AnalysisNotFound {
                analysis_id: analysis_id.to_string(),
            })
    }

    async fn fetch_candidates(
        &self,
        geo: Option<GeoQuery>,
    ) -> Result<Vec<Candidate>, RecommendationError> {
        let (restaurants, source) = match geo {
            Some(geo) => (
                self.restaurants.nearby(geo.center, geo.radius_km).await,
                CandidateSource::Nearby,
            ),
            None => (
                self.restaurants.list(self.config.listing_limit).await,
                CandidateSource::Listing,
            ),
        };

        let restaurants =
            restaurants.map_err(|e| RecommendationError::upstream("Candidate fetch", e))?;

        Ok(restaurants
            .into_iter()
            .map(|restaurant| Candidate::new(restaurant, source))
            .collect())
    }

    fn apply_filters(
        &self,
        candidates: Vec<Candidate>,
        signals: &SignalSet,
    ) -> Result<Vec<Candidate>, RecommendationError> {
        self.filter_pipeline
            .apply(candidates, signals)
            .map_err(|e| RecommendationError::Internal(format!("filter pipeline: {e:#}")))
    }

    /// Score and justify each candidate concurrently, preserving input order.
    async fn score_all(
        &self,
        candidates: Vec<Candidate>,
        signals: &SignalSet,
        analysis: &HealthAnalysis,
        user_id: Option<&UserId>,
    ) -> Vec<RestaurantRecommendation> {
        let tasks = candidates.into_iter().map(|candidate| async move {
            let breakdown = self.scorer.score(&candidate, signals);
            let justification =
                generate_or_fallback(self.generator.as_ref(), &candidate.restaurant.name, analysis)
                    .await;

            let record = Recommendation::new(
                user_id.cloned(),
                analysis.id.clone(),
                candidate.restaurant.id.clone(),
                breakdown.total,
                justification.text,
            );

            RestaurantRecommendation {
                restaurant: candidate.restaurant,
                record,
                breakdown,
                reason_origin: justification.origin,
            }
        });

        let scored = join_all(tasks).await;

        let fallbacks = scored
            .iter()
            .filter(|r| r.reason_origin == ReasonOrigin::Fallback)
            .count();
        if fallbacks > 0 {
            warn!(
                "{} of {} justifications used fallback text",
                fallbacks,
                scored.len()
            );
        }

        scored
    }

    /// Sort by score DESC (stable) and keep the top N.
    fn rank_and_select(
        &self,
        mut scored: Vec<RestaurantRecommendation>,
    ) -> Vec<RestaurantRecommendation> {
        scored.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.config.top_n);
        scored
    }

    /// Single batched append. Returns the failure message instead of failing.
    async fn persist(&self, recommendations: &[RestaurantRecommendation]) -> Option<String> {
        if recommendations.is_empty() {
            debug!("Nothing to persist");
            return None;
        }

        let batch: Vec<Recommendation> = recommendations.iter().map(|r| r.record.clone()).collect();
        match self.store.append(&batch).await {
            Ok(()) => {
                debug!("Persisted {} recommendations", batch.len());
                None
            }
            Err(e) => {
                warn!("Failed to persist {} recommendations: {}", batch.len(), e);
                Some(e.to_string())
            }
        }
    }
}
