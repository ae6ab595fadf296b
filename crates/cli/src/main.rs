use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use health_data::{calculate_distance, Coordinate, DataIndex, HealthAnalysis};
use pipeline::SignalSet;
use reason_client::{ReasonOrigin, TemplateGenerator};
use server::{
    RecommendationOrchestrator, RecommendationRequest, RestaurantRecommendation, ServerConfig,
};
use sources::{JsonlRecommendationStore, MemoryRecommendationStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// health-recs - Health-aware restaurant recommendations
#[derive(Parser)]
#[command(name = "health-recs")]
#[command(about = "Restaurant recommendations driven by health report analyses", long_about = None)]
struct Cli {
    /// Dataset directory (overrides HEALTH_RECS_DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get restaurant recommendations for a health analysis
    Recommend {
        /// Analysis ID to get recommendations for
        #[arg(long)]
        analysis_id: String,

        /// Latitude of the requester
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the requester
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Search radius in kilometers
        #[arg(long, requires = "lat")]
        radius: Option<f64>,

        /// User the recommendations are recorded for
        #[arg(long)]
        user_id: Option<String>,

        /// Number of recommendations to return (overrides HEALTH_RECS_TOP_N)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,

        /// Show the score breakdown for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Show an analysis with its metrics, signals and warnings
    Analysis {
        /// Analysis ID to display
        #[arg(long)]
        analysis_id: String,
    },

    /// List restaurants around a point, nearest first
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Search radius in kilometers (defaults to HEALTH_RECS_DEFAULT_RADIUS_KM)
        #[arg(long)]
        radius: Option<f64>,
    },

    /// Haversine distance between two points in kilometers
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lng1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lng2: f64,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env().context("Invalid configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    debug!("Configuration: {:?}", config.pipeline);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            analysis_id,
            lat,
            lng,
            radius,
            user_id,
            limit,
            explain,
        } => {
            let mut request = RecommendationRequest::new(analysis_id);
            if let (Some(lat), Some(lng)) = (lat, lng) {
                request = request.with_location(lat, lng, radius);
            }
            if let Some(user_id) = user_id {
                request = request.with_user(user_id);
            }
            if let Some(limit) = limit {
                config.pipeline.top_n = usize::try_from(limit)?;
            }
            handle_recommend(&config, request, explain).await?
        }
        Commands::Analysis { analysis_id } => handle_analysis(&config, &analysis_id)?,
        Commands::Nearby { lat, lng, radius } => {
            let radius = radius.unwrap_or(config.pipeline.default_radius_km);
            handle_nearby(&config, Coordinate::new(lat, lng), radius)?
        }
        Commands::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
        } => handle_distance(Coordinate::new(lat1, lng1), Coordinate::new(lat2, lng2))?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&config, requests, concurrent).await?,
    }

    Ok(())
}

/// Load the dataset named by the configuration
fn load_index(config: &ServerConfig) -> Result<Arc<DataIndex>> {
    println!("Loading dataset from {}...", config.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_dir(&config.data_dir).context("Failed to load dataset")?,
    );
    let (restaurants, analyses) = data_index.counts();
    println!(
        "{} Loaded {} restaurants and {} analyses in {:?}",
        "✓".green(),
        restaurants,
        analyses,
        start.elapsed()
    );
    Ok(data_index)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    config: &ServerConfig,
    request: RecommendationRequest,
    explain: bool,
) -> Result<()> {
    let data_index = load_index(config)?;

    let generator = config.build_generator()?;
    let store = Arc::new(JsonlRecommendationStore::new(
        config.recommendations_path.clone(),
    ));
    let orchestrator = RecommendationOrchestrator::from_index(data_index, generator, store)
        .with_config(config.pipeline);

    let response = orchestrator
        .get_recommendations(&request)
        .await
        .map_err(|e| anyhow!("[{}] {}", e.kind().as_str(), e))?;

    print_signals(&response.analysis);
    print_recommendations(&response.recommendations, explain);

    let fallbacks = response.fallback_count();
    if fallbacks > 0 {
        println!(
            "{} {} reason(s) used fallback text",
            "!".yellow(),
            fallbacks
        );
    }
    match response.persistence_error {
        Some(e) => println!("{} Recommendations were not saved: {}", "!".yellow(), e),
        None if !response.recommendations.is_empty() => println!(
            "{} Saved to {}",
            "✓".green(),
            config.recommendations_path.display()
        ),
        None => {}
    }
    Ok(())
}

/// Handle the 'analysis' command
fn handle_analysis(config: &ServerConfig, analysis_id: &str) -> Result<()> {
    let data_index = load_index(config)?;
    let analysis = data_index
        .get_analysis(analysis_id)
        .ok_or_else(|| anyhow!("Analysis {} not found", analysis_id))?;

    println!("{}", format!("Analysis: {}", analysis.id).bold().blue());
    println!("{}Report: {}", "• ".green(), analysis.report_id);
    println!("{}Risk level: {}", "• ".green(), analysis.risk_level);
    println!("{}Health status: {}", "• ".green(), analysis.health_status);

    let metrics = &analysis.health_metrics;
    let show = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v}"));
    println!("Metrics:");
    println!(
        "  - Blood pressure: {}/{} mmHg",
        show(metrics.systolic()),
        show(metrics.diastolic())
    );
    println!("  - Fasting blood sugar: {} mg/dL", show(metrics.fasting_blood_sugar()));
    println!("  - Total cholesterol: {} mg/dL", show(metrics.total_cholesterol()));

    print_signals(analysis);

    let diet = &analysis.dietary_recommendations;
    if !diet.recommended_foods.is_empty() {
        println!("Recommended foods: {}", diet.recommended_foods.join(", "));
    }
    if !diet.avoid_foods.is_empty() {
        println!("Avoid: {}", diet.avoid_foods.join(", "));
    }
    if !diet.general_advice.is_empty() {
        println!("Advice: {}", diet.general_advice);
    }
    for warning in &analysis.health_warnings {
        println!("{} {}", "!".yellow(), warning);
    }
    Ok(())
}

/// Handle the 'nearby' command
fn handle_nearby(config: &ServerConfig, center: Coordinate, radius_km: f64) -> Result<()> {
    if !center.is_valid() {
        bail!(
            "Coordinates ({}, {}) are out of range",
            center.latitude,
            center.longitude
        );
    }
    if !radius_km.is_finite() || radius_km <= 0.0 {
        bail!("Radius must be a positive number of kilometers");
    }

    let data_index = load_index(config)?;
    let restaurants = data_index.restaurants_within(center, radius_km);

    println!(
        "{}",
        format!("{} restaurants within {} km:", restaurants.len(), radius_km)
            .bold()
            .blue()
    );
    for restaurant in &restaurants {
        let tags = if restaurant.health_focus.is_empty() {
            "-".to_string()
        } else {
            restaurant.health_focus.join(", ")
        };
        println!(
            "{:>6.2} km  {} ({:.1}★) [{}]",
            restaurant.distance_km.unwrap_or_default(),
            restaurant.name,
            restaurant.rating,
            tags
        );
    }
    Ok(())
}

/// Handle the 'distance' command
fn handle_distance(from: Coordinate, to: Coordinate) -> Result<()> {
    if !from.is_valid() || !to.is_valid() {
        bail!("Coordinates are out of range");
    }
    let km = calculate_distance(from.latitude, from.longitude, to.latitude, to.longitude);
    println!("{:.3} km", km);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    config: &ServerConfig,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }

    let data_index = load_index(config)?;
    let analysis_ids = data_index.analysis_ids();
    if analysis_ids.is_empty() {
        bail!("Dataset has no analyses to benchmark");
    }

    // Template text and an in-memory store keep the numbers about the pipeline
    let orchestrator = RecommendationOrchestrator::from_index(
        data_index.clone(),
        Arc::new(TemplateGenerator::new()),
        Arc::new(MemoryRecommendationStore::new()),
    )
    .with_config(config.pipeline);

    // Random analyses, half of them with a location around central Taipei
    let requests_to_send: Vec<RecommendationRequest> = (0..requests)
        .map(|_| {
            let id = &analysis_ids[rand::random::<u32>() as usize % analysis_ids.len()];
            let request = RecommendationRequest::new(id.clone());
            if rand::random::<bool>() {
                let lat = 25.02 + rand::random::<f64>() * 0.04;
                let lng = 121.50 + rand::random::<f64>() * 0.08;
                request.with_location(lat, lng, None)
            } else {
                request
            }
        })
        .collect();

    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = vec![];
    for request in requests_to_send {
        let orchestrator = orchestrator.clone();
        let semaphore = semaphore.clone();
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let start = Instant::now();
            orchestrator.get_recommendations(&request).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / timings.len() as u32;
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile of an ascending, non-empty slice
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let rank = ((sorted.len() as f64 * p).ceil() as usize).clamp(1, sorted.len());
    sorted[rank - 1]
}

fn print_signals(analysis: &HealthAnalysis) {
    let signals = SignalSet::from_metrics(&analysis.health_metrics);
    if signals.is_empty() {
        println!("{}Signals: none", "• ".cyan());
        return;
    }
    let names: Vec<String> = signals
        .active_rules()
        .map(|rule| format!("{} (needs {})", rule.signal, rule.required_tags.join(" or ")))
        .collect();
    println!("{}Signals: {}", "• ".cyan(), names.join(", "));
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[RestaurantRecommendation], explain: bool) {
    println!("{}", "Restaurant Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  No restaurant matches this health profile.");
        return;
    }

    for (i, rec) in recommendations.iter().enumerate() {
        let distance = rec
            .restaurant
            .distance_km
            .map(|d| format!(" {:.2} km", d))
            .unwrap_or_default();
        println!(
            "{}. {} [{}]{} - Score: {:.2}",
            (i + 1).to_string().green(),
            rec.restaurant.name,
            rec.restaurant.health_focus.join(", "),
            distance,
            rec.score()
        );

        let reason = match rec.reason_origin {
            ReasonOrigin::Generated => rec.reason().normal(),
            ReasonOrigin::Fallback => rec.reason().dimmed(),
        };
        println!("   {}", reason);

        if explain {
            let b = &rec.breakdown;
            println!(
                "   base {:.2} + signals {:.2} + rating {:.2} + distance {:.2} = {:.2} (total {:.2}, reason {})",
                b.base,
                b.signal_bonus,
                b.rating_bonus,
                b.distance_bonus,
                b.raw(),
                b.total,
                rec.reason_origin.as_str()
            );
        }
    }
}
