//! Example: Fetch restaurant candidates around a point
//!
//! Run with: cargo run --package sources --example fetch_candidates
//!
//! This example shows how to:
//! 1. Load the sample dataset
//! 2. Run a geo-radius query around Taipei 101
//! 3. Run the unfiltered listing
//! 4. Display the results

use health_data::{Coordinate, DataIndex};
use sources::{IndexedSource, RestaurantSource};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Candidate Fetch Example ===\n");

    let start = Instant::now();
    let data_index = Arc::new(DataIndex::load_from_dir(Path::new("data/sample"))?);
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let source = IndexedSource::new(data_index);
    let center = Coordinate::new(25.0330, 121.5654);

    let start = Instant::now();
    let nearby = source.nearby(center, 3.0).await?;
    println!("Nearby (3 km) in {:?}:", start.elapsed());
    for restaurant in &nearby {
        println!(
            "  {:<28} {:>5.2} km  rating {:.1}  [{}]",
            restaurant.name,
            restaurant.distance_km.unwrap_or_default(),
            restaurant.rating,
            restaurant.health_focus.join(", ")
        );
    }

    let listed = source.list(5).await?;
    println!("\nListing (first 5):");
    for restaurant in &listed {
        println!("  {:<28} rating {:.1}", restaurant.name, restaurant.rating);
    }

    Ok(())
}
