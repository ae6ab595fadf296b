use health_data::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/sample");

    println!("Loading dataset from {}...\n", data_dir.display());

    let start = Instant::now();
    let index = DataIndex::load_from_dir(data_dir).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (restaurants, analyses) = index.counts();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Restaurants: {}", restaurants);
    println!("Analyses: {}", analyses);
}
