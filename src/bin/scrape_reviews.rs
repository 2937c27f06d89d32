//! Download the newest Play Store reviews of an app into a CSV file.
//!
//! ```sh
//! cargo run --bin scrape_reviews -- --app-id com.global.foodpanda.android --count 8000
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sentiment_api::domain::ports::{ReviewQuery, ReviewSource};
use sentiment_api::infrastructure::play_store::GooglePlayReviews;
use sentiment_api::infrastructure::reviews_csv::save_reviews;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Play Store package name
    #[arg(long, default_value = "com.global.foodpanda.android")]
    app_id: String,

    /// Store country code
    #[arg(long, default_value = "pk")]
    country: String,

    /// Review language
    #[arg(long, default_value = "en")]
    lang: String,

    /// Number of reviews to fetch (newest first)
    #[arg(long, default_value_t = 8000)]
    count: usize,

    /// Output CSV path (default: data/raw_reviews.csv in the crate directory)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/raw_reviews.csv"));

    let query = ReviewQuery {
        app_id: args.app_id,
        country: args.country,
        lang: args.lang,
        count: args.count,
    };
    info!(
        "Scraping {} reviews for {} ({}/{})",
        query.count, query.app_id, query.lang, query.country
    );

    let source = GooglePlayReviews::new();
    let reviews = source
        .fetch_reviews(&query)
        .await
        .with_context(|| format!("Failed to fetch reviews for {}", query.app_id))?;

    let saved = save_reviews(&output, &reviews)?;
    println!("Saved {} raw reviews to {}", saved, output.display());
    Ok(())
}
