//! Fit the sentiment pipeline on a reviews CSV and write the model artifact.
//!
//! ```sh
//! cargo run --bin train -- --input data/raw_reviews.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sentiment_api::application::ml::ModelLoader;
use sentiment_api::application::ml::trainer::{
    Evaluation, evaluate, load_training_set, save_pipeline, train,
};
use sentiment_api::domain::ml::TfidfParams;
use sentiment_api::domain::sentiment::Sentiment;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Reviews CSV with `content` and `score` columns
    #[arg(long, default_value = "data/raw_reviews.csv")]
    input: PathBuf,

    /// Artifact path (default: the path the server loads from)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_ratio: f64,

    /// Shuffle seed for the hold-out split
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Additive smoothing of the Naive Bayes classifier
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Ignore terms seen in fewer documents than this
    #[arg(long, default_value_t = 1)]
    min_df: usize,

    /// Vocabulary cap. 0 = unbounded.
    #[arg(long, default_value_t = 20_000)]
    max_features: usize,

    /// Disable train/test split (train on 100% of data). Use after validation.
    #[arg(long)]
    no_split: bool,
}

fn print_evaluation(eval: &Evaluation) {
    println!("\n══════════════════════════════════════════════════════");
    println!("  HOLD-OUT EVALUATION");
    println!("══════════════════════════════════════════════════════");
    println!(
        "  Accuracy: {:.2}% ({}/{})",
        eval.accuracy() * 100.0,
        eval.correct,
        eval.total
    );
    for (label, (correct, total)) in &eval.per_class {
        let recall = if *total == 0 {
            0.0
        } else {
            *correct as f64 / *total as f64
        };
        println!(
            "    {:<9} recall {:.2}% ({}/{})",
            label,
            recall * 100.0,
            correct,
            total
        );
    }
    println!("══════════════════════════════════════════════════════\n");
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    if !(0.0..1.0).contains(&args.test_ratio) {
        anyhow::bail!("test-ratio must be in [0, 1), got: {}", args.test_ratio);
    }

    println!("Loading training data from {:?}", args.input);
    let dataset = load_training_set(&args.input)?;
    if dataset.is_empty() {
        anyhow::bail!("No labeled rows found in {}", args.input.display());
    }

    println!("\nLabel distribution:");
    let counts = dataset.label_counts();
    for sentiment in Sentiment::all() {
        let label = sentiment.to_string();
        println!("  {:<9} {}", label, counts.get(&label).copied().unwrap_or(0));
    }

    let params = TfidfParams {
        min_df: args.min_df,
        max_features: (args.max_features > 0).then_some(args.max_features),
        ..TfidfParams::default()
    };

    let (train_set, test_set) = if args.no_split {
        (dataset, Default::default())
    } else {
        dataset.split(args.test_ratio, args.seed)
    };
    println!(
        "\nTraining on {} rows, evaluating on {} rows",
        train_set.len(),
        test_set.len()
    );

    let pipeline = train(&train_set, params, args.alpha)?;

    if !test_set.is_empty() {
        let eval = evaluate(&pipeline, &test_set).context("Evaluation failed")?;
        print_evaluation(&eval);
    }

    let output = args.output.unwrap_or_else(ModelLoader::default_model_path);
    save_pipeline(&pipeline, &output)?;
    println!("Model saved to {}", output.display());
    Ok(())
}
