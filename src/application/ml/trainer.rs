//! Offline fitting of the sentiment pipeline from a reviews CSV.

use crate::domain::ml::{Estimator, SentimentPipeline, TfidfParams};
use crate::domain::sentiment::Sentiment;
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Columns the trainer needs from a reviews CSV. Other columns are ignored.
#[derive(Debug, Deserialize)]
struct TrainingRecord {
    content: Option<String>,
    score: Option<u8>,
    /// Manual label overriding the star score when present
    sentiment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub texts: Vec<String>,
    pub labels: Vec<String>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn push(&mut self, text: String, label: Sentiment) {
        self.texts.push(text);
        self.labels.push(label.to_string());
    }

    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Shuffle with a fixed seed and split off `test_ratio` of rows for evaluation.
    pub fn split(&self, test_ratio: f64, seed: u64) -> (TrainingSet, TrainingSet) {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let test_len = ((self.len() as f64) * test_ratio.clamp(0.0, 1.0)).round() as usize;
        let (test_idx, train_idx) = indices.split_at(test_len);

        let pick = |idx: &[usize]| TrainingSet {
            texts: idx.iter().map(|&i| self.texts[i].clone()).collect(),
            labels: idx.iter().map(|&i| self.labels[i].clone()).collect(),
        };
        (pick(train_idx), pick(test_idx))
    }
}

/// Read `content`/`score` (and optional `sentiment`) rows into a labelled set.
pub fn read_training_set<R: Read>(reader: R) -> Result<TrainingSet> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut set = TrainingSet::default();
    let mut skipped = 0usize;

    for (row, record) in csv_reader.deserialize::<TrainingRecord>().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV row {}", row + 1))?;

        let Some(content) = record.content.filter(|c| !c.trim().is_empty()) else {
            skipped += 1;
            continue;
        };

        let manual = record
            .sentiment
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<Sentiment>)
            .transpose()
            .with_context(|| format!("Invalid sentiment label on row {}", row + 1))?;

        match manual.or(record.score.map(Sentiment::from_score)) {
            Some(label) => set.push(content, label),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} rows without content or label", skipped);
    }
    Ok(set)
}

pub fn load_training_set(path: &Path) -> Result<TrainingSet> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_training_set(file)
}

pub fn train(set: &TrainingSet, params: TfidfParams, alpha: f64) -> Result<SentimentPipeline> {
    let mut pipeline = SentimentPipeline::new(params, alpha);
    info!(
        "Fitting pipeline [{}] on {} rows",
        pipeline.steps().join(" -> "),
        set.len()
    );
    pipeline
        .fit(&set.texts, &set.labels)
        .context("Failed to fit pipeline")?;
    info!(
        "Fitted vocabulary of {} terms, classes {:?}",
        pipeline.vectorizer.n_features(),
        pipeline.classifier.classes()
    );
    Ok(pipeline)
}

#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub total: usize,
    pub correct: usize,
    /// label -> (correct, total)
    pub per_class: BTreeMap<String, (usize, usize)>,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

pub fn evaluate(pipeline: &SentimentPipeline, set: &TrainingSet) -> Result<Evaluation> {
    let predictions = pipeline.predict(&set.texts)?;
    let mut eval = Evaluation::default();

    for (predicted, actual) in predictions.iter().zip(&set.labels) {
        let entry = eval.per_class.entry(actual.clone()).or_insert((0, 0));
        entry.1 += 1;
        eval.total += 1;
        if predicted == actual {
            entry.0 += 1;
            eval.correct += 1;
        }
    }
    Ok(eval)
}

/// Write the artifact, creating parent directories as needed.
pub fn save_pipeline(pipeline: &SentimentPipeline, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, pipeline).context("Failed to serialize pipeline")?;
    writer.flush()?;
    info!("Saved pipeline to {}", path.display());
    Ok(())
}
