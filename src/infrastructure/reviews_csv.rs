use crate::domain::review::Review;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write reviews with a header row. Returns the number of rows written.
pub fn write_reviews<W: Write>(writer: W, reviews: &[Review]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for review in reviews {
        csv_writer
            .serialize(review)
            .with_context(|| format!("Failed to write review {}", review.review_id))?;
    }
    csv_writer.flush().context("Failed to flush CSV writer")?;
    Ok(reviews.len())
}

/// Write reviews to `path`, creating the parent directory first.
pub fn save_reviews(path: &Path, reviews: &[Review]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_reviews(file, reviews)
}

pub fn read_reviews(path: &Path) -> Result<Vec<Review>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to open {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<Review>, _>>()
        .context("Failed to parse reviews CSV")
}
