pub mod client;
pub mod parser;

pub use client::{GooglePlayReviews, MAX_REVIEWS_PER_PAGE};
