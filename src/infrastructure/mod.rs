pub mod core;
pub mod play_store;
pub mod reviews_csv;
