// Text classification pipeline and its stages
pub mod ml;

// Request/response types of the prediction path
pub mod prediction;

// Port interfaces
pub mod ports;

// App-store review records
pub mod review;

pub mod sentiment;

// Domain-specific error types
pub mod errors;
