//! Configuration module for the sentiment API.
//!
//! Structured configuration loaded from environment variables (optionally via
//! a `.env` file), organized by concern: Server and CORS. The model artifact
//! location is deliberately not configurable; see
//! [`crate::application::ml::ModelLoader::default_model_path`].

mod cors_config;
mod server_config;

pub use cors_config::{AllowedOrigins, CorsEnvConfig, DEFAULT_ALLOWED_ORIGINS};
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub cors: CorsEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let cors = CorsEnvConfig::from_env().context("Failed to load CORS config")?;
        Ok(Self { server, cors })
    }
}
