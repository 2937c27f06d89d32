//! Cross-origin policy configuration parsing from environment variables.

use anyhow::Result;
use std::env;
use std::str::FromStr;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Which browser origins may call the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Permissive: `*`
    Any,
    List(Vec<String>),
}

impl FromStr for AllowedOrigins {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "*" {
            return Ok(Self::Any);
        }

        let origins: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| o.trim_end_matches('/').to_string())
            .collect();

        if origins.is_empty() {
            anyhow::bail!("CORS_ALLOWED_ORIGINS must be '*' or a comma-separated list of origins");
        }
        if let Some(bad) = origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            anyhow::bail!("Invalid origin in CORS_ALLOWED_ORIGINS: {}", bad);
        }

        Ok(Self::List(origins))
    }
}

/// CORS environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CorsEnvConfig {
    pub allowed_origins: AllowedOrigins,
}

impl Default for CorsEnvConfig {
    fn default() -> Self {
        Self {
            allowed_origins: AllowedOrigins::List(
                DEFAULT_ALLOWED_ORIGINS
                    .split(',')
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }
}

impl CorsEnvConfig {
    pub fn from_env() -> Result<Self> {
        let raw = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());
        Ok(Self {
            allowed_origins: raw.parse()?,
        })
    }

    pub fn permissive() -> Self {
        Self {
            allowed_origins: AllowedOrigins::Any,
        }
    }
}
