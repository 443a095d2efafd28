use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
    /// H3 resolution used for the cached `h3_cell` column. Changing this
    /// requires re-deriving every stored cell.
    pub h3_resolution: u8,
    /// Lower bound applied when a discovery filter gives only a maximum age.
    pub discovery_min_age: u16,
    /// Upper bound applied when a discovery filter gives only a minimum age.
    pub discovery_max_age: u16,
    pub discovery_page_size: u16,
    pub swipe_intent_ttl_days: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            h3_resolution: env::var("H3_RESOLUTION")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("H3_RESOLUTION must be 0-15")?,
            discovery_min_age: env::var("DISCOVERY_MIN_AGE")
                .unwrap_or_else(|_| "18".to_string())
                .parse()
                .context("DISCOVERY_MIN_AGE must be a valid number")?,
            discovery_max_age: env::var("DISCOVERY_MAX_AGE")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("DISCOVERY_MAX_AGE must be a valid number")?,
            discovery_page_size: env::var("DISCOVERY_PAGE_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DISCOVERY_PAGE_SIZE must be a valid number")?,
            swipe_intent_ttl_days: env::var("SWIPE_INTENT_TTL_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("SWIPE_INTENT_TTL_DAYS must be a valid number")?,
        })
    }
}
