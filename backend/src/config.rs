//! Configuration management for the activity explorer
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with EXPLORER_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Amadeus travel API configuration
    pub amadeus: AmadeusConfig,

    /// Historical weather archive configuration
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AmadeusConfig {
    /// API base URL, test environment by default
    pub base_url: String,

    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Upper bound on how long an access token is reused
    pub token_ttl_secs: u64,

    /// Maximum number of city suggestions requested
    pub city_max_results: u32,

    /// Timeout for token and city requests
    pub timeout_secs: u64,

    /// Timeout for the activity search
    pub activities_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Open-Meteo archive base URL
    pub archive_url: String,

    /// Timezone used to cut daily aggregates
    pub timezone: String,

    /// How long a looked-up day is reused
    pub cache_ttl_secs: u64,

    /// Upper bound on cached days; least recently used are evicted first
    pub cache_max_entries: usize,

    /// Request timeout
    pub timeout_secs: u64,
}

impl AmadeusConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn activities_timeout(&self) -> Duration {
        Duration::from_secs(self.activities_timeout_secs)
    }
}

impl WeatherConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("EXPLORER_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("amadeus.base_url", "https://test.api.amadeus.com")?
            .set_default("amadeus.client_id", "")?
            .set_default("amadeus.client_secret", "")?
            .set_default("amadeus.token_ttl_secs", 1800)?
            .set_default("amadeus.city_max_results", 8)?
            .set_default("amadeus.timeout_secs", 10)?
            .set_default("amadeus.activities_timeout_secs", 20)?
            .set_default("weather.archive_url", "https://archive-api.open-meteo.com")?
            .set_default("weather.timezone", "Europe/Berlin")?
            .set_default("weather.cache_ttl_secs", 6000)?
            .set_default("weather.cache_max_entries", 1000)?
            .set_default("weather.timeout_secs", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (EXPLORER_ prefix)
            .add_source(
                Environment::with_prefix("EXPLORER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
