//! Configuration management for the travelhub service
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and provides validation for all configuration settings. API keys are not
//! part of this configuration; see [`crate::credentials`].

use crate::TravelHubError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Upstream API endpoints
    pub upstream: UpstreamConfig,
    /// Per-endpoint deadlines
    pub timeouts: TimeoutConfig,
    /// Tour discovery tuning
    pub tours: ToursConfig,
    /// Assistant session limits
    pub chat: ChatConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Placeholder values used by the normalizer
    pub defaults: RecordDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whole-request deadline applied by the router
    pub request_timeout_seconds: u64,
    /// Maximum accepted request body
    pub body_limit_bytes: usize,
}

/// Upstream API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub hotels: SearchEndpoint,
    pub restaurants: SearchEndpoint,
    pub rentals: SearchEndpoint,
    /// Base URL of the tour partner API
    pub viator_base_url: String,
    /// Base URL of an OpenAI compatible chat API
    pub llm_base_url: String,
    pub llm_model: String,
    pub user_agent: String,
}

/// A RapidAPI style search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEndpoint {
    pub url: String,
    /// Value for the `X-RapidAPI-Host` header
    pub host: String,
    /// Query parameter carrying the location
    pub query_param: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub search_seconds: u64,
    pub destination_seconds: u64,
    pub product_seconds: u64,
    pub chat_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToursConfig {
    /// Forward window for destination product searches
    pub window_days: i64,
    /// Retries for the remote destination lookup
    pub destination_retries: u32,
    /// Raw products held before aggregation stops accumulating
    pub aggregate_raw_limit: usize,
    /// Products returned by aggregation
    pub aggregate_limit: usize,
    /// Products requested per upstream page
    pub page_size: u32,
    pub currency: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Conversations kept in memory, the least recently used is dropped
    pub max_sessions: usize,
    /// Conversations untouched for this long are dropped
    pub idle_minutes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
    /// OTLP/HTTP collector endpoint, traces are exported when set
    pub otlp_endpoint: Option<String>,
}

/// Per-field placeholder values applied by every normalizer profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecordDefaults {
    pub rating: String,
    pub currency: String,
    pub price: String,
    pub address: String,
    pub duration: String,
    /// Prefix of the placeholder image service, the item name is appended
    pub image_placeholder: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_seconds: 60,
            body_limit_bytes: 64 * 1024,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            hotels: SearchEndpoint {
                url: "https://travel-advisor.p.rapidapi.com/locations/search".to_string(),
                host: "travel-advisor.p.rapidapi.com".to_string(),
                query_param: "query".to_string(),
            },
            restaurants: SearchEndpoint {
                url: "https://tripadvisor16.p.rapidapi.com/api/v1/restaurant/searchLocation"
                    .to_string(),
                host: "tripadvisor16.p.rapidapi.com".to_string(),
                query_param: "query".to_string(),
            },
            rentals: SearchEndpoint {
                url: "https://airbnb13.p.rapidapi.com/search-location".to_string(),
                host: "airbnb13.p.rapidapi.com".to_string(),
                query_param: "location".to_string(),
            },
            viator_base_url: "https://api.viator.com/partner".to_string(),
            llm_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            user_agent: format!("travelhub/{}", crate::VERSION),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            search_seconds: 10,
            destination_seconds: 10,
            product_seconds: 15,
            chat_seconds: 15,
        }
    }
}

impl Default for ToursConfig {
    fn default() -> Self {
        Self {
            window_days: 90,
            destination_retries: 3,
            aggregate_raw_limit: 24,
            aggregate_limit: 8,
            page_size: 20,
            currency: "USD".to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            idle_minutes: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            rating: "4/5".to_string(),
            currency: "USD".to_string(),
            price: "Price not available".to_string(),
            address: "Address not available".to_string(),
            duration: "Flexible".to_string(),
            image_placeholder: "https://via.placeholder.com/400x300?text=".to_string(),
        }
    }
}

impl RecordDefaults {
    /// Placeholder image URL keyed off an item name
    #[must_use]
    pub fn image_for(&self, name: &str) -> String {
        format!("{}{}", self.image_placeholder, urlencoding::encode(name))
    }

    /// Numeric form of the default rating ("4/5" -> 4.0)
    #[must_use]
    pub fn rating_value(&self) -> f64 {
        self.rating
            .split('/')
            .next()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(0.0)
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var("TRAVELHUB_CONFIG").ok().map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVELHUB__SERVER__PORT=8080 style overrides
        builder = builder.add_source(
            Environment::with_prefix("TRAVELHUB")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to zeroed or blank fields
    pub fn apply_defaults(&mut self) {
        let timeouts = TimeoutConfig::default();
        if self.timeouts.search_seconds == 0 {
            self.timeouts.search_seconds = timeouts.search_seconds;
        }
        if self.timeouts.destination_seconds == 0 {
            self.timeouts.destination_seconds = timeouts.destination_seconds;
        }
        if self.timeouts.product_seconds == 0 {
            self.timeouts.product_seconds = timeouts.product_seconds;
        }
        if self.timeouts.chat_seconds == 0 {
            self.timeouts.chat_seconds = timeouts.chat_seconds;
        }
        if self.logging.level.is_empty() {
            self.logging.level = LoggingConfig::default().level;
        }
        if self.logging.format.is_empty() {
            self.logging.format = LoggingConfig::default().format;
        }
        if self.chat.max_sessions == 0 {
            self.chat.max_sessions = ChatConfig::default().max_sessions;
        }
        if self.chat.idle_minutes == 0 {
            self.chat.idle_minutes = ChatConfig::default().idle_minutes;
        }
        if self.tours.currency.is_empty() {
            self.tours.currency = ToursConfig::default().currency;
        }
        if self
            .logging
            .otlp_endpoint
            .as_ref()
            .is_some_and(|e| e.trim().is_empty())
        {
            self.logging.otlp_endpoint = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let timeouts = [
            ("search", self.timeouts.search_seconds),
            ("destination", self.timeouts.destination_seconds),
            ("product", self.timeouts.product_seconds),
            ("chat", self.timeouts.chat_seconds),
        ];
        for (name, seconds) in timeouts {
            if seconds > 120 {
                return Err(TravelHubError::config(format!(
                    "The {name} timeout cannot exceed 120 seconds"
                ))
                .into());
            }
        }

        if self.tours.window_days < 1 || self.tours.window_days > 365 {
            return Err(
                TravelHubError::config("Tour window must be between 1 and 365 days").into(),
            );
        }

        if self.tours.destination_retries > 10 {
            return Err(TravelHubError::config("Destination retries cannot exceed 10").into());
        }

        if self.tours.aggregate_limit == 0
            || self.tours.aggregate_limit > self.tours.aggregate_raw_limit
        {
            return Err(TravelHubError::config(
                "Aggregate limit must be positive and not exceed the raw limit",
            )
            .into());
        }

        if self.chat.max_sessions > 100_000 {
            return Err(TravelHubError::config("Chat sessions cannot exceed 100000").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelHubError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelHubError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("hotels", self.upstream.hotels.url.as_str()),
            ("restaurants", self.upstream.restaurants.url.as_str()),
            ("rentals", self.upstream.rentals.url.as_str()),
            ("viator", self.upstream.viator_base_url.as_str()),
            ("llm", self.upstream.llm_base_url.as_str()),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelHubError::config(format!(
                    "The {name} upstream URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Socket address the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
