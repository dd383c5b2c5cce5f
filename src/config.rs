//! Configuration management for the itinerary planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Root configuration structure for the planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Third-party provider endpoints and keys
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Transient session store settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Limits and locale used while planning
    #[serde(default)]
    pub planning: PlanningConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// PEM certificate, only used with the `tls` feature
    pub tls_cert_path: Option<String>,
    /// PEM private key, only used with the `tls` feature
    pub tls_key_path: Option<String>,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for geocoding, weather, content, hotel and news calls
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u32,
    /// Timeout for each image source lookup
    #[serde(default = "default_image_timeout")]
    pub image_timeout_seconds: u32,
    /// Timeout for language-model text and image generation
    #[serde(default = "default_llm_timeout")]
    pub llm_timeout_seconds: u32,
    /// Transient-failure retries; zero keeps every call single-shot
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Endpoint and credential of one provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; the provider is disabled when absent
    pub api_key: Option<String>,
    /// Base URL, filled with the provider default when empty
    #[serde(default)]
    pub base_url: String,
}

impl ProviderConfig {
    fn with_base_url(base_url: &str) -> Self {
        Self {
            api_key: None,
            base_url: base_url.to_string(),
        }
    }

    /// The key, if one is configured and non-blank
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.key().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub geocoding: ProviderConfig,
    #[serde(default)]
    pub forecast: ProviderConfig,
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default)]
    pub geoapify: ProviderConfig,
    #[serde(default)]
    pub serpapi: ProviderConfig,
    #[serde(default)]
    pub unsplash: ProviderConfig,
    #[serde(default)]
    pub duckduckgo: ProviderConfig,
    #[serde(default)]
    pub wikipedia: ProviderConfig,
    #[serde(default)]
    pub news: ProviderConfig,
}

/// Session store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a generated itinerary stays available
    #[serde(default = "default_session_ttl")]
    pub ttl_minutes: u32,
    /// Interval of the expired-session sweep
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u32,
}

/// Limits and locale used while planning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Currency of hotel prices and the trip budget
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Country code used for hotel search localisation
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_geocode_count")]
    pub geocode_count: u32,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    #[serde(default = "default_curated_attractions")]
    pub curated_attractions: usize,
    #[serde(default = "default_place_attractions")]
    pub place_attractions: usize,
    #[serde(default = "default_max_attractions")]
    pub max_attractions: usize,
    #[serde(default = "default_activities")]
    pub activities: usize,
    #[serde(default = "default_max_hotels")]
    pub max_hotels: usize,
    #[serde(default = "default_news_items")]
    pub news_items: usize,
    /// Place search radius around the destination in meters
    #[serde(default = "default_place_radius")]
    pub place_radius_m: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP collector endpoint; export is disabled when absent
    pub otlp_endpoint: Option<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_request_timeout() -> u32 {
    5
}

fn default_image_timeout() -> u32 {
    3
}

fn default_llm_timeout() -> u32 {
    60
}

fn default_user_agent() -> String {
    concat!("ItineraryPlanner/", env!("CARGO_PKG_VERSION")).to_string()
}

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1";
const OPENAI_URL: &str = "https://api.openai.com/v1";
const GEOAPIFY_URL: &str = "https://api.geoapify.com/v2";
const SERPAPI_URL: &str = "https://serpapi.com";
const UNSPLASH_URL: &str = "https://api.unsplash.com";
const DUCKDUCKGO_URL: &str = "https://duckduckgo.com";
const WIKIPEDIA_URL: &str = "https://en.wikipedia.org/w/api.php";
const NEWS_URL: &str = "https://newsapi.org/v2";

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_session_ttl() -> u32 {
    120
}

fn default_sweep_interval() -> u32 {
    300
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_country() -> String {
    "in".to_string()
}

fn default_geocode_count() -> u32 {
    10
}

fn default_forecast_days() -> u32 {
    7
}

fn default_curated_attractions() -> usize {
    4
}

fn default_place_attractions() -> usize {
    6
}

fn default_max_attractions() -> usize {
    10
}

fn default_activities() -> usize {
    6
}

fn default_max_hotels() -> usize {
    10
}

fn default_news_items() -> usize {
    5
}

fn default_place_radius() -> u32 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_request_timeout(),
            image_timeout_seconds: default_image_timeout(),
            llm_timeout_seconds: default_llm_timeout(),
            max_retries: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding: ProviderConfig::with_base_url(GEOCODING_URL),
            forecast: ProviderConfig::with_base_url(FORECAST_URL),
            openai: ProviderConfig::with_base_url(OPENAI_URL),
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            geoapify: ProviderConfig::with_base_url(GEOAPIFY_URL),
            serpapi: ProviderConfig::with_base_url(SERPAPI_URL),
            unsplash: ProviderConfig::with_base_url(UNSPLASH_URL),
            duckduckgo: ProviderConfig::with_base_url(DUCKDUCKGO_URL),
            wikipedia: ProviderConfig::with_base_url(WIKIPEDIA_URL),
            news: ProviderConfig::with_base_url(NEWS_URL),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_session_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            country: default_country(),
            geocode_count: default_geocode_count(),
            forecast_days: default_forecast_days(),
            curated_attractions: default_curated_attractions(),
            place_attractions: default_place_attractions(),
            max_attractions: default_max_attractions(),
            activities: default_activities(),
            max_hotels: default_max_hotels(),
            news_items: default_news_items(),
            place_radius_m: default_place_radius(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

/// Conventional environment variables holding provider keys
const PROVIDER_KEY_VARS: [&str; 5] = [
    "OPENAI_API_KEY",
    "GEOAPIFY_API_KEY",
    "SERP_API_KEY",
    "UNSPLASH_API_KEY",
    "NEWS_API_KEY",
];

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // PLANNER_HTTP__TIMEOUT_SECONDS=10 style overrides
        builder = builder.add_source(
            Environment::with_prefix("PLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_provider_keys_from_env();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("itinerary-planner").join("config.toml"))
    }

    /// Fill missing provider keys from their conventional variables
    pub fn apply_provider_keys_from_env(&mut self) {
        for var in PROVIDER_KEY_VARS {
            let Ok(value) = env::var(var) else { continue };
            let provider = match var {
                "OPENAI_API_KEY" => &mut self.providers.openai,
                "GEOAPIFY_API_KEY" => &mut self.providers.geoapify,
                "SERP_API_KEY" => &mut self.providers.serpapi,
                "UNSPLASH_API_KEY" => &mut self.providers.unsplash,
                _ => &mut self.providers.news,
            };
            if provider.api_key.is_none() {
                provider.api_key = Some(value);
            }
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        let fallback = ProvidersConfig::default();
        let providers = &mut self.providers;
        for (current, default) in [
            (&mut providers.geocoding, &fallback.geocoding),
            (&mut providers.forecast, &fallback.forecast),
            (&mut providers.openai, &fallback.openai),
            (&mut providers.geoapify, &fallback.geoapify),
            (&mut providers.serpapi, &fallback.serpapi),
            (&mut providers.unsplash, &fallback.unsplash),
            (&mut providers.duckduckgo, &fallback.duckduckgo),
            (&mut providers.wikipedia, &fallback.wikipedia),
            (&mut providers.news, &fallback.news),
        ] {
            if current.base_url.is_empty() {
                current.base_url = default.base_url.clone();
            }
            current.base_url = current.base_url.trim_end_matches('/').to_string();
        }
        if providers.chat_model.is_empty() {
            providers.chat_model = default_chat_model();
        }
        if providers.image_model.is_empty() {
            providers.image_model = default_image_model();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_request_timeout();
        }
        if self.http.image_timeout_seconds == 0 {
            self.http.image_timeout_seconds = default_image_timeout();
        }
        if self.http.llm_timeout_seconds == 0 {
            self.http.llm_timeout_seconds = default_llm_timeout();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.session.ttl_minutes == 0 {
            self.session.ttl_minutes = default_session_ttl();
        }
        if self.session.sweep_interval_seconds == 0 {
            self.session.sweep_interval_seconds = default_sweep_interval();
        }
        if self.planning.currency.is_empty() {
            self.planning.currency = default_currency();
        }
        if self.planning.country.is_empty() {
            self.planning.country = default_country();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_tls()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 300
            || self.http.image_timeout_seconds > 300
            || self.http.llm_timeout_seconds > 300
        {
            return Err(PlannerError::config("HTTP timeouts cannot exceed 300 seconds").into());
        }

        if self.http.max_retries > 10 {
            return Err(PlannerError::config("HTTP max retries cannot exceed 10").into());
        }

        if self.planning.forecast_days == 0 || self.planning.forecast_days > 16 {
            return Err(
                PlannerError::config("Forecast days must be between 1 and 16").into(),
            );
        }

        if self.planning.geocode_count == 0 || self.planning.geocode_count > 100 {
            return Err(
                PlannerError::config("Geocode count must be between 1 and 100").into(),
            );
        }

        if self.planning.max_attractions == 0 {
            return Err(PlannerError::config("Maximum attractions must be positive").into());
        }

        if self.planning.curated_attractions > self.planning.max_attractions {
            return Err(PlannerError::config(format!(
                "Curated attractions ({}) cannot exceed maximum attractions ({})",
                self.planning.curated_attractions, self.planning.max_attractions
            ))
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let providers = &self.providers;
        for (name, provider) in [
            ("geocoding", &providers.geocoding),
            ("forecast", &providers.forecast),
            ("openai", &providers.openai),
            ("geoapify", &providers.geoapify),
            ("serpapi", &providers.serpapi),
            ("unsplash", &providers.unsplash),
            ("duckduckgo", &providers.duckduckgo),
            ("wikipedia", &providers.wikipedia),
            ("news", &providers.news),
        ] {
            if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://")
            {
                return Err(PlannerError::config(format!(
                    "Base URL of provider '{name}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_tls(&self) -> Result<()> {
        match (&self.server.tls_cert_path, &self.server.tls_key_path) {
            (Some(_), None) | (None, Some(_)) => Err(PlannerError::config(
                "TLS requires both tls_cert_path and tls_key_path",
            )
            .into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.providers.forecast.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.http.timeout_seconds, 5);
        assert_eq!(config.http.image_timeout_seconds, 3);
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.planning.currency, "INR");
        assert_eq!(config.planning.max_attractions, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.providers.openai.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let mut provider = ProviderConfig::with_base_url(OPENAI_URL);
        assert!(!provider.is_configured());
        provider.api_key = Some("   ".to_string());
        assert!(!provider.is_configured());
        provider.api_key = Some("sk-test".to_string());
        assert_eq!(provider.key(), Some("sk-test"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = PlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = PlannerConfig::default();
        config.http.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_curated_attractions_fit_the_merged_list() {
        let mut config = PlannerConfig::default();
        config.planning.curated_attractions = config.planning.max_attractions;
        assert!(config.validate().is_ok());

        config.planning.curated_attractions = 12;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Curated attractions (12) cannot exceed"));
    }

    #[test]
    fn test_config_validation_tls_pair() {
        let mut config = PlannerConfig::default();
        config.server.tls_cert_path = Some("cert.pem".to_string());
        assert!(config.validate().is_err());
        config.server.tls_key_path = Some("key.pem".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_defaults_fills_empty_base_urls() {
        let mut config = PlannerConfig::default();
        config.providers.news.base_url = String::new();
        config.providers.unsplash.base_url = "http://localhost:9000/".to_string();
        config.apply_defaults();
        assert_eq!(config.providers.news.base_url, NEWS_URL);
        assert_eq!(config.providers.unsplash.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[planning]\ncurrency = \"EUR\"\n\n[providers.news]\napi_key = \"news-key\""
        )
        .unwrap();

        let config = PlannerConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.planning.currency, "EUR");
        assert_eq!(config.providers.news.key(), Some("news-key"));
        assert_eq!(config.providers.news.base_url, NEWS_URL);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = PlannerConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("itinerary-planner"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
