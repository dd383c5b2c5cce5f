//! Weather fetcher backed by the Open-Meteo forecast API

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use crate::config::PlannerConfig;
use crate::http::Timeouts;
use crate::models::{DestinationCandidate, WeatherSnapshot};

pub mod open_meteo;

/// Label used when a condition code is missing or not in the table
pub const FALLBACK_CONDITION: &str = "🌤️ Fair weather";

/// Convert a WMO weather code to an emoji label.
///
/// Unknown or missing codes map to [`FALLBACK_CONDITION`].
#[must_use]
pub fn describe_condition(code: Option<u8>) -> &'static str {
    match code {
        Some(0) => "☀️ Clear sky",
        Some(1) => "🌤️ Mainly clear",
        Some(2) => "⛅ Partly cloudy",
        Some(3) => "☁️ Overcast",
        Some(45 | 48) => "🌫️ Foggy",
        Some(51) => "🌧️ Light drizzle",
        Some(53) => "🌧️ Moderate drizzle",
        Some(55) => "🌧️ Heavy drizzle",
        Some(61) => "🌧️ Slight rain",
        Some(63) => "🌧️ Moderate rain",
        Some(65) => "⛈️ Heavy rain",
        Some(71) => "❄️ Slight snow",
        Some(73) => "❄️ Moderate snow",
        Some(75) => "❄️ Heavy snow",
        Some(80) => "🌧️ Slight rain showers",
        Some(81) => "🌧️ Moderate rain showers",
        Some(82) => "⛈️ Violent rain showers",
        Some(85) => "❄️ Slight snow showers",
        Some(86) => "❄️ Heavy snow showers",
        Some(95) => "⛈️ Thunderstorm",
        Some(96 | 99) => "⛈️ Thunderstorm with hail",
        _ => FALLBACK_CONDITION,
    }
}

/// Current and daily forecast client
#[derive(Clone)]
pub struct WeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    forecast_days: u32,
    timeout: Duration,
}

impl WeatherClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            base_url: config.providers.forecast.base_url.clone(),
            forecast_days: config.planning.forecast_days,
            timeout: Timeouts::from(&config.http).request,
        }
    }

    /// Fetch conditions for the destination; `None` when the call fails
    #[instrument(skip(self, destination), fields(destination = %destination.name))]
    pub async fn forecast(&self, destination: &DestinationCandidate) -> Option<WeatherSnapshot> {
        let start_time = Instant::now();
        match self.forecast_call(destination).await {
            Ok(snapshot) => {
                info!(
                    "Retrieved {}-day forecast in {:.3}s",
                    snapshot.daily.len(),
                    start_time.elapsed().as_secs_f64()
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!("Weather API error: {:#}", e);
                None
            }
        }
    }

    async fn forecast_call(&self, destination: &DestinationCandidate) -> Result<WeatherSnapshot> {
        let url = Url::parse_with_params(
            &format!("{}/forecast", self.base_url),
            &[
                ("latitude", destination.latitude.to_string()),
                ("longitude", destination.longitude.to_string()),
                (
                    "current",
                    "temperature_2m,weather_code,wind_speed_10m,relative_humidity_2m".to_string(),
                ),
                (
                    "daily",
                    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum"
                        .to_string(),
                ),
                ("temperature_unit", "celsius".to_string()),
                ("wind_speed_unit", "kmh".to_string()),
                ("timezone", destination.timezone.clone()),
                ("forecast_days", self.forecast_days.to_string()),
            ],
        )
        .context("Invalid forecast URL")?;
        debug!("Open-Meteo forecast request URL: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let forecast: open_meteo::ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo forecast response")?;

        Ok(forecast.into_snapshot())
    }
}
