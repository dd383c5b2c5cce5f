//! Destination resolution
//!
//! Turns the free-text destination query into candidate matches using the
//! Open-Meteo geocoding API (no API key required).

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::PlannerConfig;
use crate::http::Timeouts;
use crate::models::DestinationCandidate;

/// Service for resolving destination queries
#[derive(Clone)]
pub struct DestinationResolver {
    client: ClientWithMiddleware,
    base_url: String,
    count: u32,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    id: Option<i64>,
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
    timezone: Option<String>,
}

impl GeocodingResult {
    fn into_candidate(self, query: &str) -> DestinationCandidate {
        DestinationCandidate {
            id: self.id,
            latitude: self.latitude,
            longitude: self.longitude,
            name: self.name.unwrap_or_else(|| query.to_string()),
            country: self.country.unwrap_or_default(),
            region: self.admin1.unwrap_or_default(),
            timezone: self.timezone.unwrap_or_else(|| "UTC".to_string()),
        }
    }
}

impl DestinationResolver {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            base_url: config.providers.geocoding.base_url.clone(),
            count: config.planning.geocode_count,
            timeout: Timeouts::from(&config.http).request,
        }
    }

    /// Candidate matches for `query`; empty when nothing matches or the call fails
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Vec<DestinationCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let start_time = Instant::now();
        match self.search_call(query).await {
            Ok(candidates) => {
                if candidates.is_empty() {
                    warn!("No results found for location '{}'", query);
                } else {
                    info!(
                        "Found {} geocoding results for '{}' in {:.3}s",
                        candidates.len(),
                        query,
                        start_time.elapsed().as_secs_f64()
                    );
                }
                candidates
            }
            Err(e) => {
                warn!("Geocoding error for '{}': {:#}", query, e);
                Vec::new()
            }
        }
    }

    async fn search_call(&self, query: &str) -> Result<Vec<DestinationCandidate>> {
        let url = Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[
                ("name", query.to_string()),
                ("count", self.count.to_string()),
                ("language", "en".to_string()),
                ("format", "json".to_string()),
            ],
        )
        .context("Invalid geocoding URL")?;
        debug!("Open-Meteo geocoding request URL: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let geocoding: GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo geocoding response")?;

        Ok(geocoding
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|result| result.into_candidate(query))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_resolver() -> DestinationResolver {
        let mut config = PlannerConfig::default();
        config.providers.geocoding.base_url = "http://127.0.0.1:9".to_string();
        let client = crate::http::build_client(&config.http).unwrap();
        DestinationResolver::new(client, &config)
    }

    #[test]
    fn test_geocoding_result_to_candidate() {
        let json = r#"{"results":[
            {"id": 2988507, "name": "Paris", "latitude": 48.85341, "longitude": 2.3488,
             "country": "France", "admin1": "Île-de-France", "timezone": "Europe/Paris"},
            {"latitude": 33.66, "longitude": -95.55}
        ]}"#;
        let response: GeocodingResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<_> = response
            .results
            .unwrap()
            .into_iter()
            .map(|r| r.into_candidate("Paris"))
            .collect();

        assert_eq!(candidates[0].label(), "Paris, France (Île-de-France)");
        assert_eq!(candidates[0].id, Some(2_988_507));
        assert_eq!(candidates[1].name, "Paris");
        assert_eq!(candidates[1].timezone, "UTC");
        assert_eq!(candidates[1].country, "");
    }

    #[test]
    fn test_no_results_field() {
        let response: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
        assert!(response.results.is_none());
    }

    #[tokio::test]
    async fn test_blank_query_skips_lookup() {
        assert!(offline_resolver().search("   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_offline_returns_empty() {
        assert!(offline_resolver().search("Paris").await.is_empty());
    }
}
