//! Location-based attractions from the Geoapify places API

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::PlannerConfig;
use crate::http::Timeouts;
use crate::models::{DestinationCandidate, PointOfInterest};

const CATEGORIES: &str = "tourism.attraction,entertainment.museum,religion.place_of_worship";

#[derive(Clone)]
pub struct PlaceSearch {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
    radius_m: u32,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: PlaceProperties,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceProperties {
    name: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    formatted: Option<String>,
    address_line2: Option<String>,
}

impl PlaceProperties {
    /// Features without a name are skipped
    fn into_poi(self) -> Option<PointOfInterest> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let category = self
            .categories
            .first()
            .and_then(|c| c.rsplit('.').next())
            .map_or_else(|| "Landmark".to_string(), title_case);
        let summary = self.formatted.unwrap_or_else(|| {
            format!(
                "Located at {}",
                self.address_line2.as_deref().unwrap_or("city center")
            )
        });

        let poi = PointOfInterest::new(name, category, summary);
        Some(match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => poi.with_coordinates(lat, lon),
            _ => poi,
        })
    }
}

/// `place_of_worship` -> `Place_Of_Worship`
fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_start = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if at_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_start = false;
        } else {
            out.push(c);
            at_start = true;
        }
    }
    out
}

impl PlaceSearch {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            base_url: config.providers.geoapify.base_url.clone(),
            api_key: config.providers.geoapify.key().map(str::to_string),
            radius_m: config.planning.place_radius_m,
            timeout: Timeouts::from(&config.http).request,
        }
    }

    /// Named attractions around the destination; empty without a key or on failure
    #[instrument(skip(self, destination), fields(destination = %destination.name))]
    pub async fn attractions(
        &self,
        destination: &DestinationCandidate,
        limit: usize,
    ) -> Vec<PointOfInterest> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Vec::new();
        };

        let start_time = Instant::now();
        match self.places_call(destination, limit, api_key).await {
            Ok(places) => {
                info!(
                    "Found {} places in {:.3}s",
                    places.len(),
                    start_time.elapsed().as_secs_f64()
                );
                places
            }
            Err(e) => {
                warn!("Place search error: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn places_call(
        &self,
        destination: &DestinationCandidate,
        limit: usize,
        api_key: &str,
    ) -> Result<Vec<PointOfInterest>> {
        let url = Url::parse_with_params(
            &format!("{}/places", self.base_url),
            &[
                ("categories", CATEGORIES.to_string()),
                (
                    "filter",
                    format!(
                        "circle:{},{},{}",
                        destination.longitude, destination.latitude, self.radius_m
                    ),
                ),
                ("limit", limit.to_string()),
                ("apiKey", api_key.to_string()),
                ("lang", "en".to_string()),
            ],
        )
        .context("Invalid places URL")?;
        debug!("Place search for {}", destination.format_coordinates());

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let places: PlacesResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse places response")?;

        Ok(places
            .features
            .into_iter()
            .filter_map(|feature| feature.properties.into_poi())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("attraction", "Attraction")]
    #[case("place_of_worship", "Place_Of_Worship")]
    #[case("MUSEUM", "Museum")]
    fn test_title_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }

    #[test]
    fn test_parse_features() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"properties": {"name": "Sainte-Chapelle", "categories": ["religion.place_of_worship", "tourism"],
             "lat": 48.855, "lon": 2.345, "formatted": "Sainte-Chapelle, 8 Boulevard du Palais, Paris"}},
            {"properties": {"categories": ["tourism.attraction"], "lat": 1.0, "lon": 2.0}},
            {"properties": {"name": "Hidden Garden", "address_line2": "Rue Oberkampf"}}
        ]}"#;
        let response: PlacesResponse = serde_json::from_str(json).unwrap();
        let pois: Vec<_> = response
            .features
            .into_iter()
            .filter_map(|f| f.properties.into_poi())
            .collect();

        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].category, "Place_Of_Worship");
        assert_eq!(pois[0].longitude, Some(2.345));
        assert_eq!(pois[1].category, "Landmark");
        assert_eq!(pois[1].summary, "Located at Rue Oberkampf");
        assert_eq!(pois[1].latitude, None);
    }

    #[tokio::test]
    async fn test_offline_and_unkeyed_return_empty() {
        let mut config = PlannerConfig::default();
        config.providers.geoapify.base_url = "http://127.0.0.1:9".to_string();
        let client = crate::http::build_client(&config.http).unwrap();
        let destination = DestinationCandidate::new(48.85, 2.35, "Paris".to_string());

        let search = PlaceSearch::new(client.clone(), &config);
        assert!(search.attractions(&destination, 6).await.is_empty());

        config.providers.geoapify.api_key = Some("geo-key".to_string());
        let search = PlaceSearch::new(client, &config);
        assert!(search.attractions(&destination, 6).await.is_empty());
    }
}
