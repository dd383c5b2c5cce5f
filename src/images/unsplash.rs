use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use super::ImageSource;
use crate::config::PlannerConfig;
use crate::http::Timeouts;

/// Photo search; only available with an access key
pub struct UnsplashImages {
    client: ClientWithMiddleware,
    base_url: String,
    access_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

impl UnsplashImages {
    /// `None` when no access key is configured
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Option<Self> {
        let access_key = config.providers.unsplash.key()?.to_string();
        Some(Self {
            client,
            base_url: config.providers.unsplash.base_url.clone(),
            access_key,
            timeout: Timeouts::from(&config.http).image,
        })
    }
}

#[async_trait]
impl ImageSource for UnsplashImages {
    fn name(&self) -> &'static str {
        "Unsplash"
    }

    async fn find(&self, query: &str) -> Result<Option<String>> {
        let url = Url::parse_with_params(
            &format!("{}/search/photos", self.base_url),
            &[
                ("query", query),
                ("per_page", "1"),
                ("client_id", self.access_key.as_str()),
                ("order_by", "relevant"),
                ("orientation", "landscape"),
            ],
        )
        .context("Invalid Unsplash URL")?;

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let search: SearchResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Unsplash response")?;

        Ok(search
            .results
            .into_iter()
            .next()
            .and_then(|photo| photo.urls.regular))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"total": 1, "results": [{"id": "x", "urls": {"regular": "https://images.unsplash.com/photo-1", "small": "s"}}]}"#;
        let search: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            search.results[0].urls.regular.as_deref(),
            Some("https://images.unsplash.com/photo-1")
        );
    }

    #[test]
    fn test_requires_key() {
        let config = PlannerConfig::default();
        let client = crate::http::build_client(&config.http).unwrap();
        assert!(UnsplashImages::new(client, &config).is_none());
    }
}
