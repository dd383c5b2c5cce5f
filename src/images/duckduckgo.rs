use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use super::ImageSource;
use crate::config::PlannerConfig;
use crate::http::Timeouts;

/// Keyless web image search.
///
/// A search page is fetched first to obtain the `vqd` token the JSON
/// endpoint requires.
pub struct DuckDuckGoImages {
    client: ClientWithMiddleware,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ImageResults {
    #[serde(default)]
    results: Vec<ImageResult>,
}

#[derive(Debug, Deserialize)]
struct ImageResult {
    image: Option<String>,
}

static VQD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"vqd=["']?([\d-]+)["']?"#).expect("vqd regex must compile")
});

fn extract_vqd(page: &str) -> Option<String> {
    VQD_PATTERN
        .captures(page)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

impl DuckDuckGoImages {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            base_url: config.providers.duckduckgo.base_url.clone(),
            timeout: Timeouts::from(&config.http).image,
        }
    }

    async fn token(&self, query: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &format!("{}/", self.base_url),
            &[("q", query), ("iax", "images"), ("ia", "images")],
        )
        .context("Invalid DuckDuckGo URL")?;

        let page = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_vqd(&page).ok_or_else(|| anyhow!("No vqd token in DuckDuckGo page"))
    }
}

#[async_trait]
impl ImageSource for DuckDuckGoImages {
    fn name(&self) -> &'static str {
        "DuckDuckGo"
    }

    async fn find(&self, query: &str) -> Result<Option<String>> {
        let vqd = self.token(query).await?;
        let url = Url::parse_with_params(
            &format!("{}/i.js", self.base_url),
            &[
                ("l", "wt-wt"),
                ("o", "json"),
                ("q", query),
                ("vqd", vqd.as_str()),
                ("f", ",,,,size:Large,"),
                ("p", "1"),
            ],
        )
        .context("Invalid DuckDuckGo URL")?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::REFERER, format!("{}/", self.base_url))
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let images: ImageResults = response
            .json()
            .await
            .with_context(|| "Failed to parse DuckDuckGo image results")?;

        Ok(images.results.into_iter().find_map(|r| r.image))
    }
}
