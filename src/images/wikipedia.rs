use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use super::ImageSource;
use crate::config::PlannerConfig;
use crate::http::Timeouts;

/// Page thumbnail of the best search hit, good for landmarks
pub struct WikipediaImages {
    client: ClientWithMiddleware,
    api_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

impl QueryResponse {
    fn first_thumbnail(self) -> Option<String> {
        self.query?
            .pages
            .into_values()
            .find_map(|page| page.thumbnail.map(|t| t.source))
    }
}

impl WikipediaImages {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            api_url: config.providers.wikipedia.base_url.clone(),
            timeout: Timeouts::from(&config.http).image,
        }
    }
}

#[async_trait]
impl ImageSource for WikipediaImages {
    fn name(&self) -> &'static str {
        "Wikipedia"
    }

    async fn find(&self, query: &str) -> Result<Option<String>> {
        let url = Url::parse_with_params(
            &self.api_url,
            &[
                ("action", "query"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", "1"),
                ("prop", "pageimages"),
                ("pithumbsize", "1000"),
                ("format", "json"),
                ("origin", "*"),
            ],
        )
        .context("Invalid Wikipedia URL")?;

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let result: QueryResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Wikipedia response")?;

        Ok(result.first_thumbnail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_from_pages() {
        let json = r#"{"batchcomplete": "", "query": {"pages": {
            "9232": {"pageid": 9232, "title": "Eiffel Tower",
                     "thumbnail": {"source": "https://upload.wikimedia.org/eiffel.jpg", "width": 1000, "height": 1500}}
        }}}"#;
        let result: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.first_thumbnail().as_deref(),
            Some("https://upload.wikimedia.org/eiffel.jpg")
        );
    }

    #[test]
    fn test_no_hits() {
        let result: QueryResponse = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
        assert!(result.first_thumbnail().is_none());

        let json = r#"{"query": {"pages": {"1": {"title": "No picture"}}}}"#;
        let result: QueryResponse = serde_json::from_str(json).unwrap();
        assert!(result.first_thumbnail().is_none());
    }
}
