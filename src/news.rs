//! Destination events and culture headlines from NewsAPI

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::config::PlannerConfig;
use crate::http::Timeouts;
use crate::models::NewsArticle;

#[derive(Clone)]
pub struct NewsFeed {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
    page_size: usize,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    url: Option<String>,
    source: Option<ArticleSource>,
    published_at: Option<String>,
    description: Option<String>,
    url_to_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

impl From<Article> for NewsArticle {
    fn from(article: Article) -> Self {
        Self {
            title: article.title.unwrap_or_default(),
            url: article.url.unwrap_or_default(),
            source: article.source.and_then(|s| s.name).unwrap_or_default(),
            published_at: article.published_at.unwrap_or_default(),
            description: article.description.unwrap_or_default(),
            image: article.url_to_image,
        }
    }
}

/// Search expression restricted to things a visitor can attend
#[must_use]
pub fn events_query(destination: &str) -> String {
    format!(
        "\"{destination}\" AND (events OR festival OR concert OR exhibition OR \"things to do\" OR culture OR nightlife)"
    )
}

impl EverythingResponse {
    fn into_articles(self) -> Result<Vec<NewsArticle>> {
        if self.status != "ok" {
            bail!(
                "NewsAPI status '{}': {}",
                self.status,
                self.message.unwrap_or_default()
            );
        }
        Ok(self.articles.into_iter().map(Into::into).collect())
    }
}

impl NewsFeed {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            base_url: config.providers.news.base_url.clone(),
            api_key: config.providers.news.key().map(str::to_string),
            page_size: config.planning.news_items,
            timeout: Timeouts::from(&config.http).request,
        }
    }

    /// Latest headlines; empty without a key, on failure, or on a non-ok status
    #[instrument(skip(self))]
    pub async fn latest(&self, destination: &str) -> Vec<NewsArticle> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Vec::new();
        };

        let start_time = Instant::now();
        match self.latest_call(destination, api_key).await {
            Ok(articles) => {
                info!(
                    "Fetched {} articles in {:.3}s",
                    articles.len(),
                    start_time.elapsed().as_secs_f64()
                );
                articles
            }
            Err(e) => {
                warn!("News error: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn latest_call(&self, destination: &str, api_key: &str) -> Result<Vec<NewsArticle>> {
        let url = Url::parse_with_params(
            &format!("{}/everything", self.base_url),
            &[
                ("q", events_query(destination)),
                ("apiKey", api_key.to_string()),
                ("language", "en".to_string()),
                ("sortBy", "relevancy".to_string()),
                ("pageSize", self.page_size.to_string()),
            ],
        )
        .context("Invalid news URL")?;

        // Error bodies also carry `status` and `message`
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let body: EverythingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse NewsAPI response")?;

        let mut articles = body.into_articles()?;
        articles.truncate(self.page_size);
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_query() {
        assert_eq!(
            events_query("Goa"),
            r#""Goa" AND (events OR festival OR concert OR exhibition OR "things to do" OR culture OR nightlife)"#
        );
    }

    #[test]
    fn test_ok_response() {
        let json = r#"{"status": "ok", "totalResults": 1, "articles": [{
            "source": {"id": null, "name": "Goa Times"},
            "title": "Sunburn festival returns",
            "url": "https://news.example/sunburn",
            "urlToImage": "https://news.example/sunburn.jpg",
            "publishedAt": "2026-10-18T09:00:00Z",
            "description": "Three days of music"
        }]}"#;
        let response: EverythingResponse = serde_json::from_str(json).unwrap();
        let articles = response.into_articles().unwrap();
        assert_eq!(articles[0].source, "Goa Times");
        assert_eq!(articles[0].published_date(), "2026-10-18");
        assert_eq!(articles[0].image.as_deref(), Some("https://news.example/sunburn.jpg"));
    }

    #[test]
    fn test_error_status() {
        let json = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid"}"#;
        let response: EverythingResponse = serde_json::from_str(json).unwrap();
        let err = response.into_articles().unwrap_err();
        assert!(err.to_string().contains("Your API key is invalid"));
    }

    #[tokio::test]
    async fn test_offline_returns_empty() {
        let mut config = PlannerConfig::default();
        config.providers.news.base_url = "http://127.0.0.1:9".to_string();
        config.providers.news.api_key = Some("news-key".to_string());
        let client = crate::http::build_client(&config.http).unwrap();
        assert!(NewsFeed::new(client, &config).latest("Goa").await.is_empty());
    }
}
