//! Image lookup for attraction and activity cards
//!
//! Sources are tried in rank order; the first one returning a URL wins and a
//! static placeholder covers the case where every source comes up empty.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::{StreamExt, stream};
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use crate::config::PlannerConfig;
use crate::models::PointOfInterest;

pub mod duckduckgo;
pub mod unsplash;
pub mod wikipedia;

pub use duckduckgo::DuckDuckGoImages;
pub use unsplash::UnsplashImages;
pub use wikipedia::WikipediaImages;

/// A provider that may know a picture for a free-text query
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// URL of the best match, `None` when the source has nothing
    async fn find(&self, query: &str) -> Result<Option<String>>;
}

/// Static placeholder showing the item name
#[must_use]
pub fn placeholder_url(name: &str) -> String {
    format!(
        "https://placehold.co/600x400/EEE/31343C?text={}",
        name.replace(' ', "+")
    )
}

#[derive(Clone)]
pub struct ImageResolver {
    sources: Arc<Vec<Box<dyn ImageSource>>>,
}

impl ImageResolver {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn ImageSource>>) -> Self {
        Self {
            sources: Arc::new(sources),
        }
    }

    /// Unsplash (when keyed), then DuckDuckGo, then Wikipedia
    #[must_use]
    pub fn from_config(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        let mut sources: Vec<Box<dyn ImageSource>> = Vec::new();
        if let Some(unsplash) = UnsplashImages::new(client.clone(), config) {
            sources.push(Box::new(unsplash));
        }
        sources.push(Box::new(DuckDuckGoImages::new(client.clone(), config)));
        sources.push(Box::new(WikipediaImages::new(client, config)));
        Self::new(sources)
    }

    /// One non-empty URL for `query`
    pub async fn resolve_one(&self, query: &str) -> String {
        for source in self.sources.iter() {
            match source.find(query).await {
                Ok(Some(url)) if !url.trim().is_empty() => {
                    debug!("Image for '{}' from {}", query, source.name());
                    return url;
                }
                Ok(_) => debug!("{} has no image for '{}'", source.name(), query),
                Err(e) => warn!("{} image error for '{}': {:#}", source.name(), query, e),
            }
        }
        placeholder_url(query)
    }

    /// Image URL per item name, looked up one item at a time
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn resolve(&self, items: &[PointOfInterest]) -> BTreeMap<String, String> {
        let images: BTreeMap<String, String> = stream::iter(items)
            .then(|item| async move { (item.name.clone(), self.resolve_one(&item.name).await) })
            .collect()
            .await;
        info!("Resolved {} images", images.len());
        images
    }
}
