//! Curated attractions and activities written by the language model

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::llm::{LanguageModel, strip_code_fence};
use crate::models::PointOfInterest;

/// One entry of the JSON array the model is asked to return
#[derive(Debug, Deserialize)]
struct CuratedItem {
    name: String,
    #[serde(rename = "type", default)]
    category: String,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    summary: String,
}

impl From<CuratedItem> for PointOfInterest {
    fn from(item: CuratedItem) -> Self {
        let poi = PointOfInterest::new(item.name, item.category, item.summary);
        match (item.lat, item.lon) {
            (Some(lat), Some(lon)) => poi.with_coordinates(lat, lon),
            _ => poi,
        }
    }
}

fn attractions_prompt(location: &str, limit: usize) -> String {
    format!(
        "List top {limit} tourist attractions in {location}.
Return a strict JSON array of objects with these keys:
- name: string
- type: string (e.g. Museum, Park, Historic Site)
- lat: float (approximate latitude)
- lon: float (approximate longitude)
- summary: string (An exciting, engaging description, max 200 chars)

Do not include markdown formatting (like ```json), just the raw JSON string."
    )
}

fn activities_prompt(location: &str, limit: usize) -> String {
    format!(
        "List top {limit} specific activities/experiences to do in {location} (e.g., food tour, kayaking, hiking trail, sunset cruise).
Return a strict JSON array of objects with these keys:
- name: string (Title of the activity)
- type: string (e.g. Adventure, Culinary, Relaxation)
- summary: string (Exciting description, max 200 chars)

Do not include markdown formatting."
    )
}

/// Parse the model reply into at most `limit` records
fn parse_items(content: &str, limit: usize) -> Result<Vec<PointOfInterest>> {
    let items: Vec<CuratedItem> = serde_json::from_str(strip_code_fence(content))
        .with_context(|| "Model reply is not a JSON array of places")?;
    Ok(items.into_iter().take(limit).map(Into::into).collect())
}

/// Stand-in attraction when the model call fails
#[must_use]
pub fn placeholder_attraction(location: &str) -> PointOfInterest {
    PointOfInterest::new(
        format!("Check out {location}"),
        "City Center",
        format!("Explore the vibrant streets and landmarks of {location}."),
    )
    .with_coordinates(0.0, 0.0)
}

/// Stand-in activity when the model call fails
#[must_use]
pub fn placeholder_activity(location: &str) -> PointOfInterest {
    PointOfInterest::new(
        "Walking Tour",
        "Exploration",
        format!("Take a walk through the beautiful streets of {location}."),
    )
}

#[derive(Clone)]
pub struct Curator {
    model: LanguageModel,
}

impl Curator {
    #[must_use]
    pub fn new(model: LanguageModel) -> Self {
        Self { model }
    }

    /// Descriptive attractions. Empty without a key, a single placeholder on failure.
    #[instrument(skip(self))]
    pub async fn attractions(&self, location: &str, limit: usize) -> Vec<PointOfInterest> {
        if !self.model.is_configured() {
            return Vec::new();
        }
        match self.curate(&attractions_prompt(location, limit), limit).await {
            Ok(items) => {
                info!("Curated {} attractions", items.len());
                items
            }
            Err(e) => {
                warn!("Curated attractions error: {:#}", e);
                vec![placeholder_attraction(location)]
            }
        }
    }

    /// Things to do. Empty without a key, a single placeholder on failure.
    #[instrument(skip(self))]
    pub async fn activities(&self, location: &str, limit: usize) -> Vec<PointOfInterest> {
        if !self.model.is_configured() {
            return Vec::new();
        }
        match self.curate(&activities_prompt(location, limit), limit).await {
            Ok(items) => {
                info!("Curated {} activities", items.len());
                items
            }
            Err(e) => {
                warn!("Curated activities error: {:#}", e);
                vec![placeholder_activity(location)]
            }
        }
    }

    async fn curate(&self, prompt: &str, limit: usize) -> Result<Vec<PointOfInterest>> {
        let content = self.model.complete(prompt, None).await?;
        parse_items(&content, limit)
    }
}
