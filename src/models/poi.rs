//! Attractions and activities

use serde::{Deserialize, Serialize};

/// An attraction or activity shown as a card.
///
/// `name` doubles as the deduplication and image-lookup key.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PointOfInterest {
    pub name: String,
    /// Free-form category such as "Museum" or "Culinary"
    pub category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Short description, at most a couple of sentences
    #[serde(default)]
    pub summary: String,
}

impl PointOfInterest {
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            latitude: None,
            longitude: None,
            summary: summary.into(),
        }
    }

    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Encyclopedia article link derived from the name
    #[must_use]
    pub fn wiki_url(&self) -> String {
        format!(
            "https://en.wikipedia.org/wiki/{}",
            urlencoding::encode(&self.name.replace(' ', "_"))
        )
    }
}
