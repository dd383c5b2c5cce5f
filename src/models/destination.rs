//! Destination candidate returned by geocoding

use serde::{Deserialize, Serialize};

/// One geocoding match the user can pick as destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DestinationCandidate {
    /// Provider identifier, when the provider returns one
    pub id: Option<i64>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Place name
    pub name: String,
    /// Country name, empty when unknown
    #[serde(default)]
    pub country: String,
    /// First-level administrative region, empty when unknown
    #[serde(default)]
    pub region: String,
    /// IANA timezone used for the forecast
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl DestinationCandidate {
    /// Create a candidate with only a name and coordinates
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            id: None,
            latitude,
            longitude,
            name,
            country: String::new(),
            region: String::new(),
            timezone: default_timezone(),
        }
    }

    /// Dropdown label: `"Name, Country (Region)"`, region omitted when empty
    #[must_use]
    pub fn label(&self) -> String {
        if self.region.is_empty() {
            format!("{}, {}", self.name, self.country)
        } else {
            format!("{}, {} ({})", self.name, self.country, self.region)
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_with_region() {
        let mut paris = DestinationCandidate::new(48.8534, 2.3488, "Paris".to_string());
        paris.country = "France".to_string();
        paris.region = "Île-de-France".to_string();
        assert_eq!(paris.label(), "Paris, France (Île-de-France)");
    }

    #[test]
    fn test_label_without_region() {
        let mut monaco = DestinationCandidate::new(43.7333, 7.4167, "Monaco".to_string());
        monaco.country = "Monaco".to_string();
        assert_eq!(monaco.label(), "Monaco, Monaco");
    }

    #[test]
    fn test_timezone_defaults_when_missing() {
        let json = r#"{"id":null,"latitude":1.0,"longitude":2.0,"name":"X"}"#;
        let candidate: DestinationCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.timezone, "UTC");
        assert_eq!(candidate.format_coordinates(), "1.0000, 2.0000");
    }
}
