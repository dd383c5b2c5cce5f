//! Itinerary planner - trip planning assembled from public travel APIs
//!
//! This library resolves a destination, gathers weather, attractions,
//! activities, hotels, images and news from third-party providers, and
//! assembles them into an itinerary that can be viewed or downloaded.

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod geocoding;
pub mod hotels;
pub mod http;
pub mod images;
pub mod models;
pub mod news;
pub mod planner;
pub mod recommendations;
pub mod render;
pub mod session;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use models::{DestinationCandidate, ItineraryBundle, TripRequest};
pub use planner::Planner;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
