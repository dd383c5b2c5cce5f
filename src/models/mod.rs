//! Data models for the itinerary planner
//!
//! This module contains the core domain records organized by concern:
//! - Destination: geocoding candidates
//! - Weather: current conditions and the daily forecast
//! - Poi: attractions and activities
//! - Hotel: hotel offers and the nightly budget band
//! - News: destination headlines
//! - Itinerary: the trip request and the assembled bundle

pub mod destination;
pub mod hotel;
pub mod itinerary;
pub mod news;
pub mod poi;
pub mod weather;

// Re-export all public types for convenient access
pub use destination::DestinationCandidate;
pub use hotel::{BudgetBand, HotelOffer};
pub use itinerary::{DayPlan, ItineraryBundle, TripRequest};
pub use news::NewsArticle;
pub use poi::PointOfInterest;
pub use weather::{CurrentConditions, DailyForecast, WeatherSnapshot};
