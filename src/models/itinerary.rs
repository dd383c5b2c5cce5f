//! Trip request and the assembled itinerary bundle

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BudgetBand, DestinationCandidate, HotelOffer, NewsArticle, PointOfInterest, WeatherSnapshot,
};
use crate::PlannerError;

pub const MAX_DAYS: u32 = 30;
pub const MAX_PEOPLE: u32 = 20;
pub const MIN_BUDGET: u64 = 1_000;
pub const MAX_BUDGET: u64 = 1_000_000;

/// Everything the trip form submits
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripRequest {
    pub from_place: String,
    /// The candidate the user confirmed; `None` until one is picked
    pub destination: Option<DestinationCandidate>,
    pub start_date: NaiveDate,
    pub num_days: u32,
    pub num_people: u32,
    /// Total budget in the configured currency
    pub budget: u64,
}

impl TripRequest {
    /// Apply the form's bounds. `today` is the earliest allowed start date.
    pub fn validate(&self, today: NaiveDate) -> Result<&DestinationCandidate, PlannerError> {
        let destination = match &self.destination {
            Some(d) if !self.from_place.trim().is_empty() => d,
            _ => {
                return Err(PlannerError::validation(
                    "Please ensure you have entered a 'From' location and selected a 'Destination'!",
                ));
            }
        };
        if !(1..=MAX_DAYS).contains(&self.num_days) {
            return Err(PlannerError::validation(format!(
                "Duration must be between 1 and {MAX_DAYS} days"
            )));
        }
        if !(1..=MAX_PEOPLE).contains(&self.num_people) {
            return Err(PlannerError::validation(format!(
                "Number of travelers must be between 1 and {MAX_PEOPLE}"
            )));
        }
        if !(MIN_BUDGET..=MAX_BUDGET).contains(&self.budget) {
            return Err(PlannerError::validation(format!(
                "Total budget must be between {MIN_BUDGET} and {MAX_BUDGET}"
            )));
        }
        if self.start_date < today {
            return Err(PlannerError::validation(
                "Travel dates cannot start in the past",
            ));
        }
        Ok(destination)
    }
}

/// Generated text for one day of the trip
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayPlan {
    /// 1-based day number
    pub day: u32,
    pub date: NaiveDate,
    /// Markdown body
    pub text: String,
    /// Image-generation hint, e.g. "visiting Louvre Museum"
    pub highlight: String,
    pub location: String,
    pub weather: String,
}

/// Aggregate result of one planning run, held only in the session store
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItineraryBundle {
    pub from_place: String,
    pub destination: DestinationCandidate,
    pub start_date: NaiveDate,
    pub num_days: u32,
    pub num_people: u32,
    pub budget: u64,
    pub currency: String,
    pub weather: Option<WeatherSnapshot>,
    pub attractions: Vec<PointOfInterest>,
    pub activities: Vec<PointOfInterest>,
    pub hotels: Vec<HotelOffer>,
    pub hotel_band: Option<BudgetBand>,
    pub packing_tips: String,
    pub day_plans: Vec<DayPlan>,
    /// Image URL per attraction or activity name
    pub images: BTreeMap<String, String>,
    /// Generated visual per day number
    #[serde(default)]
    pub day_visuals: BTreeMap<u32, String>,
    pub news: Vec<NewsArticle>,
    /// Non-fatal notices shown inline
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ItineraryBundle {
    /// Destination name used in titles and file names
    #[must_use]
    pub fn to_place(&self) -> &str {
        &self.destination.name
    }

    /// First resolved image, used as the document cover
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.attractions
            .iter()
            .chain(self.activities.iter())
            .find_map(|poi| self.images.get(&poi.name))
            .or_else(|| self.images.values().next())
            .map(String::as_str)
    }

    /// Download file name, e.g. `itinerary_Paris_20261019.txt`
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        let place: String = self
            .to_place()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!(
            "itinerary_{}_{}.{}",
            place,
            Utc::now().format("%Y%m%d"),
            extension
        )
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn destination() -> DestinationCandidate {
        DestinationCandidate {
            id: Some(2_988_507),
            latitude: 48.853_41,
            longitude: 2.3488,
            name: "Paris".to_string(),
            country: "France".to_string(),
            region: "Île-de-France".to_string(),
            timezone: "Europe/Paris".to_string(),
        }
    }

    pub fn request() -> TripRequest {
        TripRequest {
            from_place: "New York, USA".to_string(),
            destination: Some(destination()),
            start_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            num_days: 3,
            num_people: 2,
            budget: 25_000,
        }
    }

    pub fn bundle() -> ItineraryBundle {
        let request = request();
        ItineraryBundle {
            from_place: request.from_place,
            destination: destination(),
            start_date: request.start_date,
            num_days: request.num_days,
            num_people: request.num_people,
            budget: request.budget,
            currency: "INR".to_string(),
            weather: None,
            attractions: vec![
                PointOfInterest::new("Louvre Museum", "Museum", "World's largest art museum"),
                PointOfInterest::new("Eiffel Tower", "Landmark", "Iron lattice tower"),
            ],
            activities: vec![PointOfInterest::new(
                "Seine Cruise",
                "Relaxation",
                "Sunset on the river",
            )],
            hotels: vec![HotelOffer {
                name: "Hotel Lumière".to_string(),
                price: 5200,
                rating: 4.4,
                reviews: 812,
                address: "Rue de Rivoli".to_string(),
                link: "https://example.com/lumiere".to_string(),
                image: "https://example.com/lumiere.jpg".to_string(),
            }],
            hotel_band: BudgetBand::from_budget(25_000, 3),
            packing_tips: "Pack light jacket".to_string(),
            day_plans: Vec::new(),
            images: BTreeMap::from([
                ("Eiffel Tower".to_string(), "https://img.example/eiffel.jpg".to_string()),
                ("Louvre Museum".to_string(), "https://img.example/louvre.jpg".to_string()),
            ]),
            day_visuals: BTreeMap::new(),
            news: Vec::new(),
            warnings: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}
