//! Packing advice and per-day plans

use chrono::{Days, NaiveDate};
use tracing::{info, instrument, warn};

use crate::content::LanguageModel;
use crate::models::{DayPlan, PointOfInterest, WeatherSnapshot};
use crate::weather::describe_condition;

const PACKING_MAX_TOKENS: u32 = 300;

pub const GENERIC_PACKING_TIPS: &str =
    "👕 Pack comfortable, versatile clothing suitable for urban exploration.";

/// Temperature-based advice used when the model is unavailable
#[must_use]
pub fn fallback_packing_tips(weather: Option<&WeatherSnapshot>) -> &'static str {
    let Some(current) = weather.and_then(|w| w.current.as_ref()) else {
        return GENERIC_PACKING_TIPS;
    };
    match current.temperature {
        t if t < 10.0 => {
            "🧥 Pack warm layers, heavy coat, warm hat, gloves, and thermal underwear. A scarf is essential!"
        }
        t if t < 20.0 => {
            "🧥 Pack light jacket, sweater, jeans, and comfortable walking shoes. Bring a light scarf."
        }
        t if t < 25.0 => {
            "👕 Pack t-shirts, light shorts, comfortable walking shoes, and a light cardigan for evenings."
        }
        _ => {
            "☀️ Pack light, breathable clothing, shorts, sandals, sunglasses, and sunscreen. Bring a hat!"
        }
    }
}

fn packing_prompt(num_days: u32, condition: &str, temperature: f32) -> String {
    format!(
        "Create a friendly, enthusiastic packing list for a {num_days} day trip.
Weather conditions: {condition}, Temperature: {temperature}°C

Include:
- Specific clothing items
- Layers recommendations
- Accessories
- Footwear suggestions

Be conversational and helpful!"
    )
}

#[derive(Clone)]
pub struct PackingAdvisor {
    model: LanguageModel,
}

impl PackingAdvisor {
    #[must_use]
    pub fn new(model: LanguageModel) -> Self {
        Self { model }
    }

    /// Model-written packing list when a key and current conditions are
    /// available, otherwise the temperature fallback
    #[instrument(skip(self, weather))]
    pub async fn packing_tips(&self, weather: Option<&WeatherSnapshot>, num_days: u32) -> String {
        let current = weather.and_then(|w| w.current.as_ref());
        if let (true, Some(current)) = (self.model.is_configured(), current) {
            let prompt = packing_prompt(num_days, current.condition(), current.temperature);
            match self.model.complete(&prompt, Some(PACKING_MAX_TOKENS)).await {
                Ok(tips) => {
                    info!("Generated packing tips");
                    return tips;
                }
                Err(e) => warn!("Packing tips error: {:#}", e),
            }
        }
        fallback_packing_tips(weather).to_string()
    }
}

fn day_text(day: u32, first: &str, second: &str, weather: &str) -> String {
    format!(
        "### Day {day} - Adventure Awaits! 🌟

**Morning (9:00 AM - 12:00 PM)**
- Start your day with a hearty breakfast at a local café
- Visit: {first}
- Time to explore: 3 hours

**Afternoon (12:00 PM - 5:00 PM)**
- Lunch at a nearby restaurant with local cuisine
- Visit: {second}
- Leisure time for photos and exploration: 3 hours

**Evening (5:00 PM - 9:00 PM)**
- Rest and refresh at your hotel
- Dinner at a highly-rated restaurant
- Evening walk or cultural experience

**Weather:** {weather}
**Tips:** Stay hydrated, wear comfortable shoes, bring a camera!
"
    )
}

/// One plan per forecast day, up to `num_days`.
///
/// Day `i` visits `attractions[i % n]` in the morning and the attraction after
/// it in the afternoon. No plans are produced without attractions or forecast.
#[must_use]
pub fn day_plans(
    location: &str,
    start_date: NaiveDate,
    num_days: u32,
    attractions: &[PointOfInterest],
    weather: Option<&WeatherSnapshot>,
) -> Vec<DayPlan> {
    let Some(weather) = weather else {
        return Vec::new();
    };
    if attractions.is_empty() {
        return Vec::new();
    }

    weather
        .daily
        .iter()
        .take(num_days as usize)
        .enumerate()
        .map(|(i, forecast)| {
            let offset = i % attractions.len();
            let first = attractions[offset].name.as_str();
            let second = attractions
                .get(offset + 1)
                .map_or("Shopping District", |a| a.name.as_str());
            let condition = describe_condition(forecast.condition_code);
            let day = i as u32 + 1;

            DayPlan {
                day,
                date: start_date + Days::new(i as u64),
                text: day_text(day, first, second, condition),
                highlight: format!("visiting {first}"),
                location: location.to_string(),
                weather: condition.to_string(),
            }
        })
        .collect()
}
