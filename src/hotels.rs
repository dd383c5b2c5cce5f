//! Hotel search through SerpAPI's Google Hotels engine
//!
//! Offers are kept only when the lowest nightly rate lies inside the trip's
//! [`BudgetBand`], then ranked by rating.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::PlannerConfig;
use crate::http::Timeouts;
use crate::models::{BudgetBand, HotelOffer};

pub const FALLBACK_HOTEL_IMAGE: &str = "https://source.unsplash.com/400x300/?hotel";

#[derive(Clone)]
pub struct HotelFinder {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
    currency: String,
    country: String,
    max_hotels: usize,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct HotelsResponse {
    #[serde(default)]
    properties: Vec<Property>,
}

#[derive(Debug, Deserialize)]
struct Property {
    name: Option<String>,
    description: Option<String>,
    link: Option<String>,
    overall_rating: Option<f32>,
    reviews: Option<u64>,
    rate_per_night: Option<Rate>,
    #[serde(default)]
    images: Vec<PropertyImage>,
}

#[derive(Debug, Deserialize)]
struct Rate {
    lowest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PropertyImage {
    thumbnail: Option<String>,
}

/// Digits of a formatted price, e.g. `"₹1,200"` -> 1200; 0 when there are none
#[must_use]
pub fn parse_price(text: &str) -> u64 {
    text.chars()
        .filter(char::is_ascii_digit)
        .fold(0u64, |acc, d| {
            acc.saturating_mul(10)
                .saturating_add(u64::from(d.to_digit(10).unwrap_or(0)))
        })
}

impl Property {
    fn into_offer(self, location: &str) -> HotelOffer {
        let name = self.name.unwrap_or_else(|| "Hotel".to_string());
        let link = self.link.unwrap_or_else(|| {
            format!(
                "https://www.google.com/search?q={}",
                urlencoding::encode(&format!("hotel {name} {location}"))
            )
        });
        let image = self
            .images
            .into_iter()
            .next()
            .and_then(|i| i.thumbnail)
            .unwrap_or_else(|| FALLBACK_HOTEL_IMAGE.to_string());
        let price = self
            .rate_per_night
            .and_then(|r| r.lowest)
            .map_or(0, |lowest| parse_price(&lowest));

        HotelOffer {
            name,
            price,
            rating: self.overall_rating.unwrap_or(0.0),
            reviews: self.reviews.unwrap_or(0),
            address: self.description.unwrap_or_else(|| location.to_string()),
            link,
            image,
        }
    }
}

/// Keep offers inside the band, best rated first, at most `limit`
#[must_use]
pub fn select_offers(offers: Vec<HotelOffer>, band: &BudgetBand, limit: usize) -> Vec<HotelOffer> {
    let mut selected: Vec<HotelOffer> = offers
        .into_iter()
        .filter(|offer| band.contains(offer.price))
        .collect();
    selected.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    selected.truncate(limit);
    selected
}

impl HotelFinder {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            base_url: config.providers.serpapi.base_url.clone(),
            api_key: config.providers.serpapi.key().map(str::to_string),
            currency: config.planning.currency.clone(),
            country: config.planning.country.clone(),
            max_hotels: config.planning.max_hotels,
            timeout: Timeouts::from(&config.http).request,
        }
    }

    /// Hotels whose nightly price fits `band`; empty without a key or on failure
    #[instrument(skip(self, band))]
    pub async fn search(&self, location: &str, band: &BudgetBand, adults: u32) -> Vec<HotelOffer> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Vec::new();
        };

        let start_time = Instant::now();
        let check_in = Local::now().date_naive() + Days::new(1);
        match self.search_call(location, adults, check_in, api_key).await {
            Ok(offers) => {
                let total = offers.len();
                let selected = select_offers(offers, band, self.max_hotels);
                info!(
                    "{} of {} hotels within {:.0}-{:.0} in {:.3}s",
                    selected.len(),
                    total,
                    band.low,
                    band.high,
                    start_time.elapsed().as_secs_f64()
                );
                selected
            }
            Err(e) => {
                warn!("Hotel search error: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn search_call(
        &self,
        location: &str,
        adults: u32,
        check_in: NaiveDate,
        api_key: &str,
    ) -> Result<Vec<HotelOffer>> {
        let check_out = check_in + Days::new(1);
        let url = Url::parse_with_params(
            &format!("{}/search.json", self.base_url),
            &[
                ("engine", "google_hotels".to_string()),
                ("q", format!("hotels in {location}")),
                ("check_in_date", check_in.format("%Y-%m-%d").to_string()),
                ("check_out_date", check_out.format("%Y-%m-%d").to_string()),
                ("adults", adults.to_string()),
                ("currency", self.currency.clone()),
                ("gl", self.country.clone()),
                ("hl", "en".to_string()),
                ("api_key", api_key.to_string()),
            ],
        )
        .context("Invalid hotel search URL")?;
        debug!("Hotel search {} to {}", check_in, check_out);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let hotels: HotelsResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse hotel search response")?;

        Ok(hotels
            .properties
            .into_iter()
            .map(|p| p.into_offer(location))
            .collect())
    }
}
