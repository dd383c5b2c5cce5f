//! Hotel offers and the nightly budget band

use serde::{Deserialize, Serialize};

/// A hotel that fits the trip's nightly budget band
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HotelOffer {
    pub name: String,
    /// Lowest nightly rate in the search currency
    pub price: u64,
    pub rating: f32,
    pub reviews: u64,
    pub address: String,
    pub link: String,
    pub image: String,
}

/// Accepted nightly price range: 50% to 75% of the per-day budget
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BudgetBand {
    pub low: f64,
    pub high: f64,
}

impl BudgetBand {
    pub const LOW_SHARE: f64 = 0.5;
    pub const HIGH_SHARE: f64 = 0.75;

    /// Band for a total budget spread over `days`; `None` when `days` is zero
    #[must_use]
    pub fn from_budget(budget: u64, days: u32) -> Option<Self> {
        if days == 0 {
            return None;
        }
        let per_day = budget as f64 / f64::from(days);
        Some(Self {
            low: per_day * Self::LOW_SHARE,
            high: per_day * Self::HIGH_SHARE,
        })
    }

    #[must_use]
    pub fn contains(&self, price: u64) -> bool {
        let price = price as f64;
        self.low <= price && price <= self.high
    }

    /// Warning surfaced when no hotel falls inside the band
    #[must_use]
    pub fn empty_warning(&self) -> String {
        format!(
            "No hotels found strictly between ₹{} and ₹{}/night. Try adjusting your budget!",
            self.low as u64, self.high as u64
        )
    }
}
