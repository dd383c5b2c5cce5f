//! Weather snapshot model and display methods

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::weather::describe_condition;

/// Current conditions at the destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: Option<f32>,
    /// Wind speed in km/h
    pub wind_speed_kmh: Option<f32>,
    /// WMO condition code
    pub condition_code: Option<u8>,
}

/// One day of the forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature_max: Option<f32>,
    pub temperature_min: Option<f32>,
    /// Precipitation sum in mm
    pub precipitation: Option<f32>,
    pub condition_code: Option<u8>,
}

/// Current conditions plus the multi-day forecast, immutable once fetched
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub timezone: String,
    pub current: Option<CurrentConditions>,
    pub daily: Vec<DailyForecast>,
}

impl CurrentConditions {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature)
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        self.humidity
            .map_or_else(|| "–".to_string(), |h| format!("{h}%"))
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        self.wind_speed_kmh
            .map_or_else(|| "–".to_string(), |w| format!("{w} km/h"))
    }

    /// Emoji label of the condition code, generic fallback when unknown
    #[must_use]
    pub fn condition(&self) -> &'static str {
        describe_condition(self.condition_code)
    }
}

impl DailyForecast {
    #[must_use]
    pub fn condition(&self) -> &'static str {
        describe_condition(self.condition_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_formatting() {
        let current = CurrentConditions {
            temperature: 21.5,
            humidity: Some(64.0),
            wind_speed_kmh: Some(12.3),
            condition_code: Some(2),
        };
        assert_eq!(current.format_temperature(), "21.5°C");
        assert_eq!(current.format_humidity(), "64%");
        assert_eq!(current.format_wind(), "12.3 km/h");
        assert_eq!(current.condition(), "⛅ Partly cloudy");
    }

    #[test]
    fn test_missing_values_render_placeholders() {
        let current = CurrentConditions {
            temperature: 3.0,
            humidity: None,
            wind_speed_kmh: None,
            condition_code: None,
        };
        assert_eq!(current.format_humidity(), "–");
        assert_eq!(current.format_wind(), "–");
        assert_eq!(current.condition(), "🌤️ Fair weather");
    }
}
