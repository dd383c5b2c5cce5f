//! `OpenMeteo` API response structures and conversion utilities

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{CurrentConditions, DailyForecast, WeatherSnapshot};

/// Forecast response from the `OpenMeteo` API
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: String,
    pub current: Option<CurrentData>,
    pub daily: Option<DailyData>,
}

/// Current conditions from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct CurrentData {
    #[serde(rename = "temperature_2m")]
    pub temperature: f32,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: Option<f32>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<f32>,
    pub weather_code: Option<u8>,
}

/// Daily aggregates from `OpenMeteo`; every array is index-aligned with `time`
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    pub weather_code: Option<Vec<Option<u8>>>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f32>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f32>>>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation: Option<Vec<Option<f32>>>,
}

fn value_at<T: Copy>(values: &Option<Vec<Option<T>>>, i: usize) -> Option<T> {
    values.as_ref().and_then(|v| v.get(i).copied().flatten())
}

impl ForecastResponse {
    /// Convert to the internal snapshot; days with an unparsable date are skipped
    #[must_use]
    pub fn into_snapshot(self) -> WeatherSnapshot {
        let current = self.current.map(|c| CurrentConditions {
            temperature: c.temperature,
            humidity: c.humidity,
            wind_speed_kmh: c.wind_speed,
            condition_code: c.weather_code,
        });

        let daily = self
            .daily
            .map(|daily| {
                daily
                    .time
                    .iter()
                    .enumerate()
                    .filter_map(|(i, time)| {
                        let date = NaiveDate::parse_from_str(time, "%Y-%m-%d").ok()?;
                        Some(DailyForecast {
                            date,
                            temperature_max: value_at(&daily.temperature_max, i),
                            temperature_min: value_at(&daily.temperature_min, i),
                            precipitation: value_at(&daily.precipitation, i),
                            condition_code: value_at(&daily.weather_code, i),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        WeatherSnapshot {
            timezone: self.timezone,
            current,
            daily,
        }
    }
}
