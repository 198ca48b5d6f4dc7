mod humidity;

pub use humidity::{HumidityCache, HumidityReading};

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

use crate::error::{LedgerError, Result};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Coarse reading of a WMO weather interpretation code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Overcast,
    Drizzle,
    Rain,
    Snow,
    Unknown,
}

impl Condition {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Condition::Clear,
            1 | 2 => Condition::PartlyCloudy,
            3 => Condition::Overcast,
            51..=67 => Condition::Drizzle,
            80..=86 => Condition::Rain,
            71..=77 => Condition::Snow,
            _ => Condition::Unknown,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Condition::Clear => "Clear",
            Condition::PartlyCloudy => "Partly cloudy",
            Condition::Overcast => "Overcast",
            Condition::Drizzle => "Drizzle",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub temperature: f64,
    pub code: u32,
    pub condition: Condition,
    pub high: Option<f64>,
    pub low: Option<f64>,
    /// Relative humidity (%) for the hour closest to now
    pub humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
    #[serde(default)]
    daily: Option<Daily>,
    #[serde(default)]
    hourly: Option<Hourly>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u32,
}

#[derive(Debug, Deserialize)]
struct Daily {
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct Hourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    relativehumidity_2m: Vec<Option<f64>>,
}

impl Hourly {
    /// Humidity at the slot whose hour is nearest `now`; the first slot when
    /// no timestamp parses.
    fn nearest(&self, now: NaiveDateTime) -> Option<u8> {
        let idx = self
            .time
            .iter()
            .enumerate()
            .filter_map(|(i, t)| {
                NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M")
                    .ok()
                    .map(|at| (i, (at - now).num_minutes().abs()))
            })
            .min_by_key(|(_, distance)| *distance)
            .map(|(i, _)| i)
            .unwrap_or(0);

        let value = self.relativehumidity_2m.get(idx).copied().flatten()?;
        Some(value.round().clamp(0.0, 100.0) as u8)
    }
}

pub fn forecast_url(latitude: f64, longitude: f64) -> String {
    format!(
        "{FORECAST_URL}?latitude={latitude}&longitude={longitude}&current_weather=true\
         &daily=temperature_2m_max,temperature_2m_min&hourly=relativehumidity_2m\
         &timezone=auto&forecast_days=1"
    )
}

/// Parse an Open-Meteo forecast response as seen at local time `now`.
pub fn parse_forecast(body: &str, now: NaiveDateTime) -> Result<Forecast> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| LedgerError::Weather(e.to_string()))?;

    let current = response
        .current_weather
        .ok_or_else(|| LedgerError::Weather("response has no current weather".to_string()))?;

    let (high, low) = response
        .daily
        .map(|d| {
            (
                d.temperature_2m_max.first().copied(),
                d.temperature_2m_min.first().copied(),
            )
        })
        .unwrap_or((None, None));

    Ok(Forecast {
        temperature: current.temperature,
        code: current.weathercode,
        condition: Condition::from_code(current.weathercode),
        high,
        low,
        humidity: response.hourly.and_then(|h| h.nearest(now)),
    })
}

/// Fetch today's forecast for a location.
pub fn fetch_forecast(latitude: f64, longitude: f64, now: NaiveDateTime) -> Result<Forecast> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(5)))
        .build()
        .into();

    let url = forecast_url(latitude, longitude);
    debug!(%url, "fetching forecast");

    let body: String = agent
        .get(url.as_str())
        .call()
        .map_err(|e| LedgerError::Weather(e.to_string()))?
        .body_mut()
        .read_to_string()
        .map_err(|e| LedgerError::Weather(e.to_string()))?;

    parse_forecast(&body, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BODY: &str = r#"{
        "current_weather": {"temperature": 28.4, "windspeed": 9.1, "weathercode": 2},
        "daily": {"temperature_2m_max": [31.2], "temperature_2m_min": [24.8]},
        "hourly": {
            "time": ["2025-01-15T12:00", "2025-01-15T13:00", "2025-01-15T14:00"],
            "relativehumidity_2m": [70, 74.6, 80]
        }
    }"#;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn maps_weather_codes() {
        assert_eq!(Condition::from_code(0).to_string(), "Clear");
        assert_eq!(Condition::from_code(2), Condition::PartlyCloudy);
        assert_eq!(Condition::from_code(3), Condition::Overcast);
        assert_eq!(Condition::from_code(61), Condition::Drizzle);
        assert_eq!(Condition::from_code(81), Condition::Rain);
        assert_eq!(Condition::from_code(73), Condition::Snow);
        assert_eq!(Condition::from_code(95), Condition::Unknown);
    }

    #[test]
    fn parses_forecast_and_nearest_humidity() {
        let forecast = parse_forecast(BODY, at(13, 10)).unwrap();
        assert_eq!(forecast.temperature, 28.4);
        assert_eq!(forecast.condition, Condition::PartlyCloudy);
        assert_eq!(forecast.high, Some(31.2));
        assert_eq!(forecast.low, Some(24.8));
        assert_eq!(forecast.humidity, Some(75));

        let later = parse_forecast(BODY, at(13, 40)).unwrap();
        assert_eq!(later.humidity, Some(80));
    }

    #[test]
    fn tolerates_missing_sections() {
        let body = r#"{"current_weather": {"temperature": 20.0, "weathercode": 0}}"#;
        let forecast = parse_forecast(body, at(9, 0)).unwrap();
        assert_eq!(forecast.high, None);
        assert_eq!(forecast.humidity, None);
    }

    #[test]
    fn missing_current_weather_is_an_error() {
        let err = parse_forecast("{}", at(9, 0)).unwrap_err();
        assert!(err.to_string().starts_with("Unable to load weather"));
        assert!(parse_forecast("<html>", at(9, 0)).is_err());
    }

    #[test]
    fn url_carries_location_and_humidity() {
        let url = forecast_url(6.9271, 79.8612);
        assert!(url.contains("latitude=6.9271"));
        assert!(url.contains("longitude=79.8612"));
        assert!(url.contains("hourly=relativehumidity_2m"));
    }
}
