use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One condition entry from the provider (`weather[n]` in the payload).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition group, e.g. "Clear", "Rain", "Clouds"
    pub main: String,
    /// Localized free-text description
    pub description: String,
}

/// Temperature and atmosphere readings (`main` in the payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Temperature in °C (metric units requested on every call)
    pub temp: f64,
    /// Perceived temperature in °C
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: u32,
}

/// Wind readings, absent in some payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Speed in m/s
    pub speed: f64,
    /// Direction in degrees
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SysInfo {
    pub country: Option<String>,
}

/// Current conditions for a resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Resolved city name
    pub name: String,
    #[serde(default)]
    pub sys: SysInfo,
    /// Observation time, UTC seconds
    pub dt: i64,
    pub main: Measurements,
    pub weather: Vec<Condition>,
    pub wind: Option<Wind>,
    /// Visibility in meters
    pub visibility: Option<u32>,
}

impl CurrentWeather {
    /// Primary condition entry; the provider always sends at least one,
    /// but a missing entry degrades to the default instead of panicking.
    pub fn condition(&self) -> Condition {
        self.weather.first().cloned().unwrap_or_default()
    }
}

/// One 3-hour forecast sample from the provider's 5-day feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Forecast time, UTC seconds
    pub dt: i64,
    pub main: Measurements,
    pub weather: Vec<Condition>,
    pub wind: Option<Wind>,
}

impl ForecastSample {
    /// Primary condition entry, defaulting when the list is empty.
    pub fn condition(&self) -> Condition {
        self.weather.first().cloned().unwrap_or_default()
    }

    /// Sample timestamp as a UTC datetime.
    pub fn timestamp_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.dt, 0).unwrap_or_default()
    }

    /// Calendar date of this sample in the given timezone.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.timestamp_utc().with_timezone(tz).date_naive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: Option<String>,
}

/// The provider's 5-day/3-hour forecast payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
    #[serde(default)]
    pub city: City,
}

/// Weather API errors.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("location not found: {0}")]
    NotFound(String),
    #[error("weather API error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Parse(String),
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),
}
