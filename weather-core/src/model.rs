use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// A validated WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RetrievalError> {
        // NaN fails both range checks.
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(RetrievalError::InvalidCoordinates { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// Unchecked constructor for the static location table.
    pub(crate) const fn from_static(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = RetrievalError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.latitude, raw.longitude)
    }
}

/// Current conditions normalized from an Open-Meteo response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    /// Open-Meteo's `current_weather` block has no apparent temperature, so this mirrors `temperature`.
    pub feels_like: f64,
    /// Placeholder, always `0.0`.
    pub humidity: f64,
    /// Placeholder, always `0.0`.
    pub pressure: f64,
    pub wind_speed: f64,
    /// Degrees.
    pub wind_direction: f64,
    pub weather_code: u8,
    pub weather_description: String,
    /// Today's sunrise, ISO 8601 local time.
    pub sunrise: String,
    /// Today's sunset, ISO 8601 local time.
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO date, e.g. `2024-01-15`.
    pub date: String,
    /// Degrees Celsius. Required for every day in the response: a `null`
    /// anywhere in the column fails the whole forecast with
    /// `MalformedResponse`, even for days past the requested count.
    pub temp_max: f64,
    /// Degrees Celsius. Same `null` handling as `temp_max`.
    pub temp_min: f64,
    /// Percent, 0-100. Open-Meteo reports `null` when the model has no value.
    pub precipitation_probability: Option<f64>,
    /// WMO code. Same `null` handling as `temp_max`.
    pub weather_code: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Local ISO timestamp, e.g. `2024-01-15T08:00`.
    pub time: String,
    /// Degrees Celsius; a `null` in the column is a `MalformedResponse`.
    pub temperature: f64,
    pub precipitation_probability: Option<f64>,
    pub wind_speed: f64,
}

/// Everything the Open-Meteo client knows about one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
    pub hourly: Vec<HourlyForecast>,
}

/// Field values of a single Tomorrow.io timeline interval (metric units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineValues {
    pub wind_direction: f64,
    pub humidity: f64,
    pub temperature: f64,
    pub wind_speed: f64,
    pub uv_index: f64,
    /// mm/h
    pub rain_intensity: f64,
    pub temperature_apparent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInterval {
    pub start_time: DateTime<Utc>,
    pub values: TimelineValues,
}

/// One of the predefined places shown by the Tomorrow.io front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: u32,
    pub city: &'static str,
    pub country: &'static str,
    pub coordinates: Coordinates,
}
