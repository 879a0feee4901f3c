//! Display helpers shared by front ends.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    C,
    F,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::C => "C",
            TemperatureUnit::F => "F",
        }
    }

    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::C => celsius,
            TemperatureUnit::F => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::C),
            "f" | "fahrenheit" => Ok(TemperatureUnit::F),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: c, f."
            )),
        }
    }
}

/// Rounds to a whole degree, e.g. `"21°C"` or `"70°F"`.
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    // Adding 0.0 turns a rounded -0 into 0.
    let degrees = unit.convert(celsius).round() + 0.0;
    format!("{degrees}°{}", unit.symbol())
}

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Eight-point compass label for a bearing in degrees.
pub fn compass_direction(degrees: f64) -> &'static str {
    let index = (degrees / 45.0).round().rem_euclid(8.0) as usize;
    COMPASS_POINTS[index % COMPASS_POINTS.len()]
}

/// Clock time `HH:MM` of an ISO timestamp, e.g. `"2024-01-15T08:29"` becomes
/// `"08:29"`. Open-Meteo sends local times without an offset; RFC 3339
/// timestamps keep their own offset. Unparseable input is returned as-is.
pub fn format_time(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%H:%M").to_string();
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
        .map_or_else(|| timestamp.to_string(), |dt| dt.format("%H:%M").to_string())
}

/// Short weekday and date, e.g. `"2024-01-15"` becomes `"Mon, Jan 15"`.
/// Unparseable input is returned as-is.
pub fn format_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_or_else(|_| date.to_string(), |d| d.format("%a, %b %-d").to_string())
}
