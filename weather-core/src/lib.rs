//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Open-Meteo and Tomorrow.io clients that fetch and normalize weather data
//! - Shared domain models (coordinates, current conditions, forecasts, timelines)
//! - The WMO weather-code table and rain-intensity bands
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod locations;
pub mod model;
pub mod provider;
pub mod rain;
pub mod weather_code;

pub use config::{Config, DisplayConfig, ProviderConfig};
pub use error::RetrievalError;
pub use format::{
    TemperatureUnit, compass_direction, format_date, format_temperature, format_time,
};
pub use locations::{all_locations, location_by_id};
pub use model::{
    Coordinates, CurrentWeather, ForecastDay, HourlyForecast, Location, TimelineInterval,
    TimelineValues, WeatherReport,
};
pub use provider::{
    ForecastProvider, ProviderId, TimelineProvider, open_meteo_from_config,
    openmeteo::OpenMeteoClient, tomorrow::TomorrowClient, tomorrow_from_config,
};
pub use rain::{RainBand, RainIntensity, classify_rain_intensity};
