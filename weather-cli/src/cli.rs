use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use weather_core::{
    Config, Coordinates, ForecastProvider, ProviderId, TemperatureUnit, TimelineProvider,
    all_locations, location_by_id, open_meteo_from_config, tomorrow_from_config,
};

use crate::output::Output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Temperature unit for output ("c" or "f"); defaults to the configured unit.
    #[arg(long, global = true)]
    pub unit: Option<TemperatureUnit>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct Position {
    /// Latitude in degrees, -90..=90.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees, -180..=180.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

impl Position {
    fn coordinates(&self) -> anyhow::Result<Coordinates> {
        Ok(Coordinates::new(self.lat, self.lon)?)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials or endpoint for a specific provider.
    Configure {
        /// Provider short name, e.g. "openmeteo" or "tomorrow".
        provider: String,
    },

    #[command(flatten)]
    Query(Query),
}

/// Commands that read the configuration and print weather data.
#[derive(Debug, Subcommand)]
pub enum Query {
    /// Show current conditions from Open-Meteo.
    Current {
        #[command(flatten)]
        position: Position,
    },

    /// Show the daily forecast from Open-Meteo.
    Forecast {
        #[command(flatten)]
        position: Position,

        /// Number of days to show.
        #[arg(long, default_value_t = 7)]
        days: usize,
    },

    /// Show the hourly forecast from Open-Meteo.
    Hourly {
        #[command(flatten)]
        position: Position,

        /// Number of hours to show.
        #[arg(long, default_value_t = 24)]
        hours: usize,
    },

    /// Show current conditions, daily and hourly forecast together.
    Report {
        #[command(flatten)]
        position: Position,

        #[arg(long, default_value_t = 7)]
        days: usize,

        #[arg(long, default_value_t = 24)]
        hours: usize,
    },

    /// List the predefined locations.
    Locations,

    /// Show Tomorrow.io conditions for a predefined location.
    Conditions {
        /// Location id as listed by `weather locations`.
        location_id: u32,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Query(query) => {
                let config = Config::load()?;
                let out = Output {
                    unit: self.unit.unwrap_or(config.display.temperature_unit),
                    json: self.json,
                };
                show(query, &config, &out).await
            }
        }
    }
}

async fn show(query: Query, config: &Config, out: &Output) -> anyhow::Result<()> {
    match query {
        Query::Current { position } => {
            let client = open_meteo_from_config(config);
            let current = client.fetch_current(position.coordinates()?).await?;
            out.current(&current)
        }
        Query::Forecast { position, days } => {
            let client = open_meteo_from_config(config);
            let forecast = client.fetch_forecast(position.coordinates()?, days).await?;
            out.forecast(&forecast)
        }
        Query::Hourly { position, hours } => {
            let client = open_meteo_from_config(config);
            let hourly = client.fetch_hourly(position.coordinates()?, hours).await?;
            out.hourly(&hourly)
        }
        Query::Report { position, days, hours } => {
            let client = open_meteo_from_config(config);
            let report = client.fetch_report(position.coordinates()?, days, hours).await?;
            out.report(&report)
        }
        Query::Locations => out.locations(all_locations()),
        Query::Conditions { location_id } => {
            let location = location_by_id(location_id).ok_or_else(|| {
                anyhow!(
                    "Unknown location id {location_id}.\n\
                     Hint: run `weather locations` to list the available ids."
                )
            })?;
            let client = tomorrow_from_config(config)?;
            debug!(city = location.city, "Fetching Tomorrow.io timeline");
            let interval = client.fetch_timeline(location.coordinates).await?;
            out.conditions(location, &interval)
        }
    }
}

/// Interactive configuration, written to the config file only.
fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    // File values only: environment overrides must not be written back.
    let mut config = Config::load_file()?;

    if id.requires_api_key() {
        let key = inquire::Password::new(&format!("API key for {id}:"))
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?;
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("API key cannot be empty"));
        }
        config.upsert_provider_api_key(id, key.to_string());
    }

    let base_url = inquire::Text::new(&format!("Base URL for {id} (leave empty for default):"))
        .prompt()
        .context("Failed to read base URL")?;
    let base_url = base_url.trim();
    if !base_url.is_empty() {
        config.set_provider_base_url(id, base_url.to_string());
    }

    let unit = inquire::Select::new("Temperature unit:", vec![TemperatureUnit::C, TemperatureUnit::F])
        .with_starting_cursor(match config.display.temperature_unit {
            TemperatureUnit::C => 0,
            TemperatureUnit::F => 1,
        })
        .prompt()
        .context("Failed to read temperature unit")?;
    config.display.temperature_unit = unit;

    config.save()?;
    let path = Config::config_file_path()?;
    info!(provider = %id, path = %path.display(), "Saved configuration");
    println!("Configuration for {id} saved to {}", path.display());

    Ok(())
}
