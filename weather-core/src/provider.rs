use crate::{
    Config, Coordinates, CurrentWeather, ForecastDay, HourlyForecast, RetrievalError,
    TimelineInterval, WeatherReport,
    provider::{openmeteo::OpenMeteoClient, tomorrow::TomorrowClient},
};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug};

pub mod openmeteo;
pub mod tomorrow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenMeteo,
    Tomorrow,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "openmeteo",
            ProviderId::Tomorrow => "tomorrow",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenMeteo, ProviderId::Tomorrow]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::Tomorrow)
    }

    /// Environment variable that overrides the configured API key.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderId::OpenMeteo => None,
            ProviderId::Tomorrow => Some("TOMORROW_API_KEY"),
        }
    }

    /// Environment variable that overrides the configured base URL.
    pub fn base_url_env(&self) -> &'static str {
        match self {
            ProviderId::OpenMeteo => "OPEN_METEO_BASE_URL",
            ProviderId::Tomorrow => "TOMORROW_BASE_URL",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openmeteo" | "open-meteo" => Ok(ProviderId::OpenMeteo),
            "tomorrow" | "tomorrow.io" => Ok(ProviderId::Tomorrow),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openmeteo, tomorrow."
            )),
        }
    }
}

/// Current conditions plus daily and hourly forecasts for a position.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentWeather, RetrievalError>;

    /// At most `days` entries, in provider order.
    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
        days: usize,
    ) -> Result<Vec<ForecastDay>, RetrievalError>;

    /// At most `hours` entries, in provider order.
    async fn fetch_hourly(
        &self,
        coordinates: Coordinates,
        hours: usize,
    ) -> Result<Vec<HourlyForecast>, RetrievalError>;

    /// Issues all three requests concurrently and fails with the first error.
    async fn fetch_report(
        &self,
        coordinates: Coordinates,
        days: usize,
        hours: usize,
    ) -> Result<WeatherReport, RetrievalError> {
        let (current, forecast, hourly) = tokio::try_join!(
            self.fetch_current(coordinates),
            self.fetch_forecast(coordinates, days),
            self.fetch_hourly(coordinates, hours),
        )?;

        Ok(WeatherReport { current, forecast, hourly })
    }
}

/// Short-range timeline for a position.
#[async_trait]
pub trait TimelineProvider: Send + Sync + Debug {
    async fn fetch_timeline(
        &self,
        coordinates: Coordinates,
    ) -> Result<TimelineInterval, RetrievalError>;
}

/// Construct the Open-Meteo client; it needs no credentials.
pub fn open_meteo_from_config(config: &Config) -> OpenMeteoClient {
    match config.provider_base_url(ProviderId::OpenMeteo) {
        Some(base_url) => OpenMeteoClient::with_base_url(base_url),
        None => OpenMeteoClient::new(),
    }
}

/// Construct the Tomorrow.io client from the configured API key.
pub fn tomorrow_from_config(config: &Config) -> anyhow::Result<TomorrowClient> {
    let id = ProviderId::Tomorrow;
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: set {} or run `weather configure {id}` and enter your API key.",
            id.api_key_env().unwrap_or_default()
        )
    })?;

    let client = match config.provider_base_url(id) {
        Some(base_url) => TomorrowClient::with_base_url(api_key.to_owned(), base_url),
        None => TomorrowClient::new(api_key.to_owned()),
    };
    Ok(client)
}

/// Send `request`, check the status and decode the JSON body.
///
/// Transport errors and non-2xx statuses become `NetworkFailure`; a body that
/// does not decode into `T` becomes `MalformedResponse`. Transport errors are
/// stripped of their URL, which may carry an API key in its query.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<T, RetrievalError> {
    let res = request
        .send()
        .await
        .map_err(|e| {
            RetrievalError::network(format!("Failed to send {what} request: {}", e.without_url()))
        })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| {
            RetrievalError::network(format!(
                "Failed to read {what} response body: {}",
                e.without_url()
            ))
        })?;

    if !status.is_success() {
        return Err(RetrievalError::network(format!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body),
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| RetrievalError::malformed(format!("Failed to parse {what} JSON: {e}")))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
