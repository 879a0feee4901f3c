use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::RetrievalError,
    model::{Coordinates, CurrentWeather, ForecastDay, HourlyForecast},
    provider::get_json,
    weather_code,
};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const DAILY_FORECAST_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_probability_max,weathercode";
const HOURLY_FORECAST_FIELDS: &str = "temperature_2m,precipitation_probability,wind_speed_10m";

/// Open-Meteo forecast API client. Holds no state besides its endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    base_url: String,
    http: Client,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        coordinates: Coordinates,
        params: &[(&str, &str)],
    ) -> Result<RequestBuilder, RetrievalError> {
        let latitude = coordinates.latitude().to_string();
        let longitude = coordinates.longitude().to_string();

        let mut query = vec![("latitude", latitude.as_str()), ("longitude", longitude.as_str())];
        query.extend_from_slice(params);
        query.push(("timezone", "auto"));

        let url = Url::parse_with_params(&self.base_url, &query).map_err(|e| {
            RetrievalError::network(format!("Invalid Open-Meteo base URL '{}': {e}", self.base_url))
        })?;

        debug!(url = %url, "Open-Meteo request");

        Ok(self.http.get(url))
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(
        skip(self, coordinates),
        fields(lat = %coordinates.latitude(), lon = %coordinates.longitude())
    )]
    async fn fetch_current(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentWeather, RetrievalError> {
        let request = self.request(
            coordinates,
            &[("current_weather", "true"), ("daily", "sunrise,sunset")],
        )?;
        let response: OmResponse = get_json(request, "Open-Meteo current weather").await?;
        normalize_current(response)
    }

    #[instrument(
        skip(self, coordinates),
        fields(lat = %coordinates.latitude(), lon = %coordinates.longitude())
    )]
    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
        days: usize,
    ) -> Result<Vec<ForecastDay>, RetrievalError> {
        let request = self.request(coordinates, &[("daily", DAILY_FORECAST_FIELDS)])?;
        let response: OmResponse = get_json(request, "Open-Meteo daily forecast").await?;
        normalize_daily(response.daily, days)
    }

    #[instrument(
        skip(self, coordinates),
        fields(lat = %coordinates.latitude(), lon = %coordinates.longitude())
    )]
    async fn fetch_hourly(
        &self,
        coordinates: Coordinates,
        hours: usize,
    ) -> Result<Vec<HourlyForecast>, RetrievalError> {
        let request = self.request(coordinates, &[("hourly", HOURLY_FORECAST_FIELDS)])?;
        let response: OmResponse = get_json(request, "Open-Meteo hourly forecast").await?;
        normalize_hourly(response.hourly, hours)
    }
}

// Every block is optional so that a missing key surfaces as MalformedResponse
// with a precise message instead of a generic decode error.

#[derive(Debug, Deserialize)]
struct OmResponse {
    current_weather: Option<OmCurrentWeather>,
    daily: Option<OmDaily>,
    hourly: Option<OmHourly>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: u8,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Option<Vec<String>>,
    sunrise: Option<Vec<String>>,
    sunset: Option<Vec<String>>,
    temperature_2m_max: Option<Vec<f64>>,
    temperature_2m_min: Option<Vec<f64>>,
    precipitation_probability_max: Option<Vec<Option<f64>>>,
    weathercode: Option<Vec<u8>>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Option<Vec<String>>,
    temperature_2m: Option<Vec<f64>>,
    precipitation_probability: Option<Vec<Option<f64>>>,
    wind_speed_10m: Option<Vec<f64>>,
}

fn normalize_current(response: OmResponse) -> Result<CurrentWeather, RetrievalError> {
    let current = response
        .current_weather
        .ok_or_else(|| RetrievalError::malformed("No current_weather field returned by API"))?;

    let (sunrise, sunset) = response
        .daily
        .and_then(|daily| daily.sunrise.zip(daily.sunset))
        .ok_or_else(|| RetrievalError::malformed("No sunrise/sunset data returned by API"))?;

    let first = |entries: Vec<String>, name: &str| {
        entries
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::malformed(format!("daily.{name} array is empty")))
    };

    Ok(CurrentWeather {
        temperature: current.temperature,
        feels_like: current.temperature,
        humidity: 0.0,
        pressure: 0.0,
        wind_speed: current.windspeed,
        wind_direction: current.winddirection,
        weather_code: current.weathercode,
        weather_description: weather_code::describe(current.weathercode).to_string(),
        sunrise: first(sunrise, "sunrise")?,
        sunset: first(sunset, "sunset")?,
    })
}

fn normalize_daily(daily: Option<OmDaily>, days: usize) -> Result<Vec<ForecastDay>, RetrievalError> {
    let daily = daily.ok_or_else(|| RetrievalError::malformed("No daily forecast data returned by API"))?;
    let time = daily
        .time
        .as_deref()
        .ok_or_else(|| RetrievalError::malformed("No daily forecast data returned by API"))?;

    let len = time.len();
    let max = column(&daily.temperature_2m_max, "daily.temperature_2m_max", len)?;
    let min = column(&daily.temperature_2m_min, "daily.temperature_2m_min", len)?;
    let precip = column(
        &daily.precipitation_probability_max,
        "daily.precipitation_probability_max",
        len,
    )?;
    let codes = column(&daily.weathercode, "daily.weathercode", len)?;

    Ok(time
        .iter()
        .take(days)
        .enumerate()
        .map(|(i, date)| ForecastDay {
            date: date.clone(),
            temp_max: max[i],
            temp_min: min[i],
            precipitation_probability: precip[i],
            weather_code: codes[i],
        })
        .collect())
}

fn normalize_hourly(
    hourly: Option<OmHourly>,
    hours: usize,
) -> Result<Vec<HourlyForecast>, RetrievalError> {
    let hourly =
        hourly.ok_or_else(|| RetrievalError::malformed("No hourly forecast data returned by API"))?;
    let time = hourly
        .time
        .as_deref()
        .ok_or_else(|| RetrievalError::malformed("No hourly forecast data returned by API"))?;

    let len = time.len();
    let temperature = column(&hourly.temperature_2m, "hourly.temperature_2m", len)?;
    let precip = column(
        &hourly.precipitation_probability,
        "hourly.precipitation_probability",
        len,
    )?;
    let wind = column(&hourly.wind_speed_10m, "hourly.wind_speed_10m", len)?;

    Ok(time
        .iter()
        .take(hours)
        .enumerate()
        .map(|(i, t)| HourlyForecast {
            time: t.clone(),
            temperature: temperature[i],
            precipitation_probability: precip[i],
            wind_speed: wind[i],
        })
        .collect())
}

/// A parallel array that must be present and exactly as long as `time`.
fn column<'a, T>(
    values: &'a Option<Vec<T>>,
    name: &str,
    expected: usize,
) -> Result<&'a [T], RetrievalError> {
    let values = values
        .as_deref()
        .ok_or_else(|| RetrievalError::malformed(format!("No {name} array returned by API")))?;

    if values.len() != expected {
        return Err(RetrievalError::malformed(format!(
            "{name} has {} entries but time has {expected}",
            values.len()
        )));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> OmResponse {
        serde_json::from_value(value).expect("fixture should decode")
    }

    #[test]
    fn current_copies_first_sunrise_and_describes_code() {
        let response = parse(json!({
            "current_weather": {
                "temperature": 12.3, "windspeed": 10.7, "winddirection": 223.0,
                "weathercode": 3, "is_day": 1, "time": "2022-09-25T14:00"
            },
            "daily": {
                "time": ["2022-09-25", "2022-09-26"],
                "sunrise": ["2022-09-25T07:03", "2022-09-26T07:05"],
                "sunset": ["2022-09-25T19:01", "2022-09-26T18:58"]
            }
        }));

        let current = normalize_current(response).unwrap();
        assert_eq!(current.weather_description, "Overcast");
        assert_eq!(current.feels_like, current.temperature);
        assert_eq!(current.humidity, 0.0);
        assert_eq!(current.pressure, 0.0);
        assert_eq!(current.wind_direction, 223.0);
        assert_eq!(current.sunrise, "2022-09-25T07:03");
        assert_eq!(current.sunset, "2022-09-25T19:01");
    }

    #[test]
    fn current_with_unmapped_code_is_unknown() {
        let response = parse(json!({
            "current_weather": {
                "temperature": 1.0, "windspeed": 0.0, "winddirection": 0.0, "weathercode": 42
            },
            "daily": { "sunrise": ["a"], "sunset": ["b"] }
        }));

        let current = normalize_current(response).unwrap();
        assert_eq!(current.weather_code, 42);
        assert_eq!(current.weather_description, "Unknown");
    }

    #[test]
    fn current_requires_sun_times() {
        let base = json!({
            "temperature": 1.0, "windspeed": 0.0, "winddirection": 0.0, "weathercode": 0
        });

        let missing = parse(json!({ "current_weather": base, "daily": { "sunrise": ["a"] } }));
        assert!(matches!(
            normalize_current(missing),
            Err(RetrievalError::MalformedResponse(_))
        ));

        let empty = parse(json!({
            "current_weather": base, "daily": { "sunrise": [], "sunset": [] }
        }));
        let err = normalize_current(empty).unwrap_err();
        assert!(err.to_string().contains("daily.sunrise array is empty"));
    }

    #[test]
    fn daily_truncates_in_order() {
        let daily = parse(json!({
            "daily": {
                "time": ["2024-01-15", "2024-01-16", "2024-01-17"],
                "temperature_2m_max": [8.0, 6.0, 10.0],
                "temperature_2m_min": [2.0, 1.0, 3.0],
                "precipitation_probability_max": [10, null, 5],
                "weathercode": [3, 61, 2]
            }
        }))
        .daily;

        let days = normalize_daily(daily, 2).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-15");
        assert_eq!(days[0].precipitation_probability, Some(10.0));
        assert_eq!(days[1].date, "2024-01-16");
        assert_eq!(days[1].precipitation_probability, None);
        assert_eq!(days[1].weather_code, 61);
    }

    #[test]
    fn daily_with_zero_days_is_empty() {
        let daily = parse(json!({
            "daily": {
                "time": ["2024-01-15"],
                "temperature_2m_max": [8.0],
                "temperature_2m_min": [2.0],
                "precipitation_probability_max": [10],
                "weathercode": [3]
            }
        }))
        .daily;

        assert!(normalize_daily(daily, 0).unwrap().is_empty());
    }

    #[test]
    fn daily_rejects_short_parallel_array() {
        let daily = parse(json!({
            "daily": {
                "time": ["2024-01-15", "2024-01-16"],
                "temperature_2m_max": [8.0],
                "temperature_2m_min": [2.0, 1.0],
                "precipitation_probability_max": [10, 20],
                "weathercode": [3, 61]
            }
        }))
        .daily;

        let err = normalize_daily(daily, 1).unwrap_err();
        assert!(matches!(err, RetrievalError::MalformedResponse(_)));
        assert!(err.to_string().contains("daily.temperature_2m_max has 1 entries"));
    }

    #[test]
    fn hourly_requires_time() {
        let hourly = parse(json!({ "hourly": { "temperature_2m": [1.0] } })).hourly;
        assert!(matches!(
            normalize_hourly(hourly, 1),
            Err(RetrievalError::MalformedResponse(_))
        ));
        assert!(matches!(
            normalize_hourly(None, 1),
            Err(RetrievalError::MalformedResponse(_))
        ));
    }

    #[test]
    fn hourly_rejects_short_parallel_array() {
        let hourly = parse(json!({
            "hourly": {
                "time": ["2024-01-15T00:00", "2024-01-15T01:00", "2024-01-15T02:00"],
                "temperature_2m": [1.0, 1.5, 2.0],
                "precipitation_probability": [0, null, 10],
                "wind_speed_10m": [12.0, 11.0]
            }
        }))
        .hourly;

        let err = normalize_hourly(hourly, 1).unwrap_err();
        assert!(matches!(err, RetrievalError::MalformedResponse(_)));
        assert!(err.to_string().contains("hourly.wind_speed_10m has 2 entries but time has 3"));
    }

    #[test]
    fn request_url_carries_query() {
        let client = OpenMeteoClient::with_base_url("http://localhost/v1/forecast");
        let coordinates = Coordinates::new(53.5488, 9.9872).unwrap();
        let request = client
            .request(coordinates, &[("current_weather", "true"), ("daily", "sunrise,sunset")])
            .unwrap()
            .build()
            .unwrap();

        let query = request.url().query().unwrap_or_default().to_string();
        assert!(query.starts_with("latitude=53.5488&longitude=9.9872"));
        assert!(query.contains("current_weather=true"));
        assert!(query.contains("daily=sunrise%2Csunset"));
        assert!(query.ends_with("timezone=auto"));
    }

    #[test]
    fn bad_base_url_is_reported() {
        let client = OpenMeteoClient::with_base_url("not a url");
        let coordinates = Coordinates::new(0.0, 0.0).unwrap();
        assert!(matches!(
            client.request(coordinates, &[]),
            Err(RetrievalError::NetworkFailure(_))
        ));
    }
}
