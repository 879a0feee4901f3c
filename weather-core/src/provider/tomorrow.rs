use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::RetrievalError,
    model::{Coordinates, TimelineInterval},
    provider::get_json,
};

use super::TimelineProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.tomorrow.io/v4/timelines";

/// Fields requested for every interval, in the order the API receives them.
pub const TIMELINE_FIELDS: [&str; 7] = [
    "windDirection",
    "humidity",
    "temperature",
    "windSpeed",
    "uvIndex",
    "rainIntensity",
    "temperatureApparent",
];

const LOOKAHEAD_HOURS: i64 = 2;

/// Tomorrow.io timelines client.
#[derive(Clone)]
pub struct TomorrowClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for TomorrowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TomorrowClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TomorrowClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Like [`TimelineProvider::fetch_timeline`], with the window ending two
    /// hours after `now`.
    #[instrument(skip(self, coordinates), fields(location = %coordinates))]
    pub async fn fetch_timeline_at(
        &self,
        coordinates: Coordinates,
        now: DateTime<Utc>,
    ) -> Result<TimelineInterval, RetrievalError> {
        let request = self.request(coordinates, now)?;
        let response: TmResponse = get_json(request, "Tomorrow.io timeline").await?;
        first_interval(response)
    }

    fn request(
        &self,
        coordinates: Coordinates,
        now: DateTime<Utc>,
    ) -> Result<RequestBuilder, RetrievalError> {
        let location = coordinates.to_string();
        let end_time = end_time(now);

        let mut query = vec![
            ("location", location.as_str()),
            ("timesteps", "1h"),
            ("units", "metric"),
            ("apikey", self.api_key.as_str()),
            ("endTime", end_time.as_str()),
        ];
        query.extend(TIMELINE_FIELDS.iter().map(|field| ("fields", *field)));

        let url = Url::parse_with_params(&self.base_url, &query).map_err(|e| {
            RetrievalError::network(format!("Invalid Tomorrow.io base URL '{}': {e}", self.base_url))
        })?;

        debug!(url = %redact_api_key(&url), "Tomorrow.io request");

        Ok(self.http.get(url))
    }
}

#[async_trait]
impl TimelineProvider for TomorrowClient {
    async fn fetch_timeline(
        &self,
        coordinates: Coordinates,
    ) -> Result<TimelineInterval, RetrievalError> {
        self.fetch_timeline_at(coordinates, Utc::now()).await
    }
}

/// `now + 2h` as an RFC 3339 UTC timestamp with millisecond precision.
pub fn end_time(now: DateTime<Utc>) -> String {
    (now + Duration::hours(LOOKAHEAD_HOURS)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn redact_api_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "apikey" { "***".to_string() } else { value.into_owned() };
            (key.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[derive(Debug, Deserialize)]
struct TmResponse {
    data: Option<TmData>,
}

#[derive(Debug, Deserialize)]
struct TmData {
    #[serde(default)]
    timelines: Vec<TmTimeline>,
}

#[derive(Debug, Deserialize)]
struct TmTimeline {
    #[serde(default)]
    intervals: Vec<TimelineInterval>,
}

fn first_interval(response: TmResponse) -> Result<TimelineInterval, RetrievalError> {
    response
        .data
        .ok_or_else(|| RetrievalError::malformed("No data field returned by Tomorrow.io"))?
        .timelines
        .into_iter()
        .next()
        .ok_or_else(|| RetrievalError::malformed("No timelines returned by Tomorrow.io"))?
        .intervals
        .into_iter()
        .next()
        .ok_or_else(|| RetrievalError::malformed("Timeline contains no intervals"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn end_time_is_two_hours_ahead() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 23, 15, 0).unwrap();
        assert_eq!(end_time(now), "2024-03-11T01:15:00.000Z");
    }

    #[test]
    fn request_query_shape() {
        let client = TomorrowClient::with_base_url("SECRET".into(), "http://localhost/v4/timelines");
        let coordinates = Coordinates::new(53.5488, 9.9872).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        let request = client.request(coordinates, now).unwrap().build().unwrap();
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let value = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
        assert_eq!(value("location"), Some("53.5488,9.9872"));
        assert_eq!(value("timesteps"), Some("1h"));
        assert_eq!(value("units"), Some("metric"));
        assert_eq!(value("apikey"), Some("SECRET"));
        assert_eq!(value("endTime"), Some("2024-03-10T14:00:00.000Z"));

        let fields: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| k == "fields")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(fields, TIMELINE_FIELDS);
    }

    #[test]
    fn redaction_hides_only_the_key() {
        let url = Url::parse("http://localhost/v4/timelines?location=1,2&apikey=SECRET").unwrap();
        let redacted = redact_api_key(&url).to_string();
        assert!(!redacted.contains("SECRET"));
        assert!(redacted.contains("apikey=***") || redacted.contains("apikey=%2A%2A%2A"));
        assert!(redacted.contains("location=1%2C2"));
    }

    #[test]
    fn debug_output_hides_key() {
        let client = TomorrowClient::new("SECRET".into());
        assert!(!format!("{client:?}").contains("SECRET"));
    }

    #[test]
    fn first_interval_is_extracted() {
        let response: TmResponse = serde_json::from_value(json!({
            "data": { "timelines": [{
                "timestep": "1h",
                "intervals": [
                    { "startTime": "2024-03-10T12:00:00Z", "values": {
                        "windDirection": 250.0, "humidity": 81, "temperature": 7.4,
                        "windSpeed": 5.1, "uvIndex": 0, "rainIntensity": 1.2,
                        "temperatureApparent": 4.9 } },
                    { "startTime": "2024-03-10T13:00:00Z", "values": {
                        "windDirection": 255.0, "humidity": 80, "temperature": 7.9,
                        "windSpeed": 5.3, "uvIndex": 1, "rainIntensity": 0.0,
                        "temperatureApparent": 5.4 } }
                ]
            }]}
        }))
        .unwrap();

        let interval = first_interval(response).unwrap();
        assert_eq!(interval.values.temperature, 7.4);
        assert_eq!(interval.start_time, Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn missing_timeline_pieces_are_malformed() {
        for body in [
            json!({}),
            json!({ "data": {} }),
            json!({ "data": { "timelines": [] } }),
            json!({ "data": { "timelines": [{ "intervals": [] }] } }),
        ] {
            let response: TmResponse = serde_json::from_value(body.clone()).unwrap();
            assert!(
                matches!(first_interval(response), Err(RetrievalError::MalformedResponse(_))),
                "{body}"
            );
        }
    }
}
