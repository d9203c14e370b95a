use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Coordinates, CurrentConditions, Location, Observation};

use super::{WeatherProvider, http_client, truncate_body};

const DEFAULT_BASE_URL: &str = "http://api.weatherstack.com";

/// WeatherStack only offers current conditions on its free plan, so the
/// forecast is always left to the synthesizer.
#[derive(Debug, Clone)]
pub struct WeatherStackProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherStackProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self { api_key, base_url: base_url.into(), http: http_client()? })
    }

    async fn fetch_current(&self, query: &str) -> Result<Observation> {
        let url = format!("{}/current", self.base_url.trim_end_matches('/'));
        tracing::debug!(%query, "requesting WeatherStack current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[("access_key", self.api_key.as_str()), ("query", query), ("units", "m")])
            .send()
            .await
            .context("Failed to send request to WeatherStack (current)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read WeatherStack current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "WeatherStack current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: WsEnvelope =
            serde_json::from_str(&body).context("Failed to parse WeatherStack current JSON")?;

        match parsed {
            WsEnvelope::Failure { error } => Err(anyhow!(
                "WeatherStack rejected the request ({} {}): {}",
                error.code,
                error.kind,
                error.info
            )),
            WsEnvelope::Success(response) => Ok(response.into_observation()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WsEnvelope {
    Failure { error: WsError },
    Success(WsResponse),
}

#[derive(Debug, Deserialize)]
struct WsError {
    code: i32,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct WsLocation {
    name: String,
    country: Option<String>,
    region: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    timezone_id: Option<String>,
    localtime_epoch: Option<i64>,
    /// Hours, e.g. `"-4.0"`.
    utc_offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WsCurrent {
    temperature: f64,
    #[serde(default)]
    feelslike: Option<f64>,
    #[serde(default)]
    weather_descriptions: Vec<String>,
    #[serde(default)]
    wind_speed: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    precip: f64,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    cloudcover: u8,
    #[serde(default)]
    uv_index: u8,
    #[serde(default)]
    visibility: f64,
}

#[derive(Debug, Deserialize)]
struct WsResponse {
    location: WsLocation,
    current: WsCurrent,
}

impl WsResponse {
    fn into_observation(self) -> Observation {
        let WsResponse { location, current } = self;

        let coordinates = match (&location.lat, &location.lon) {
            (Some(lat), Some(lon)) => lat
                .parse()
                .ok()
                .zip(lon.parse().ok())
                .map(|(lat, lon)| Coordinates { lat, lon }),
            _ => None,
        };

        let observation_time = location
            .localtime_epoch
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);

        let utc_offset_secs = location
            .utc_offset
            .as_deref()
            .and_then(|hours| hours.trim().parse::<f64>().ok())
            .map(|hours| (hours * 3600.0).round() as i32);

        let description = current
            .weather_descriptions
            .into_iter()
            .next()
            .unwrap_or_else(|| "Unknown".to_string());

        Observation {
            location: Location {
                name: location.name,
                coordinates,
                country: location.country,
                region: location.region,
                timezone: location.timezone_id,
            },
            current: CurrentConditions {
                temperature_c: current.temperature,
                feels_like_c: current.feelslike.unwrap_or(current.temperature),
                description,
                humidity_pct: current.humidity,
                wind_speed_kph: current.wind_speed,
                precip_mm: current.precip,
                pressure_hpa: current.pressure,
                uv_index: current.uv_index,
                air_quality_index: None,
                cloud_cover_pct: current.cloudcover,
                visibility_km: current.visibility,
                observation_time,
                utc_offset_secs,
            },
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherStackProvider {
    async fn current(&self, query: &str) -> Result<Observation> {
        self.fetch_current(query).await
    }
}
