use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::condition::ConditionGroup;
use crate::model::{
    Coordinates, CurrentConditions, ForecastCondition, ForecastPoint, ForecastSeries, Location,
    Observation, SERIES_LEN,
};

use super::{WeatherProvider, http_client, truncate_body};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// m/s to km/h.
const MPS_TO_KPH: f64 = 3.6;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

/// `"lat,lon"` queries go out as coordinates, anything else as a place name.
fn location_params(query: &str) -> Vec<(&'static str, String)> {
    let coords = query
        .split_once(',')
        .and_then(|(lat, lon)| Some((lat.trim().parse::<f64>().ok()?, lon.trim().parse::<f64>().ok()?)));

    match coords {
        Some((lat, lon)) => vec![("lat", lat.to_string()), ("lon", lon.to_string())],
        None => vec![("q", query.to_string())],
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self { api_key, base_url: base_url.into(), http: http_client()? })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: &str, what: &str) -> Result<T> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url.trim_end_matches('/'));
        tracing::debug!(%query, endpoint, "requesting OpenWeather data");

        let mut params = location_params(query);
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }

    async fn fetch_current(&self, query: &str) -> Result<Observation> {
        let parsed: OwCurrentResponse = self.get_json("weather", query, "current").await?;

        let observation_time = DateTime::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now);

        let description = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Observation {
            location: Location {
                name: parsed.name,
                coordinates: parsed.coord.map(|c| Coordinates { lat: c.lat, lon: c.lon }),
                country: parsed.sys.and_then(|s| s.country),
                region: None,
                timezone: None,
            },
            current: CurrentConditions {
                temperature_c: parsed.main.temp,
                feels_like_c: parsed.main.feels_like.unwrap_or(parsed.main.temp),
                description,
                humidity_pct: parsed.main.humidity,
                wind_speed_kph: parsed.wind.speed * MPS_TO_KPH,
                precip_mm: parsed.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
                pressure_hpa: parsed.main.pressure,
                uv_index: 0,
                air_quality_index: None,
                cloud_cover_pct: parsed.clouds.map_or(0, |c| c.all),
                visibility_km: parsed.visibility.map_or(10.0, |m| m / 1000.0),
                observation_time,
                utc_offset_secs: parsed.timezone,
            },
        })
    }

    async fn fetch_forecast(&self, query: &str) -> Result<ForecastSeries> {
        let parsed: OwForecastResponse = self.get_json("forecast", query, "5-day forecast").await?;

        let points = parsed
            .list
            .into_iter()
            .take(SERIES_LEN)
            .map(|entry| {
                let weather = entry.weather.into_iter().next();
                let (group, description, icon) = match weather {
                    Some(w) => (ConditionGroup::from_description(&w.main), w.description, w.icon),
                    None => (ConditionGroup::Clear, "Unknown".to_string(), "01d".to_string()),
                };

                ForecastPoint {
                    dt: entry.dt,
                    temperature_c: entry.main.temp,
                    humidity_pct: f64::from(entry.main.humidity),
                    pressure_hpa: entry.main.pressure,
                    condition: ForecastCondition { group, description, icon },
                    wind_speed_kph: entry.wind.speed * MPS_TO_KPH,
                    pop: entry.pop.unwrap_or(0.0).clamp(0.0, 1.0),
                }
            })
            .collect();

        ForecastSeries::new(points).context("OpenWeather forecast is not a 5-day, 3-hourly series")
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: u8,
    #[serde(default = "standard_pressure")]
    pressure: f64,
}

fn standard_pressure() -> f64 {
    1013.0
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: Option<OwCoord>,
    sys: Option<OwSys>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: Option<OwClouds>,
    rain: Option<OwRain>,
    visibility: Option<f64>,
    /// Shift from UTC in seconds.
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &str) -> Result<Observation> {
        self.fetch_current(query).await
    }

    async fn forecast(&self, query: &str) -> Result<Option<ForecastSeries>> {
        self.fetch_forecast(query).await.map(Some)
    }
}
