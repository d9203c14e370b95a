use chrono::{DateTime, FixedOffset, Local, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::condition::{ConditionGroup, IconCategory, classify_condition};
use crate::error::ServiceError;
use crate::units::{Temperature, celsius_to_fahrenheit};

/// Samples per series: five days of three-hourly points.
pub const SERIES_LEN: usize = 40;
pub const SAMPLES_PER_DAY: usize = 8;
pub const SAMPLE_SPACING_SECS: i64 = 3 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Validates decimal degrees.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ServiceError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ServiceError::Validation(format!(
                "Coordinates out of range: {lat},{lon}"
            )));
        }
        Ok(Self { lat, lon })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub timezone: Option<String>,
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), coordinates: None, country: None, region: None, timezone: None }
    }

    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// A current-conditions reading. Temperatures are Celsius, wind is km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_kph: f64,
    pub precip_mm: f64,
    pub pressure_hpa: f64,
    pub uv_index: u8,
    pub air_quality_index: Option<u16>,
    pub cloud_cover_pct: u8,
    pub visibility_km: f64,
    pub observation_time: DateTime<Utc>,
    /// Offset of the place's local time from UTC, when the provider knows it.
    #[serde(default)]
    pub utc_offset_secs: Option<i32>,
}

impl CurrentConditions {
    pub fn temperature_f(&self) -> i32 {
        celsius_to_fahrenheit(self.temperature_c)
    }

    pub fn feels_like_f(&self) -> i32 {
        celsius_to_fahrenheit(self.feels_like_c)
    }

    /// Wall-clock hour of the observation: the place's own when its offset
    /// is known, the local machine's otherwise.
    pub fn local_hour(&self) -> u32 {
        match self.utc_offset_secs.and_then(FixedOffset::east_opt) {
            Some(offset) => self.observation_time.with_timezone(&offset).hour(),
            None => self.observation_time.with_timezone(&Local).hour(),
        }
    }

    /// Icon category at the local hour the reading was taken.
    pub fn icon_category(&self) -> IconCategory {
        classify_condition(
            &self.description,
            self.local_hour(),
            Temperature::Celsius(self.temperature_c),
        )
        .category
    }
}

/// What a provider knows about a place right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub location: Location,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCondition {
    pub group: ConditionGroup,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Epoch seconds.
    pub dt: i64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub condition: ForecastCondition,
    pub wind_speed_kph: f64,
    /// Probability of precipitation, 0.0 to 1.0.
    pub pop: f64,
}

impl ForecastPoint {
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.dt, 0).unwrap_or_default()
    }

    pub fn temperature_f(&self) -> i32 {
        celsius_to_fahrenheit(self.temperature_c)
    }

    pub fn icon_category(&self) -> IconCategory {
        classify_condition(
            &self.condition.description,
            self.time().hour(),
            Temperature::Celsius(self.temperature_c),
        )
        .category
    }
}

/// Exactly [`SERIES_LEN`] points, three hours apart, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    list: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(list: Vec<ForecastPoint>) -> Result<Self, ServiceError> {
        if list.len() != SERIES_LEN {
            return Err(ServiceError::Validation(format!(
                "Forecast must have {SERIES_LEN} points, got {}",
                list.len()
            )));
        }
        if let Some(pair) = list.windows(2).find(|w| w[1].dt - w[0].dt != SAMPLE_SPACING_SECS) {
            return Err(ServiceError::Validation(format!(
                "Forecast points {} and {} are not three hours apart",
                pair[0].dt, pair[1].dt
            )));
        }
        if let Some(point) = list.iter().find(|p| !(0.0..=1.0).contains(&p.pop)) {
            return Err(ServiceError::Validation(format!(
                "Precipitation probability {} out of range at {}",
                point.pop, point.dt
            )));
        }
        Ok(Self { list })
    }

    /// For generators that build the grid themselves.
    pub(crate) fn synthesized(list: Vec<ForecastPoint>) -> Self {
        debug_assert_eq!(list.len(), SERIES_LEN);
        Self { list }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.list
    }

    /// The chart window: the first day of samples.
    pub fn next_24h(&self) -> &[ForecastPoint] {
        &self.list[..SAMPLES_PER_DAY]
    }

    /// One outlook per UTC calendar day, in order.
    pub fn daily(&self) -> Vec<DailyOutlook<'_>> {
        let mut days: Vec<DailyOutlook<'_>> = Vec::new();

        for point in &self.list {
            let time = point.time();
            let date = time.date_naive();

            match days.last_mut() {
                Some(day) if day.date == date => {
                    day.high_c = day.high_c.max(point.temperature_c);
                    day.low_c = day.low_c.min(point.temperature_c);
                    if time.hour() == 12 {
                        day.representative = point;
                    }
                }
                _ => days.push(DailyOutlook {
                    date,
                    high_c: point.temperature_c,
                    low_c: point.temperature_c,
                    representative: point,
                }),
            }
        }

        days
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyOutlook<'a> {
    pub date: NaiveDate,
    pub high_c: f64,
    pub low_c: f64,
    /// The 12:00 sample, or the first sample of the day when there is none.
    pub representative: &'a ForecastPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Synthetic,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
    pub source: DataSource,
}
