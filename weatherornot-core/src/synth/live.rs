use chrono::{DateTime, Utc};
use rand::Rng;

use super::{DAYS, HOUR_STEP, ForecastSynthesizer, HourBucket, max_precip_chance, seeded::DESCRIPTIONS};
use crate::condition::{ConditionGroup, icon_code};
use crate::model::{
    CurrentConditions, ForecastCondition, ForecastPoint, ForecastSeries, SERIES_LEN,
};

/// Conditions a reading-based forecast picks from.
pub const LIVE_CONDITIONS: [(ConditionGroup, &str); 10] = [
    (ConditionGroup::Clear, "clear sky"),
    (ConditionGroup::Clouds, "few clouds"),
    (ConditionGroup::Clouds, "scattered clouds"),
    (ConditionGroup::Clouds, "overcast clouds"),
    (ConditionGroup::Rain, "light rain"),
    (ConditionGroup::Rain, "moderate rain"),
    (ConditionGroup::Drizzle, "light drizzle"),
    (ConditionGroup::Thunderstorm, "thunderstorm"),
    (ConditionGroup::Snow, "light snow"),
    (ConditionGroup::Mist, "mist"),
];

const CONDITION_CHANGE_CHANCE: f64 = 0.3;

/// Index of a condition other than `current`, uniformly.
fn other_condition<R: Rng + ?Sized>(current: usize, rng: &mut R) -> usize {
    let pick = rng.gen_range(0..LIVE_CONDITIONS.len() - 1);
    if pick >= current { pick + 1 } else { pick }
}

impl ForecastSynthesizer {
    /// Forecast around a real reading, with random day-to-day and hourly
    /// variation drawn from `rng`.
    pub fn from_reading<R: Rng + ?Sized>(
        &self,
        reading: &CurrentConditions,
        rng: &mut R,
    ) -> ForecastSeries {
        let base_humidity = f64::from(reading.humidity_pct);
        let mut list = Vec::with_capacity(SERIES_LEN);

        for day in 0..DAYS {
            let day_temp = reading.temperature_c + rng.gen_range(-10.0..=10.0);
            let predominant = rng.gen_range(0..LIVE_CONDITIONS.len());

            for hour in (0..24).step_by(HOUR_STEP as usize) {
                let (low, width) = HourBucket::of(hour).offset_range();
                let variation = low + rng.gen_range(0.0..width as f64);
                let humidity = (base_humidity + rng.gen_range(-10.0..10.0)).clamp(0.0, 100.0);
                let pop = rng.gen_range(0.0..max_precip_chance(hour));

                let index = if rng.gen_bool(CONDITION_CHANGE_CHANCE) {
                    other_condition(predominant, rng)
                } else {
                    predominant
                };
                let (group, description) = LIVE_CONDITIONS[index];

                list.push(ForecastPoint {
                    dt: self.sample_time(day, hour),
                    temperature_c: day_temp + variation,
                    humidity_pct: humidity,
                    pressure_hpa: reading.pressure_hpa,
                    condition: ForecastCondition {
                        group,
                        description: description.to_string(),
                        icon: icon_code(description, hour),
                    },
                    wind_speed_kph: reading.wind_speed_kph * (0.5 + rng.gen_range(0.0..1.0)),
                    pop,
                });
            }
        }

        ForecastSeries::synthesized(list)
    }
}

/// A stand-in reading for when not even current conditions are available.
pub fn random_reading<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> CurrentConditions {
    let temperature = f64::from(rng.gen_range(10u8..30));
    let description = DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())];

    CurrentConditions {
        temperature_c: temperature,
        feels_like_c: temperature,
        description: description.to_string(),
        humidity_pct: rng.gen_range(50..90),
        wind_speed_kph: f64::from(rng.gen_range(5u8..25)),
        precip_mm: 0.0,
        pressure_hpa: 1013.0,
        uv_index: 0,
        air_quality_index: None,
        cloud_cover_pct: 0,
        visibility_km: 10.0,
        observation_time: now,
        utc_offset_secs: None,
    }
}
