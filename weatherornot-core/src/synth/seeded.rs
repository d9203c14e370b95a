use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{ForecastSynthesizer, HourBucket, cities::climate_for, max_precip_chance};
use crate::condition::{ConditionGroup, icon_code};
use crate::model::{
    Coordinates, CurrentConditions, ForecastCondition, ForecastPoint, ForecastSeries, Location,
    Observation,
};

/// Descriptions a seeded place can report.
pub const DESCRIPTIONS: [&str; 11] = [
    "Sunny",
    "Partly cloudy",
    "Cloudy",
    "Overcast",
    "Light rain",
    "Moderate rain",
    "Heavy rain",
    "Thunderstorm",
    "Fog",
    "Light snow",
    "Moderate snow",
];

const STANDARD_PRESSURE_HPA: f64 = 1013.0;

/// Sum of the UTF-16 code units of `name`.
pub fn name_seed(name: &str) -> u64 {
    name.encode_utf16().map(u64::from).sum()
}

fn description_at(index: u64) -> &'static str {
    DESCRIPTIONS[(index % DESCRIPTIONS.len() as u64) as usize]
}

/// Base wind of a seeded place, km/h.
fn base_wind(seed: u64) -> f64 {
    (5 + seed % 20) as f64
}

fn diurnal_offset(hour: u32, hour_seed: u64) -> f64 {
    let (low, width) = HourBucket::of(hour).offset_range();
    low + (hour_seed % width) as f64
}

impl ForecastSynthesizer {
    /// Forecast derived from nothing but the place name.
    ///
    /// Day offsets are `(seed + day) mod 36 - 18` on the Fahrenheit scale,
    /// applied as the equivalent Celsius difference. Humidity comes from a
    /// generator seeded with the name, so the series is reproducible too.
    pub fn seeded(&self, name: &str) -> ForecastSeries {
        let seed = name_seed(name);
        let base = f64::from(climate_for(name).base_temperature(seed));
        let wind = base_wind(seed);
        let mut humidity_rng = StdRng::seed_from_u64(seed);

        let list = Self::grid()
            .map(|(day, hour)| {
                let day_seed = seed + day as u64;
                let day_offset_f = (day_seed % 36) as f64 - 18.0;
                let day_temp = base + day_offset_f * 5.0 / 9.0;

                let hour_seed = day_seed * 24 + u64::from(hour);
                let chance = (hour_seed % 100) as f64 / 100.0;
                let description = description_at(hour_seed + day as u64);

                ForecastPoint {
                    dt: self.sample_time(day, hour),
                    temperature_c: day_temp + diurnal_offset(hour, hour_seed),
                    humidity_pct: f64::from(humidity_rng.gen_range(50u8..=90)),
                    pressure_hpa: STANDARD_PRESSURE_HPA,
                    condition: ForecastCondition {
                        group: ConditionGroup::from_description(description),
                        description: description.to_string(),
                        icon: icon_code(description, hour),
                    },
                    wind_speed_kph: wind * (0.5 + chance),
                    pop: chance * max_precip_chance(hour),
                }
            })
            .collect();

        ForecastSeries::synthesized(list)
    }
}

pub(super) fn current<R: Rng + ?Sized>(
    name: &str,
    coordinates: Option<Coordinates>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Observation {
    let seed = name_seed(name);
    let climate = climate_for(name);
    let temperature = f64::from(climate.base_temperature(seed));

    let location = Location {
        name: name.to_string(),
        coordinates: coordinates.or(climate.coordinates),
        country: climate.country.map(str::to_string),
        region: None,
        timezone: None,
    };

    let current = CurrentConditions {
        temperature_c: temperature,
        feels_like_c: temperature - 2.0 + f64::from(rng.gen_range(0u8..5)),
        description: description_at(seed).to_string(),
        humidity_pct: rng.gen_range(50..90),
        wind_speed_kph: f64::from(rng.gen_range(5u8..25)),
        precip_mm: rng.gen_range(0.0..2.0),
        pressure_hpa: STANDARD_PRESSURE_HPA,
        uv_index: rng.gen_range(0..11),
        air_quality_index: Some(rng.gen_range(50..200)),
        cloud_cover_pct: rng.gen_range(0..100),
        visibility_km: f64::from(rng.gen_range(5u8..15)),
        observation_time: now,
        utc_offset_secs: None,
    };

    Observation { location, current }
}
