//! Synthetic weather.
//!
//! When the provider is unreachable, or has no forecast to offer, the
//! dashboard still needs a full five-day series. Two generators produce one:
//!
//! - [`ForecastSynthesizer::seeded`] derives everything from the place name,
//!   so the same place always gets the same weather;
//! - [`ForecastSynthesizer::from_reading`] builds on a real current reading and
//!   draws the variation from an injected random generator.
//!
//! Both emit [`SERIES_LEN`] points on a three-hour grid that starts at
//! midnight UTC of the synthesizer's anchor day.

mod cities;
mod live;
mod seeded;

pub use cities::{CITIES, CityClimate, DEFAULT_CLIMATE, climate_for};
pub use live::{LIVE_CONDITIONS, random_reading};
pub use seeded::{DESCRIPTIONS, name_seed};

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

use crate::model::{
    CurrentConditions, ForecastSeries, Observation, SAMPLES_PER_DAY, SERIES_LEN,
};

const DAYS: usize = SERIES_LEN / SAMPLES_PER_DAY;
const HOUR_STEP: u32 = 3;

/// What a synthetic series is built from.
#[derive(Debug, Clone, Copy)]
pub enum SynthesisInput<'a> {
    /// A place name; fully deterministic.
    Place(&'a str),
    /// A real reading for which no forecast is available.
    Reading(&'a CurrentConditions),
}

/// Part of the day a sample falls into. Drives the diurnal temperature swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HourBucket {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
}

impl HourBucket {
    fn of(hour: u32) -> Self {
        match hour {
            0..6 => HourBucket::EarlyMorning,
            6..12 => HourBucket::Morning,
            12..18 => HourBucket::Afternoon,
            _ => HourBucket::Evening,
        }
    }

    /// Lowest offset (°C) and width of the bucket's range.
    fn offset_range(self) -> (f64, u64) {
        match self {
            HourBucket::EarlyMorning => (-5.0, 3),
            HourBucket::Morning => (-2.0, 5),
            HourBucket::Afternoon => (0.0, 8),
            HourBucket::Evening => (-3.0, 4),
        }
    }
}

/// Mornings and late evenings are wetter.
fn max_precip_chance(hour: u32) -> f64 {
    if hour < 6 || hour > 18 { 0.7 } else { 0.3 }
}

#[derive(Debug, Clone, Copy)]
pub struct ForecastSynthesizer {
    now: DateTime<Utc>,
}

impl ForecastSynthesizer {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn anchor(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn synthesize_forecast<R: Rng + ?Sized>(
        &self,
        input: SynthesisInput<'_>,
        rng: &mut R,
    ) -> ForecastSeries {
        match input {
            SynthesisInput::Place(name) => self.seeded(name),
            SynthesisInput::Reading(reading) => self.from_reading(reading, rng),
        }
    }

    /// Epoch seconds of sample `hour` on `day` days after the anchor.
    fn sample_time(&self, day: usize, hour: u32) -> i64 {
        let midnight = self.anchor().and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        midnight + day as i64 * 86_400 + i64::from(hour) * 3_600
    }

    /// The (day, hour) grid of a series, in order.
    fn grid() -> impl Iterator<Item = (usize, u32)> {
        (0..DAYS).flat_map(|day| (0..24).step_by(HOUR_STEP as usize).map(move |hour| (day, hour)))
    }

    /// A full synthetic reading for a place, for when the provider is down.
    ///
    /// Temperature and description come from the place name; the remaining
    /// fields are drawn from `rng`.
    pub fn synthesize_current<R: Rng + ?Sized>(
        &self,
        name: &str,
        coordinates: Option<crate::model::Coordinates>,
        rng: &mut R,
    ) -> Observation {
        seeded::current(name, coordinates, self.now, rng)
    }
}
