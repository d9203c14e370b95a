//! The entry point the dashboard talks to.
//!
//! [`WeatherFacade`] asks the configured provider first and falls back to
//! synthetic weather whenever the provider fails, so callers only ever see
//! validation errors.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};

use crate::error::ServiceError;
use crate::model::{Coordinates, DataSource, ForecastSeries, Observation, WeatherReport};
use crate::provider::WeatherProvider;
use crate::synth::{ForecastSynthesizer, random_reading};

/// Name given to synthetic reports for a coordinate lookup.
pub const COORDINATES_FALLBACK_NAME: &str = "Your Location";

#[derive(Debug)]
pub struct WeatherFacade {
    provider: Option<Box<dyn WeatherProvider>>,
    rng: Mutex<StdRng>,
    now: Option<DateTime<Utc>>,
}

impl WeatherFacade {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider: Some(provider), rng: Mutex::new(StdRng::from_entropy()), now: None }
    }

    /// A facade with no provider: every report is synthetic.
    pub fn offline() -> Self {
        Self { provider: None, rng: Mutex::new(StdRng::from_entropy()), now: None }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Pins the clock that anchors synthetic series.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn clock(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn synthesizer(&self) -> ForecastSynthesizer {
        ForecastSynthesizer::new(self.clock())
    }

    fn draw<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    pub async fn report_for_city(&self, query: &str) -> Result<WeatherReport, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::Validation("City name is required".to_string()));
        }

        Ok(self.report(query, query, None).await)
    }

    pub async fn report_for_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherReport, ServiceError> {
        let coordinates = Coordinates::new(lat, lon)?;
        let query = coordinates.to_string();

        Ok(self.report(&query, COORDINATES_FALLBACK_NAME, Some(coordinates)).await)
    }

    /// Just the five-day series for `query`.
    pub async fn forecast(&self, query: &str) -> Result<ForecastSeries, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::Validation("City name is required".to_string()));
        }

        let synth = self.synthesizer();
        let Some(provider) = &self.provider else {
            return Ok(synth.seeded(query));
        };

        match provider.forecast(query).await {
            Ok(Some(series)) => return Ok(series),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%query, error = %ServiceError::UpstreamProvider(err), "forecast unavailable, synthesizing");
            }
        }

        let reading = match provider.current(query).await {
            Ok(observation) => observation.current,
            Err(err) => {
                tracing::warn!(%query, error = %ServiceError::UpstreamProvider(err), "no current reading, using a random one");
                self.draw(|rng| random_reading(rng, self.clock()))
            }
        };

        Ok(self.draw(|rng| synth.from_reading(&reading, rng)))
    }

    /// A report built only from the synthesizer.
    pub fn synthetic_report(&self, name: &str, coordinates: Option<Coordinates>) -> WeatherReport {
        let synth = self.synthesizer();
        let Observation { location, current } =
            self.draw(|rng| synth.synthesize_current(name, coordinates, rng));

        WeatherReport {
            location,
            current,
            forecast: synth.seeded(name),
            source: DataSource::Synthetic,
        }
    }

    async fn report(
        &self,
        query: &str,
        fallback_name: &str,
        coordinates: Option<Coordinates>,
    ) -> WeatherReport {
        let Some(provider) = &self.provider else {
            tracing::debug!(%query, "offline, synthesizing report");
            return self.synthetic_report(fallback_name, coordinates);
        };

        match self.live_report(provider.as_ref(), query).await {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(%query, error = %err, "provider failed, falling back to synthetic weather");
                self.synthetic_report(fallback_name, coordinates)
            }
        }
    }

    async fn live_report(
        &self,
        provider: &dyn WeatherProvider,
        query: &str,
    ) -> Result<WeatherReport, ServiceError> {
        let Observation { location, current } =
            provider.current(query).await.map_err(ServiceError::UpstreamProvider)?;

        let forecast = match provider.forecast(query).await {
            Ok(Some(series)) => series,
            Ok(None) => self.draw(|rng| self.synthesizer().from_reading(&current, rng)),
            Err(err) => {
                tracing::warn!(%query, error = %ServiceError::UpstreamProvider(err), "forecast unavailable, synthesizing from reading");
                self.draw(|rng| self.synthesizer().from_reading(&current, rng))
            }
        };

        Ok(WeatherReport { location, current, forecast, source: DataSource::Live })
    }
}
