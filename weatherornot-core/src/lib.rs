//! Core library for the `weatherornot` CLI.
//!
//! This crate defines:
//! - Condition classification, unit conversion and recommendations
//! - Deterministic and reading-based forecast synthesis
//! - Abstraction over weather providers, with a synthetic fallback facade
//! - Saved places, configuration & credentials handling
//!
//! The classification, synthesis and recommendation modules are pure and
//! never fail; I/O lives in `provider`, `places` and `config`.

pub mod condition;
pub mod config;
pub mod error;
pub mod facade;
pub mod model;
pub mod places;
pub mod provider;
pub mod recommend;
pub mod synth;
pub mod units;

pub use condition::{Classification, ConditionGroup, IconCategory, classify_condition};
pub use config::{Config, ProviderConfig};
pub use error::ServiceError;
pub use facade::WeatherFacade;
pub use model::{
    Coordinates, CurrentConditions, DailyOutlook, DataSource, ForecastCondition, ForecastPoint,
    ForecastSeries, Location, Observation, WeatherReport,
};
pub use places::{NewPlace, PlaceId, SavedPlace, SavedPlaces, Session};
pub use provider::{ProviderId, WeatherProvider};
pub use recommend::{RecommendationItem, Recommendations, recommend};
pub use synth::{ForecastSynthesizer, SynthesisInput};
pub use units::{Temperature, celsius_to_fahrenheit, fahrenheit_to_celsius, kph_to_mph};
