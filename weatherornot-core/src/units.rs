//! Temperature units.
//!
//! Everything inside the crate is stored in Celsius. Fahrenheit only shows up
//! at the presentation edge and in the recommendation thresholds, which are
//! compared against [`celsius_to_fahrenheit`] of the stored value. Wind is
//! stored in km/h and likewise converted with [`kph_to_mph`] for those
//! thresholds.

use serde::{Deserialize, Serialize};

/// Converts Celsius to whole Fahrenheit degrees, rounding half away from zero.
pub fn celsius_to_fahrenheit(celsius: f64) -> i32 {
    (celsius * 9.0 / 5.0 + 32.0).round() as i32
}

/// Converts Fahrenheit to Celsius, unrounded.
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

const KM_PER_MILE: f64 = 1.609_344;

/// Wind speed for the mph recommendation bands.
pub fn kph_to_mph(kph: f64) -> f64 {
    kph / KM_PER_MILE
}

/// A temperature that carries its unit, for callers that cannot promise Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Temperature {
    Celsius(f64),
    Fahrenheit(f64),
}

impl Temperature {
    pub fn celsius(self) -> f64 {
        match self {
            Temperature::Celsius(c) => c,
            Temperature::Fahrenheit(f) => fahrenheit_to_celsius(f),
        }
    }

    /// Whole Fahrenheit degrees, as displayed.
    pub fn fahrenheit(self) -> i32 {
        match self {
            Temperature::Celsius(c) => celsius_to_fahrenheit(c),
            Temperature::Fahrenheit(f) => f.round() as i32,
        }
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°F", self.fahrenheit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_known_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32);
        assert_eq!(celsius_to_fahrenheit(100.0), 212);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40);
        assert_eq!(celsius_to_fahrenheit(24.0), 75);
        assert_eq!(celsius_to_fahrenheit(7.0), 45);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 7.5 °C = 45.5 °F, -17.5 °C = 0.5 °F, -18.5 °C = -1.3 °F
        assert_eq!(celsius_to_fahrenheit(7.5), 46);
        assert_eq!(celsius_to_fahrenheit(-17.5), 1);
        assert_eq!(celsius_to_fahrenheit(-18.5), -1);
    }

    #[test]
    fn round_trip_stays_within_one_degree() {
        let mut c = -60.0;
        while c <= 60.0 {
            let back = fahrenheit_to_celsius(f64::from(celsius_to_fahrenheit(c)));
            assert!((back - c).abs() <= 1.0, "{c} came back as {back}");
            c += 0.37;
        }
    }

    #[test]
    fn converts_wind_to_mph() {
        assert_eq!(kph_to_mph(0.0), 0.0);
        assert!((kph_to_mph(1.609_344) - 1.0).abs() < 1e-12);
        assert!(kph_to_mph(16.0) < 10.0);
        assert!(kph_to_mph(17.0) > 10.0);
    }

    #[test]
    fn temperature_reports_both_scales() {
        assert_eq!(Temperature::Celsius(20.0).fahrenheit(), 68);
        assert_eq!(Temperature::Fahrenheit(50.0).celsius(), 10.0);
        assert_eq!(Temperature::Fahrenheit(44.6).fahrenheit(), 45);
        assert_eq!(Temperature::Celsius(-5.0).to_string(), "23°F");
    }
}
