//! Climate ranges of well-known cities, used to pick believable base
//! temperatures for synthetic weather.

use crate::model::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityClimate {
    pub name: &'static str,
    pub country: Option<&'static str>,
    pub coordinates: Option<Coordinates>,
    /// Typical yearly range of daily temperatures, °C.
    pub min_c: i32,
    pub max_c: i32,
    pub typical_c: i32,
}

impl CityClimate {
    /// `min + seed mod (max - min)`, or the typical value when the range is empty.
    pub fn base_temperature(&self, seed: u64) -> i32 {
        let span = self.max_c - self.min_c;
        if span <= 0 {
            return self.typical_c;
        }
        self.min_c + (seed % span as u64) as i32
    }
}

/// Used for every place that is not in [`CITIES`].
pub const DEFAULT_CLIMATE: CityClimate = CityClimate {
    name: "",
    country: None,
    coordinates: None,
    min_c: 10,
    max_c: 20,
    typical_c: 15,
};

const fn city(
    name: &'static str,
    country: &'static str,
    lat: f64,
    lon: f64,
    min_c: i32,
    max_c: i32,
    typical_c: i32,
) -> CityClimate {
    CityClimate {
        name,
        country: Some(country),
        coordinates: Some(Coordinates { lat, lon }),
        min_c,
        max_c,
        typical_c,
    }
}

pub const CITIES: &[CityClimate] = &[
    city("New York", "United States", 40.7128, -74.0060, -3, 29, 13),
    city("Los Angeles", "United States", 34.0522, -118.2437, 9, 29, 18),
    city("Chicago", "United States", 41.8781, -87.6298, -9, 28, 10),
    city("Miami", "United States", 25.7617, -80.1918, 16, 33, 25),
    city("Toronto", "Canada", 43.6532, -79.3832, -10, 27, 9),
    city("London", "United Kingdom", 51.5074, -0.1278, 2, 23, 11),
    city("Paris", "France", 48.8566, 2.3522, 3, 25, 12),
    city("Moscow", "Russia", 55.7558, 37.6173, -12, 24, 6),
    city("Reykjavik", "Iceland", 64.1466, -21.9426, -3, 14, 5),
    city("Cairo", "Egypt", 30.0444, 31.2357, 9, 35, 22),
    city("Dubai", "United Arab Emirates", 25.2048, 55.2708, 15, 41, 28),
    city("Singapore", "Singapore", 1.3521, 103.8198, 24, 32, 28),
    city("Tokyo", "Japan", 35.6762, 139.6503, 2, 31, 16),
    city("Sydney", "Australia", -33.8688, 151.2093, 8, 26, 18),
];

/// Looks a place up by the part of its name before the first comma,
/// ignoring case; unknown places get [`DEFAULT_CLIMATE`].
pub fn climate_for(place: &str) -> &'static CityClimate {
    let key = place.split(',').next().unwrap_or_default().trim();

    CITIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(key))
        .unwrap_or(&DEFAULT_CLIMATE)
}
