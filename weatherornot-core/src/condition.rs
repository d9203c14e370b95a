//! Mapping free-text weather descriptions to icon categories.
//!
//! Providers describe conditions in prose ("light intensity drizzle",
//! "Partly cloudy"). The dashboard needs a closed set of icons, so the
//! description is matched case-insensitively against an ordered rule table.
//! The first rule that matches decides the category.

use serde::{Deserialize, Serialize};

use crate::units::Temperature;

/// Readings above this are too warm for a reported snowfall to be believed.
const WARM_SNOW_THRESHOLD_F: i32 = 45;

/// Canonical icon category of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconCategory {
    ClearDay,
    ClearNight,
    CloudyDay,
    CloudyNight,
    Overcast,
    RainLightDay,
    RainLightNight,
    RainHeavy,
    Thunderstorm,
    Snow,
    Fog,
}

impl IconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::ClearDay => "clear-day",
            IconCategory::ClearNight => "clear-night",
            IconCategory::CloudyDay => "cloudy-day",
            IconCategory::CloudyNight => "cloudy-night",
            IconCategory::Overcast => "overcast",
            IconCategory::RainLightDay => "rain-light-day",
            IconCategory::RainLightNight => "rain-light-night",
            IconCategory::RainHeavy => "rain-heavy",
            IconCategory::Thunderstorm => "thunderstorm",
            IconCategory::Snow => "snow",
            IconCategory::Fog => "fog",
        }
    }

    /// CSS class of the matching glyph in the weather-icons font.
    pub fn icon(&self) -> &'static str {
        match self {
            IconCategory::ClearDay => "wi wi-day-sunny",
            IconCategory::ClearNight => "wi wi-night-clear",
            IconCategory::CloudyDay => "wi wi-day-cloudy",
            IconCategory::CloudyNight => "wi wi-night-alt-cloudy",
            IconCategory::Overcast => "wi wi-cloudy",
            IconCategory::RainLightDay => "wi wi-day-showers",
            IconCategory::RainLightNight => "wi wi-night-alt-showers",
            IconCategory::RainHeavy => "wi wi-rain",
            IconCategory::Thunderstorm => "wi wi-thunderstorm",
            IconCategory::Snow => "wi wi-snow",
            IconCategory::Fog => "wi wi-fog",
        }
    }

    /// A single-character glyph for terminals without the icon font.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconCategory::ClearDay => "☀",
            IconCategory::ClearNight => "☾",
            IconCategory::CloudyDay | IconCategory::CloudyNight => "⛅",
            IconCategory::Overcast => "☁",
            IconCategory::RainLightDay | IconCategory::RainLightNight => "🌦",
            IconCategory::RainHeavy => "🌧",
            IconCategory::Thunderstorm => "⛈",
            IconCategory::Snow => "❄",
            IconCategory::Fog => "🌫",
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: IconCategory,
    pub icon: &'static str,
}

impl From<IconCategory> for Classification {
    fn from(category: IconCategory) -> Self {
        Self { category, icon: category.icon() }
    }
}

/// `true` for hours in `[6, 18)`.
pub fn is_day(hour: u32) -> bool {
    (6..18).contains(&hour)
}

struct Reading<'a> {
    desc: &'a str,
    fahrenheit: i32,
}

impl Reading<'_> {
    fn has(&self, needle: &str) -> bool {
        self.desc.contains(needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.desc.contains(n))
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    DayNight(IconCategory, IconCategory),
    Always(IconCategory),
}

impl Outcome {
    fn resolve(self, day: bool) -> IconCategory {
        match self {
            Outcome::DayNight(d, n) => {
                if day {
                    d
                } else {
                    n
                }
            }
            Outcome::Always(c) => c,
        }
    }
}

struct Rule {
    matches: fn(&Reading<'_>) -> bool,
    outcome: Outcome,
}

const CLEAR: Outcome = Outcome::DayNight(IconCategory::ClearDay, IconCategory::ClearNight);
const CLOUDY: Outcome = Outcome::DayNight(IconCategory::CloudyDay, IconCategory::CloudyNight);

const RULES: &[Rule] = &[
    // snow at a warm reading is stale data; show clouds instead
    Rule {
        matches: |r| r.has("snow") && r.fahrenheit > WARM_SNOW_THRESHOLD_F,
        outcome: CLOUDY,
    },
    Rule { matches: |r| r.has_any(&["clear", "sunny"]), outcome: CLEAR },
    Rule {
        matches: |r| r.has("cloud") && r.has_any(&["scattered", "broken", "few"]),
        outcome: CLOUDY,
    },
    Rule { matches: |r| r.has("cloud"), outcome: Outcome::Always(IconCategory::Overcast) },
    Rule {
        matches: |r| r.has_any(&["rain", "drizzle"]) && r.has("light"),
        outcome: Outcome::DayNight(IconCategory::RainLightDay, IconCategory::RainLightNight),
    },
    Rule {
        matches: |r| r.has_any(&["rain", "drizzle"]),
        outcome: Outcome::Always(IconCategory::RainHeavy),
    },
    Rule { matches: |r| r.has("thunderstorm"), outcome: Outcome::Always(IconCategory::Thunderstorm) },
    Rule { matches: |r| r.has("snow"), outcome: Outcome::Always(IconCategory::Snow) },
    Rule { matches: |r| r.has_any(&["mist", "fog"]), outcome: Outcome::Always(IconCategory::Fog) },
];

/// Classifies a description observed at `hour` (0-23) at `temperature`.
///
/// Never fails: a description that matches no rule is treated as clear sky.
pub fn classify_condition(description: &str, hour: u32, temperature: Temperature) -> Classification {
    let desc = description.to_lowercase();
    let reading = Reading { desc: &desc, fahrenheit: temperature.fahrenheit() };

    let outcome = RULES
        .iter()
        .find(|rule| (rule.matches)(&reading))
        .map_or(CLEAR, |rule| rule.outcome);

    outcome.resolve(is_day(hour)).into()
}

/// Provider-style icon code (`01d`, `10n`, ...) as carried by forecast points.
///
/// Finer than [`IconCategory`] for clouds (`02` few, `03` scattered/broken,
/// `04` overcast) and without the warm-snow correction.
pub fn icon_code(description: &str, hour: u32) -> String {
    let desc = description.to_lowercase();
    let suffix = if is_day(hour) { 'd' } else { 'n' };
    let has_any = |needles: &[&str]| needles.iter().any(|n| desc.contains(n));

    let (number, day_night) = if has_any(&["clear", "sunny"]) {
        ("01", true)
    } else if desc.contains("cloud") {
        if has_any(&["scattered", "broken"]) {
            ("03", true)
        } else if desc.contains("few") {
            ("02", true)
        } else {
            ("04", true)
        }
    } else if has_any(&["rain", "drizzle"]) {
        if desc.contains("light") { ("10", true) } else { ("09", false) }
    } else if desc.contains("thunderstorm") {
        ("11", false)
    } else if desc.contains("snow") {
        ("13", false)
    } else if has_any(&["mist", "fog"]) {
        ("50", false)
    } else {
        ("01", true)
    };

    if day_night { format!("{number}{suffix}") } else { format!("{number}d") }
}

/// Main condition group of a description, as providers report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionGroup {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
}

impl ConditionGroup {
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        if desc.contains("thunderstorm") {
            ConditionGroup::Thunderstorm
        } else if desc.contains("drizzle") {
            ConditionGroup::Drizzle
        } else if desc.contains("rain") || desc.contains("shower") {
            ConditionGroup::Rain
        } else if desc.contains("snow") {
            ConditionGroup::Snow
        } else if desc.contains("mist") {
            ConditionGroup::Mist
        } else if desc.contains("fog") {
            ConditionGroup::Fog
        } else if desc.contains("cloud") || desc.contains("overcast") {
            ConditionGroup::Clouds
        } else {
            ConditionGroup::Clear
        }
    }
}
