//! Weather-driven suggestions: what to do, what to do with the kids, what to
//! wear and what to do in the garden.
//!
//! Each list is a fixed table of (predicate, item) rules evaluated in order.
//! Every rule that fires contributes its item; the list is cut to
//! [`MAX_ITEMS`] and falls back to a default item when nothing fired.
//! Temperature bands are Fahrenheit and inclusive.

use serde::Serialize;

use crate::model::CurrentConditions;
use crate::units::{celsius_to_fahrenheit, kph_to_mph};

pub const MAX_ITEMS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendationItem {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub activities: Vec<RecommendationItem>,
    pub kids: Vec<RecommendationItem>,
    pub outfits: Vec<RecommendationItem>,
    pub gardening: Vec<RecommendationItem>,
}

/// The normalised view of a reading the rules look at.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub temp_f: i32,
    /// Lowercase.
    pub description: String,
    pub humidity: u8,
    /// mph, like the temperature bands are °F.
    pub wind_mph: f64,
}

impl Conditions {
    pub fn new(temp_f: i32, description: &str, humidity: u8, wind_mph: f64) -> Self {
        Self { temp_f, description: description.to_lowercase(), humidity, wind_mph }
    }

    fn between(&self, low: i32, high: i32) -> bool {
        (low..=high).contains(&self.temp_f)
    }

    fn is_clear(&self) -> bool {
        self.description.contains("clear") || self.description.contains("sunny")
    }

    fn is_cloudy(&self) -> bool {
        self.description.contains("cloud") || self.description.contains("overcast")
    }

    fn is_rainy(&self) -> bool {
        ["rain", "drizzle", "shower"].iter().any(|w| self.description.contains(w))
    }

    fn is_snowy(&self) -> bool {
        self.description.contains("snow")
    }

    fn is_stormy(&self) -> bool {
        self.description.contains("storm")
    }
}

impl From<&CurrentConditions> for Conditions {
    fn from(current: &CurrentConditions) -> Self {
        Self::new(
            celsius_to_fahrenheit(current.temperature_c),
            &current.description,
            current.humidity_pct,
            kph_to_mph(current.wind_speed_kph),
        )
    }
}

struct Rule {
    applies: fn(&Conditions) -> bool,
    item: RecommendationItem,
}

const fn item(icon: &'static str, title: &'static str, description: &'static str) -> RecommendationItem {
    RecommendationItem { icon, title, description }
}

const ACTIVITY_RULES: &[Rule] = &[
    Rule {
        applies: |c| c.temp_f >= 75,
        item: item("🏊", "Swimming", "Warm enough for a swim or a day at the beach"),
    },
    Rule {
        applies: |c| c.between(65, 80),
        item: item("🚶", "Walking tour", "Comfortable weather for exploring on foot"),
    },
    Rule {
        applies: |c| c.between(65, 80),
        item: item("🚴", "Cycling", "Good conditions for a bike ride"),
    },
    Rule {
        applies: |c| c.between(50, 70),
        item: item("🥾", "Hiking", "Cool enough to hit the trails without overheating"),
    },
    Rule {
        applies: |c| c.between(50, 70),
        item: item("🧺", "Picnic", "Pack a lunch and enjoy it in the park"),
    },
    Rule {
        applies: |c| c.is_clear(),
        item: item("📷", "Photography", "Clear skies make for great outdoor photos"),
    },
    Rule {
        applies: |c| c.is_cloudy() && !c.is_rainy(),
        item: item("🏙️", "Sightseeing", "Soft light and no glare, ideal for seeing the sights"),
    },
    Rule {
        applies: |c| c.is_rainy(),
        item: item("☕", "Café or museum", "Stay dry with a visit to a café or museum"),
    },
    Rule {
        applies: |c| c.is_snowy(),
        item: item("⛷️", "Winter sports", "Go skiing, sledding or snowshoeing"),
    },
    Rule {
        applies: |c| c.wind_mph > 10.0 && !c.is_rainy(),
        item: item("🪁", "Kite flying", "There is enough wind to get a kite up"),
    },
];

/// Added on top of the table, never truncated away.
const ACTIVITY_OVERRIDES: &[Rule] = &[Rule {
    applies: |c| c.temp_f < 32 || c.temp_f > 95 || c.is_stormy(),
    item: item("🏠", "Stay indoors", "Conditions are harsh, plan something inside"),
}];

const ACTIVITY_DEFAULT: RecommendationItem =
    item("🗺️", "Explore local attractions", "Check out what is happening nearby");

const KIDS_RULES: &[Rule] = &[
    Rule {
        applies: |c| c.temp_f >= 68,
        item: item("💦", "Water play", "Sprinklers, water balloons or a paddling pool"),
    },
    Rule {
        applies: |c| c.between(59, 77),
        item: item("🏃", "Running games", "Tag, relay races or a game of catch"),
    },
    Rule {
        applies: |c| c.is_clear(),
        item: item("🔍", "Scavenger hunt", "Hide clues around the yard or park"),
    },
    Rule {
        applies: |c| c.is_rainy(),
        item: item("✂️", "Indoor crafts", "Paint, build or make something together"),
    },
    Rule {
        applies: |c| c.is_snowy(),
        item: item("⛄", "Snow play", "Build a snowman or have a snowball fight"),
    },
];

const KIDS_DEFAULT: RecommendationItem =
    item("🎲", "Board games & story time", "Settle in with games and a good book");

const OUTFIT_RULES: &[Rule] = &[
    Rule {
        applies: |c| c.temp_f >= 77,
        item: item("👕", "Light clothing", "Shorts, t-shirt and sunglasses"),
    },
    Rule {
        applies: |c| c.between(59, 75),
        item: item("👔", "Light layers", "A long-sleeve top with a light sweater"),
    },
    Rule {
        applies: |c| c.between(41, 57),
        item: item("🧥", "Jacket", "Bring a jacket and closed shoes"),
    },
    Rule {
        applies: |c| c.temp_f < 41,
        item: item("🧣", "Bundle up", "Heavy coat, scarf, hat and gloves"),
    },
    Rule {
        applies: |c| c.is_rainy(),
        item: item("☂️", "Rain gear", "Umbrella and waterproof shoes"),
    },
    Rule {
        applies: |c| c.wind_mph > 15.0,
        item: item("🌬️", "Windbreaker", "A wind-resistant outer layer"),
    },
];

const OUTFIT_DEFAULT: RecommendationItem =
    item("👖", "Casual wear", "Everyday clothes will do");

const GARDENING_RULES: &[Rule] = &[
    Rule {
        applies: |c| c.between(68, 86),
        item: item("🌱", "Planting & watering", "Good time to plant; water early or late"),
    },
    Rule {
        applies: |c| c.between(59, 77),
        item: item("🌸", "Pruning & flowers", "Prune shrubs and tend to flower beds"),
    },
    Rule {
        applies: |c| c.temp_f > 86,
        item: item("🥵", "Heat protection", "Shade delicate plants and water deeply"),
    },
    Rule {
        applies: |c| c.is_rainy(),
        item: item("🌧️", "Natural watering", "Skip the hose, the rain has it covered"),
    },
    Rule {
        applies: |c| c.is_clear(),
        item: item("🧺", "Harvest", "Pick ripe produce while it is dry"),
    },
    Rule {
        applies: |c| c.wind_mph > 15.0,
        item: item("🪵", "Stake plants", "Support tall plants against the wind"),
    },
    Rule {
        applies: |c| c.humidity > 70,
        item: item("🍄", "Fungus watch", "High humidity favours mildew and mould"),
    },
];

const GARDENING_DEFAULT: RecommendationItem =
    item("🧤", "General maintenance", "Weed, tidy and check on your plants");

fn fired<'a>(rules: &'a [Rule], conditions: &'a Conditions) -> impl Iterator<Item = RecommendationItem> + 'a {
    rules.iter().filter(|rule| (rule.applies)(conditions)).map(|rule| rule.item)
}

/// Fired `rules` in order, then every fired override, at most [`MAX_ITEMS`] in all.
fn evaluate(
    rules: &[Rule],
    overrides: &[Rule],
    default: RecommendationItem,
    conditions: &Conditions,
) -> Vec<RecommendationItem> {
    let pinned: Vec<_> = fired(overrides, conditions).take(MAX_ITEMS).collect();
    let mut items: Vec<_> = fired(rules, conditions).take(MAX_ITEMS - pinned.len()).collect();
    items.extend(pinned);

    if items.is_empty() {
        items.push(default);
    }
    items
}

pub fn activities(conditions: &Conditions) -> Vec<RecommendationItem> {
    evaluate(ACTIVITY_RULES, ACTIVITY_OVERRIDES, ACTIVITY_DEFAULT, conditions)
}

pub fn kids_activities(conditions: &Conditions) -> Vec<RecommendationItem> {
    evaluate(KIDS_RULES, &[], KIDS_DEFAULT, conditions)
}

pub fn outfits(conditions: &Conditions) -> Vec<RecommendationItem> {
    evaluate(OUTFIT_RULES, &[], OUTFIT_DEFAULT, conditions)
}

pub fn gardening_tips(conditions: &Conditions) -> Vec<RecommendationItem> {
    evaluate(GARDENING_RULES, &[], GARDENING_DEFAULT, conditions)
}

pub fn recommend(current: &CurrentConditions) -> Recommendations {
    let conditions = Conditions::from(current);

    Recommendations {
        activities: activities(&conditions),
        kids: kids_activities(&conditions),
        outfits: outfits(&conditions),
        gardening: gardening_tips(&conditions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn titles(items: &[RecommendationItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.title).collect()
    }

    fn reading(temperature_c: f64, description: &str, humidity: u8, wind: f64) -> CurrentConditions {
        CurrentConditions {
            temperature_c,
            feels_like_c: temperature_c,
            description: description.to_string(),
            humidity_pct: humidity,
            wind_speed_kph: wind,
            precip_mm: 0.0,
            pressure_hpa: 1013.0,
            uv_index: 5,
            air_quality_index: None,
            cloud_cover_pct: 0,
            visibility_km: 10.0,
            observation_time: Utc::now(),
            utc_offset_secs: None,
        }
    }

    #[test]
    fn warm_sunny_day() {
        // 24 °C is 75 °F
        let recs = recommend(&reading(24.0, "Sunny", 40, 5.0));
        let activities = titles(&recs.activities);

        assert!(activities.contains(&"Swimming"));
        assert!(activities.contains(&"Photography"));
        assert!(recs.activities.len() <= MAX_ITEMS);
        assert_eq!(activities, ["Swimming", "Walking tour", "Cycling", "Photography"]);
    }

    #[test]
    fn lists_are_truncated_to_four() {
        // 68 °F rainy and windy fires many rules in every table
        let c = Conditions::new(68, "light rain showers", 85, 20.0);
        for list in [activities(&c), kids_activities(&c), outfits(&c), gardening_tips(&c)] {
            assert!(!list.is_empty() && list.len() <= MAX_ITEMS);
        }
        assert_eq!(
            titles(&activities(&c)),
            ["Walking tour", "Cycling", "Hiking", "Picnic"]
        );
        assert_eq!(
            titles(&gardening_tips(&c)),
            ["Planting & watering", "Pruning & flowers", "Natural watering", "Stake plants"]
        );
    }

    #[test]
    fn defaults_only_when_nothing_fires() {
        // 58 °F sits between the outfit bands
        let c = Conditions::new(58, "haze", 50, 3.0);
        assert_eq!(titles(&outfits(&c)), ["Casual wear"]);
        assert_eq!(titles(&kids_activities(&c)), ["Board games & story time"]);
        assert_eq!(titles(&gardening_tips(&c)), ["General maintenance"]);
        assert_eq!(titles(&activities(&c)), ["Hiking", "Picnic"]);

        let c = Conditions::new(45, "haze", 50, 3.0);
        assert_eq!(titles(&activities(&c)), ["Explore local attractions"]);
    }

    #[test]
    fn harsh_weather_adds_indoor_option() {
        let freezing = Conditions::new(20, "Moderate snow", 80, 4.0);
        assert_eq!(titles(&activities(&freezing)), ["Winter sports", "Stay indoors"]);

        let storm = Conditions::new(72, "Thunderstorm", 80, 4.0);
        assert!(titles(&activities(&storm)).contains(&"Stay indoors"));

        let scorching = Conditions::new(100, "clear sky", 20, 0.0);
        assert_eq!(
            titles(&activities(&scorching)),
            ["Swimming", "Photography", "Stay indoors"]
        );
    }

    #[test]
    fn kite_needs_wind_without_rain() {
        let breezy = Conditions::new(45, "overcast clouds", 50, 12.0);
        assert_eq!(titles(&activities(&breezy)), ["Sightseeing", "Kite flying"]);

        let wet = Conditions::new(45, "moderate rain", 50, 12.0);
        assert_eq!(titles(&activities(&wet)), ["Café or museum"]);
    }

    #[test]
    fn outfit_bands() {
        assert_eq!(titles(&outfits(&Conditions::new(77, "haze", 50, 0.0))), ["Light clothing"]);
        assert_eq!(titles(&outfits(&Conditions::new(75, "haze", 50, 0.0))), ["Light layers"]);
        assert_eq!(titles(&outfits(&Conditions::new(41, "haze", 50, 0.0))), ["Jacket"]);
        assert_eq!(titles(&outfits(&Conditions::new(40, "haze", 50, 0.0))), ["Bundle up"]);
        assert_eq!(
            titles(&outfits(&Conditions::new(40, "drizzle", 50, 16.0))),
            ["Bundle up", "Rain gear", "Windbreaker"]
        );
    }

    #[test]
    fn kids_bands() {
        assert_eq!(
            titles(&kids_activities(&Conditions::new(70, "sunny", 50, 0.0))),
            ["Water play", "Running games", "Scavenger hunt"]
        );
        assert_eq!(
            titles(&kids_activities(&Conditions::new(30, "light snow", 50, 0.0))),
            ["Snow play"]
        );
    }

    #[test]
    fn gardening_heat_and_humidity() {
        assert_eq!(
            titles(&gardening_tips(&Conditions::new(90, "haze", 75, 0.0))),
            ["Heat protection", "Fungus watch"]
        );
    }

    #[test]
    fn description_is_matched_case_insensitively() {
        let c = Conditions::from(&reading(24.0, "SUNNY", 40, 5.0));
        assert_eq!(c.description, "sunny");
        assert_eq!(c.temp_f, 75);
        assert!(titles(&activities(&c)).contains(&"Photography"));
    }

    #[test]
    fn wind_bands_are_in_mph() {
        // 16 km/h is 9.9 mph, 17 km/h is 10.6 mph
        let calm = recommend(&reading(7.0, "overcast clouds", 50, 16.0));
        assert!(!titles(&calm.activities).contains(&"Kite flying"));

        let breezy = recommend(&reading(7.0, "overcast clouds", 50, 17.0));
        assert_eq!(titles(&breezy.activities), ["Sightseeing", "Kite flying"]);

        // 25 km/h is 15.5 mph
        let gusty = recommend(&reading(7.0, "overcast clouds", 50, 25.0));
        assert!(titles(&gusty.outfits).contains(&"Windbreaker"));
        assert!(titles(&gusty.gardening).contains(&"Stake plants"));

        let below = recommend(&reading(7.0, "overcast clouds", 50, 24.0));
        assert!(!titles(&below.outfits).contains(&"Windbreaker"));
    }

    #[test]
    fn stay_indoors_survives_a_full_list() {
        // a mild storm fires four ordinary activities first
        let storm = Conditions::new(68, "thunderstorm", 50, 0.0);
        let titles = titles(&activities(&storm));

        assert_eq!(titles, ["Walking tour", "Cycling", "Hiking", "Stay indoors"]);
    }
}
