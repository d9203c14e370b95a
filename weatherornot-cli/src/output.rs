use weatherornot_core::{
    DataSource, ForecastSeries, RecommendationItem, Recommendations, SavedPlace, WeatherReport,
    celsius_to_fahrenheit,
};

pub fn print_report(report: &WeatherReport) {
    let current = &report.current;
    let source = match report.source {
        DataSource::Live => "live",
        DataSource::Synthetic => "synthetic",
    };

    println!("{} ({source})", report.location.display_name());
    if let Some(coords) = report.location.coordinates {
        println!("  at {:.2}, {:.2}", coords.lat, coords.lon);
    }
    println!(
        "  {} {}  {}°F (feels like {}°F)",
        current.icon_category().glyph(),
        current.description,
        current.temperature_f(),
        current.feels_like_f(),
    );
    println!(
        "  Humidity {}%  Wind {:.0} km/h  Pressure {:.0} hPa  UV {}  Visibility {:.0} km",
        current.humidity_pct,
        current.wind_speed_kph,
        current.pressure_hpa,
        current.uv_index,
        current.visibility_km,
    );
    if let Some(aqi) = current.air_quality_index {
        println!("  Air quality index {aqi}");
    }

    println!();
    println!("Next 24 hours:");
    let row: Vec<String> = report
        .forecast
        .next_24h()
        .iter()
        .map(|p| format!("{} {}°F", p.time().format("%H:%M"), p.temperature_f()))
        .collect();
    println!("  {}", row.join("  "));

    println!();
    print_daily(&report.forecast);
}

pub fn print_daily(series: &ForecastSeries) {
    println!("5-day outlook:");
    for day in series.daily() {
        let point = day.representative;
        println!(
            "  {}  {}  high {:>3}°F  low {:>3}°F  {}",
            day.date.format("%a %d %b"),
            point.icon_category().glyph(),
            celsius_to_fahrenheit(day.high_c),
            celsius_to_fahrenheit(day.low_c),
            point.condition.description,
        );
    }
}

pub fn print_series(series: &ForecastSeries) {
    println!("{:<17} {:>5} {:>5} {:>6} {:>9}  {}", "Time (UTC)", "Temp", "Hum", "Precip", "Wind", "Conditions");
    for p in series.points() {
        println!(
            "{:<17} {:>4}F {:>4.0}% {:>5.0}% {:>5.0}km/h  {} {}",
            p.time().format("%a %d %b %H:%M"),
            p.temperature_f(),
            p.humidity_pct,
            p.pop * 100.0,
            p.wind_speed_kph,
            p.icon_category().glyph(),
            p.condition.description,
        );
    }
}

fn print_items(title: &str, items: &[RecommendationItem]) {
    println!("{title}:");
    for item in items {
        println!("  {} {}: {}", item.icon, item.title, item.description);
    }
}

pub fn print_recommendations(recs: &Recommendations) {
    println!();
    print_items("Activities", &recs.activities);
    print_items("With the kids", &recs.kids);
    print_items("What to wear", &recs.outfits);
    print_items("In the garden", &recs.gardening);
}

pub fn print_places(places: &[&SavedPlace]) {
    if places.is_empty() {
        println!("No saved places yet. Add one with `weatherornot places add <name>`.");
        return;
    }

    for place in places {
        let temperature = place.temperature_f.map(|t| format!("{t}°F")).unwrap_or_default();
        println!(
            "{:>2}. #{:<4} {:<24} {:>5}  {}",
            place.order + 1,
            place.id.0,
            place.name,
            temperature,
            place.description.as_deref().unwrap_or(""),
        );
    }
}
