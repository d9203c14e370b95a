use chrono::{TimeZone, Utc};
use rand::{SeedableRng, rngs::StdRng};
use weatherornot_core::{
    ForecastSeries, ForecastSynthesizer, IconCategory, NewPlace, SavedPlaces, Session,
    SynthesisInput, Temperature, celsius_to_fahrenheit, classify_condition, fahrenheit_to_celsius,
    recommend,
    recommend::{Conditions, activities},
    synth::random_reading,
};

fn synthesizer() -> ForecastSynthesizer {
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).single().expect("valid time");
    ForecastSynthesizer::new(now)
}

fn assert_well_formed(series: &ForecastSeries) {
    let points = series.points();
    assert_eq!(points.len(), 40);
    for pair in points.windows(2) {
        assert_eq!(pair[1].dt - pair[0].dt, 10_800);
    }
    assert!(points.iter().all(|p| (0.0..=1.0).contains(&p.pop)));
    // rebuilding through the validating constructor must succeed
    assert!(ForecastSeries::new(points.to_vec()).is_ok());
}

#[test]
fn conversion_round_trips_within_a_degree() {
    let mut c = -60.0;
    while c <= 60.0 {
        let back = fahrenheit_to_celsius(f64::from(celsius_to_fahrenheit(c)));
        assert!((back - c).abs() <= 1.0, "{c} -> {back}");
        c += 0.1;
    }
}

#[test]
fn seeded_synthesis_is_idempotent() {
    let synth = synthesizer();
    let mut rng_a = StdRng::seed_from_u64(1);
    let mut rng_b = StdRng::seed_from_u64(2);

    for name in ["London", "São Paulo", "Reykjavik", "Nowhere In Particular", ""] {
        let a = synth.synthesize_forecast(SynthesisInput::Place(name), &mut rng_a);
        let b = synth.synthesize_forecast(SynthesisInput::Place(name), &mut rng_b);
        assert_eq!(a, b, "{name}");
    }
}

#[test]
fn snow_depends_on_temperature() {
    let cold = classify_condition("light snow", 12, Temperature::Celsius(-3.0));
    assert_eq!(cold.category, IconCategory::Snow);

    let warm = classify_condition("light snow", 12, Temperature::Celsius(20.0));
    assert_eq!(warm.category, IconCategory::CloudyDay);
}

#[test]
fn clear_sky_follows_the_clock() {
    let night = classify_condition("clear sky", 3, Temperature::Celsius(15.0));
    let day = classify_condition("clear sky", 10, Temperature::Celsius(15.0));
    assert_eq!(night.category, IconCategory::ClearNight);
    assert_eq!(day.category, IconCategory::ClearDay);
}

#[test]
fn warm_sunny_day_suggests_swimming_and_photography() {
    let items = activities(&Conditions::new(celsius_to_fahrenheit(24.0), "Sunny", 40, 5.0));
    let titles: Vec<&str> = items.iter().map(|i| i.title).collect();

    assert!(titles.contains(&"Swimming"), "{titles:?}");
    assert!(titles.contains(&"Photography"), "{titles:?}");
    assert!(items.len() <= 4);
}

#[test]
fn every_list_is_bounded_and_non_empty() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let reading = random_reading(&mut rng, Utc::now());
        let recs = recommend(&reading);
        for list in [&recs.activities, &recs.kids, &recs.outfits, &recs.gardening] {
            assert!((1..=4).contains(&list.len()));
        }
    }
}

#[test]
fn every_synthesized_series_is_well_formed() {
    let synth = synthesizer();
    let mut rng = StdRng::seed_from_u64(2024);

    for name in ["Tokyo", "Cairo", "Sydney", "Unknownville"] {
        assert_well_formed(&synth.synthesize_forecast(SynthesisInput::Place(name), &mut rng));

        let reading = random_reading(&mut rng, Utc::now());
        assert_well_formed(&synth.synthesize_forecast(SynthesisInput::Reading(&reading), &mut rng));
    }
}

#[test]
fn removing_places_keeps_orders_dense() {
    let session = Session::for_user("carol");
    let mut store = SavedPlaces::in_memory();

    let ids: Vec<_> = ["Oslo", "Rome", "Lima", "Nairobi", "Perth"]
        .into_iter()
        .map(|name| store.add(&session, NewPlace::named(name)).expect("add").id)
        .collect();

    store.remove(&session, ids[0]).expect("remove first");
    store.remove(&session, ids[3]).expect("remove middle");

    let orders: Vec<usize> = store.list(&session).expect("list").iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}
