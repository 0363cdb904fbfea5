//! 계산 엔진 회귀 테스트. 기준 단가표와 기준 상수를 사용한다.
use palazon_calculator::config::TariffConfig;
use palazon_calculator::engine::{
    adjusted_percentage, Band, CalcError, CalculationInput, Engine,
};
use palazon_calculator::tariff::{TierEntry, TierTable};
use palazon_calculator::validate;

fn input(g: f64, c: f64, b: f64, e: f64, m: f64, len: f64) -> CalculationInput {
    CalculationInput {
        guinea: g,
        caminadora: c,
        bledo: b,
        enredadera: e,
        marihuano: m,
        furrow_length: len,
    }
}

#[test]
fn medium_example_resolves_tier_17() {
    let engine = Engine::default();
    let res = engine
        .run(&input(5.0, 0.0, 3.0, 2.0, 1.0, 100.0))
        .expect("calculation");
    assert_eq!(res.percentage, 16.0);
    assert_eq!(res.tier_key, 17);
    assert_eq!(res.value_per_hectare, 265283.0);
    assert_eq!(res.band, Band::Medium);
    assert_eq!(res.band_color, "#F59E0B");

    // 58362 / (265283 / 10000) / (1.65 * 100)
    let expected = 58362.0 / (265283.0 / 10_000.0) / (1.65 * 100.0);
    assert!((res.furrows - expected).abs() < 1e-9, "furrows={}", res.furrows);
    assert!((res.furrows - 13.333).abs() < 0.01);
}

#[test]
fn all_zero_is_lowest_tier() {
    let res = Engine::default()
        .run(&input(0.0, 0.0, 0.0, 0.0, 0.0, 100.0))
        .expect("calculation");
    assert_eq!(res.percentage, 0.0);
    assert_eq!(res.tier_key, 2);
    assert_eq!(res.value_per_hectare, 58362.0);
    assert_eq!(res.band, Band::Low);
}

#[test]
fn over_limit_is_rejected() {
    let engine = Engine::default();
    // 50*2 + 0.02 = 100.02
    let err = engine
        .run(&input(50.0, 0.0, 0.02, 0.0, 0.0, 100.0))
        .unwrap_err();
    assert!(matches!(err, CalcError::ExceedsLimit { .. }));
    assert!(err.to_string().starts_with("percentage exceeds 100%"));
}

#[test]
fn exactly_hundred_has_no_tier() {
    let err = Engine::default()
        .run(&input(0.0, 0.0, 100.0, 0.0, 0.0, 100.0))
        .unwrap_err();
    assert!(matches!(err, CalcError::OutOfRange { .. }));
    assert!(err.to_string().starts_with("percentage out of range"));
}

#[test]
fn boundary_value_moves_to_next_tier() {
    let table = TierTable::reference();
    assert_eq!(table.lookup(17.0).map(|t| t.key), Some(28));
    assert_eq!(table.lookup(16.999).map(|t| t.key), Some(17));
    assert_eq!(table.lookup(2.0).map(|t| t.key), Some(3));
    assert_eq!(table.lookup(99.99).map(|t| t.key), Some(100));
    assert_eq!(table.lookup(100.0), None);
}

#[test]
fn tier_lookup_is_monotonic() {
    let table = TierTable::reference();
    let mut last = 0;
    let mut p = 0.0;
    while p < 100.0 {
        let key = table.lookup(p).expect("in range").key;
        assert!(key >= last, "p={p} key={key} last={last}");
        assert!(f64::from(key) > p);
        last = key;
        p += 0.25;
    }
}

#[test]
fn furrows_zero_for_non_positive_inputs() {
    let engine = Engine::default();
    assert_eq!(engine.furrows_needed(0.0, 100.0), 0.0);
    assert_eq!(engine.furrows_needed(-5.0, 100.0), 0.0);
    assert_eq!(engine.furrows_needed(58362.0, 0.0), 0.0);
    assert_eq!(engine.furrows_needed(58362.0, -1.0), 0.0);

    let res = Engine::default()
        .run(&input(1.0, 0.0, 0.0, 0.0, 0.0, 0.0))
        .expect("calculation");
    assert_eq!(res.furrows, 0.0);
}

#[test]
fn run_is_idempotent() {
    let engine = Engine::default();
    let i = input(3.0, 12.0, 4.5, 0.0, 7.0, 85.0);
    assert_eq!(engine.run(&i), engine.run(&i));
}

#[test]
fn caminadora_is_weighted() {
    let i = input(0.0, 10.0, 0.0, 0.0, 0.0, 100.0);
    assert!((adjusted_percentage(&i) - 8.2).abs() < 1e-12);
    let res = Engine::default().run(&i).unwrap();
    assert_eq!(res.tier_key, 10);
    assert_eq!(res.band, Band::Low);
}

#[test]
fn high_band_above_twenty_five() {
    let res = Engine::default()
        .run(&input(10.0, 0.0, 10.0, 0.0, 0.0, 100.0))
        .unwrap();
    assert_eq!(res.percentage, 30.0);
    assert_eq!(res.tier_key, 39);
    assert_eq!(res.band, Band::High);
}

#[test]
fn validated_text_feeds_engine() {
    let i = input(
        validate("5", 100.0),
        validate("", 100.0),
        validate("3", 100.0),
        validate("dos", 100.0),
        validate("1", 100.0),
        validate("100", f64::INFINITY),
    );
    let res = Engine::default().run(&i).unwrap();
    assert_eq!(res.percentage, 14.0);
    assert_eq!(res.tier_key, 15);
    assert_eq!(res.band, Band::Low);
}

#[test]
fn engine_uses_configured_tariff() {
    let tariff = TariffConfig {
        tiers: vec![
            TierEntry { key: 50, value_per_hectare: 10_000.0 },
            TierEntry { key: 10, value_per_hectare: 5_000.0 },
        ],
        max_percentage: 60.0,
        ..TariffConfig::default()
    };
    let engine = Engine::from_tariff(&tariff).expect("valid tariff");
    let res = engine.run(&input(0.0, 0.0, 12.0, 0.0, 0.0, 10.0)).unwrap();
    assert_eq!(res.tier_key, 50);
    assert!(matches!(
        engine.run(&input(0.0, 0.0, 55.0, 0.0, 0.0, 10.0)),
        Err(CalcError::OutOfRange { .. })
    ));
    assert!(matches!(
        engine.run(&input(0.0, 0.0, 61.0, 0.0, 0.0, 10.0)),
        Err(CalcError::ExceedsLimit { .. })
    ));
}

#[test]
fn nan_percentage_has_no_tier() {
    let table = TierTable::reference();
    assert_eq!(table.lookup(f64::NAN), None);

    let err = Engine::default()
        .run(&input(0.0, 0.0, f64::NAN, 0.0, 0.0, 100.0))
        .unwrap_err();
    assert!(matches!(err, CalcError::OutOfRange { .. }));
}
