use std::time::{Duration, Instant};

use assert_float_eq::*;

use insulin_wave::engine::activity::next_day_effect;
use insulin_wave::engine::classifier::KeywordClassifier;
use insulin_wave::engine::constants::{BASELINE_MAX_HOURS, NDTE_MAX_PEAK, NDTE_MAX_WAVE};
use insulin_wave::engine::day::{circadian, personal_baseline};
use insulin_wave::engine::food::{aggregate_meal, continuous_gl_multiplier};
use insulin_wave::engine::phases::{LipolysisZone, hypoglycemia_risk, lipolysis_status};
use insulin_wave::models::{
    DayContext, Gender, InsulinogenicType, MealItem, MealNutrients, Profile, RecentTraining,
    TrainingType,
};
use insulin_wave::{WaveCache, WaveConfig};

fn item(name: &str, grams: f64, gi: f64, carbs100: f64, protein100: f64, fat100: f64) -> MealItem {
    MealItem {
        name: name.to_string(),
        grams: Some(grams),
        gi: Some(gi),
        carbs100,
        complex100: carbs100,
        protein100,
        fat100,
        ..Default::default()
    }
}

#[test]
fn test_continuous_gl_endpoints() {
    assert_float_absolute_eq!(continuous_gl_multiplier(0.0), 0.15, 1e-9);
    assert_float_absolute_eq!(continuous_gl_multiplier(40.0), 1.30, 1e-9);
    assert_float_absolute_eq!(continuous_gl_multiplier(80.0), 1.30, 1e-9);
    assert!(continuous_gl_multiplier(10.0) < continuous_gl_multiplier(20.0));
}

#[test]
fn test_circadian_extremes() {
    assert_float_absolute_eq!(circadian(8.0).multiplier, 0.85, 1e-9);
    assert_float_absolute_eq!(circadian(20.0).multiplier, 1.20, 1e-9);
    assert!(circadian(14.0).multiplier > circadian(8.0).multiplier);
}

#[test]
fn test_personal_baseline_clamped() {
    let heavy = Profile {
        age: Some(90.0),
        weight: Some(180.0),
        height: Some(150.0),
        gender: Gender::Male,
    };
    assert_float_absolute_eq!(personal_baseline(&heavy).base_hours, BASELINE_MAX_HOURS, 1e-9);

    let neutral = personal_baseline(&Profile::default());
    assert_float_absolute_eq!(neutral.base_hours, 3.0, 1e-9);
}

#[test]
fn test_aggregate_milk_and_bread() {
    let items = [
        item("Milk 3.2%", 250.0, 30.0, 4.8, 3.2, 3.2),
        item("Bread", 50.0, 75.0, 50.0, 8.0, 2.0),
    ];
    let meal = aggregate_meal(&items, &KeywordClassifier::default());

    assert_float_absolute_eq!(meal.carbs, 37.0, 1e-9);
    assert_float_absolute_eq!(meal.protein, 12.0, 1e-9);
    assert_float_absolute_eq!(meal.gi, 60.0, 1e-9);
    assert!(meal.is_liquid);
    assert_eq!(meal.insulinogenic, Some(InsulinogenicType::LiquidDairy));
    // Milk's insulin-index boost lifts the summed GL above the plain value
    assert!(meal.gl.unwrap_or_default() > meal.gi * meal.carbs / 100.0);
}

#[test]
fn test_aggregate_empty_meal() {
    let meal = aggregate_meal(&[], &KeywordClassifier::default());
    assert_eq!(meal, MealNutrients::default());
}

#[test]
fn test_lipolysis_zones() {
    let start = lipolysis_status(0.0);
    assert_float_absolute_eq!(start.level, 80.0, 1e-9);
    assert_eq!(start.zone, LipolysisZone::Blocked);
    assert_eq!(start.lipolysis_pct, 0);

    let late = lipolysis_status(100.0);
    assert!(late.level <= 15.0);
    assert_eq!(late.zone, LipolysisZone::Partial);

    assert_eq!(lipolysis_status(f64::NAN), start);
}

#[test]
fn test_hypoglycemia_risk_weights() {
    let sweet = MealNutrients {
        carbs: 50.0,
        gi: 85.0,
        protein: 2.0,
        fat: 1.0,
        ..Default::default()
    };
    let risk = hypoglycemia_risk(&sweet, None);
    assert_float_absolute_eq!(risk.score, 0.9, 1e-9);
    assert!(risk.has_risk);
    assert_float_absolute_eq!(risk.window_start, 120.0, 1e-9);
    assert_float_absolute_eq!(risk.window_end, 240.0, 1e-9);

    let fasted = hypoglycemia_risk(&sweet, Some(10.0));
    assert_float_absolute_eq!(fasted.score, 1.0, 1e-9);

    let balanced = MealNutrients {
        carbs: 50.0,
        gi: 50.0,
        protein: 30.0,
        fat: 15.0,
        ..Default::default()
    };
    let calm = hypoglycemia_risk(&balanced, Some(10.0));
    assert_float_absolute_eq!(calm.score, 0.1, 1e-9);
    assert!(!calm.has_risk);
}

#[test]
fn test_next_day_effect_window() {
    let heavy = RecentTraining {
        hours_ago: 20.0,
        kcal: 800.0,
        kind: TrainingType::Strength,
    };
    let effect = next_day_effect(&[heavy], Some(23.0));
    assert!(effect.active);
    assert!(effect.wave_reduction > 0.0 && effect.wave_reduction <= NDTE_MAX_WAVE);
    assert!(effect.peak_reduction > 0.0 && effect.peak_reduction <= NDTE_MAX_PEAK);
    assert_eq!(effect.trainings_count, 1);

    let stale = RecentTraining {
        hours_ago: 50.0,
        ..heavy
    };
    assert!(!next_day_effect(&[stale], Some(23.0)).active);

    let light = RecentTraining {
        kcal: 100.0,
        ..heavy
    };
    assert!(!next_day_effect(&[light], Some(23.0)).active);
    assert!(!next_day_effect(&[], None).active);
}

#[test]
fn test_cache_round_trip_through_engine() {
    let meal = MealNutrients {
        carbs: 40.0,
        complex_carbs: 40.0,
        protein: 25.0,
        fat: 10.0,
        gi: 50.0,
        ..Default::default()
    };
    let context = DayContext {
        meal_time: Some("13:00".to_string()),
        ..Default::default()
    };
    let profile = Profile::default();
    let config = WaveConfig::default();

    let start = Instant::now();
    let mut cache = WaveCache::new(Duration::from_secs(30));
    let first = cache.get_or_compute("lunch", &meal, &context, &profile, &config, start);
    let second = cache.get_or_compute("lunch", &meal, &context, &profile, &config, start);
    assert_eq!(first, second);
    assert_eq!(cache.stats(), (1, 1));

    let later = start + Duration::from_secs(31);
    cache.get_or_compute("lunch", &meal, &context, &profile, &config, later);
    assert_eq!(cache.stats(), (1, 2));
    assert_eq!(cache.len(), 1);
}
