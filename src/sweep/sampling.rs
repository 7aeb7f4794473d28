use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{
    DayContext, Gender, MealNutrients, Profile, ProteinType, Training, TrainingType, format_hhmm,
};
use crate::scenario::Scenario;

/// Inclusive sampling ranges for random scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRanges {
    pub carbs: (f64, f64),
    /// Share of carbs that are simple.
    pub simple_share: (f64, f64),
    pub protein: (f64, f64),
    pub fat: (f64, f64),
    pub fiber: (f64, f64),
    pub gi: (f64, f64),
    /// Meal clock time, minutes since midnight.
    pub meal_minutes: (u32, u32),
    pub sleep_hours: (f64, f64),
    pub stress: (f64, f64),
    pub age: (f64, f64),
    pub weight: (f64, f64),
    pub height: (f64, f64),
    pub steps: (f64, f64),
    pub liquid_probability: f64,
    pub training_probability: f64,
}

impl Default for SampleRanges {
    fn default() -> Self {
        Self {
            carbs: (0.0, 120.0),
            simple_share: (0.0, 1.0),
            protein: (0.0, 60.0),
            fat: (0.0, 50.0),
            fiber: (0.0, 20.0),
            gi: (20.0, 100.0),
            meal_minutes: (6 * 60, 23 * 60),
            sleep_hours: (3.5, 9.5),
            stress: (1.0, 10.0),
            age: (18.0, 75.0),
            weight: (50.0, 120.0),
            height: (150.0, 200.0),
            steps: (0.0, 15000.0),
            liquid_probability: 0.15,
            training_probability: 0.35,
        }
    }
}

fn sample(rng: &mut impl Rng, range: (f64, f64)) -> f64 {
    if range.1 > range.0 {
        rng.gen_range(range.0..=range.1)
    } else {
        range.0
    }
}

/// Round to one decimal so generated scenarios read well in reports.
fn tidy(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Training placed within three hours either side of the meal.
fn sample_training(rng: &mut impl Rng, meal_minutes: u32) -> Training {
    let offset: i64 = rng.gen_range(-180..=120);
    let start = (i64::from(meal_minutes) + offset).clamp(0, 23 * 60 + 59) as u32;
    let kind = *[TrainingType::Cardio, TrainingType::Strength, TrainingType::Hobby]
        .choose(rng)
        .unwrap_or(&TrainingType::Cardio);
    let mut zones = [0.0; 4];
    for zone in zones.iter_mut() {
        *zone = tidy(sample(rng, (0.0, 25.0)));
    }
    Training::new(&format_hhmm(start), zones, kind)
}

/// Draw one random scenario.
pub fn sample_scenario(rng: &mut impl Rng, ranges: &SampleRanges, index: usize) -> Scenario {
    let carbs = tidy(sample(rng, ranges.carbs));
    let simple = tidy(carbs * sample(rng, ranges.simple_share));
    let protein = tidy(sample(rng, ranges.protein));
    let fat = tidy(sample(rng, ranges.fat));
    let protein_type = *[ProteinType::Animal, ProteinType::Plant, ProteinType::Mixed]
        .choose(rng)
        .unwrap_or(&ProteinType::Mixed);

    let nutrients = MealNutrients {
        carbs,
        simple_carbs: simple,
        complex_carbs: tidy(carbs - simple),
        protein,
        fat,
        fiber: tidy(sample(rng, ranges.fiber)),
        gi: sample(rng, ranges.gi).round(),
        kcal: (carbs * 4.0 + protein * 4.0 + fat * 9.0).round(),
        is_liquid: rng.gen_bool(ranges.liquid_probability.clamp(0.0, 1.0)),
        protein_type,
        ..Default::default()
    };

    let (earliest, latest) = ranges.meal_minutes;
    let meal_minutes = rng.gen_range(earliest..=latest.max(earliest));
    let trainings = if rng.gen_bool(ranges.training_probability.clamp(0.0, 1.0)) {
        vec![sample_training(rng, meal_minutes)]
    } else {
        Vec::new()
    };
    let context = DayContext {
        meal_time: Some(format_hhmm(meal_minutes)),
        trainings,
        steps: sample(rng, ranges.steps).round(),
        sleep_hours: Some(tidy(sample(rng, ranges.sleep_hours))),
        stress_level: Some(sample(rng, ranges.stress).round()),
        ..Default::default()
    };

    let gender = if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female };
    let profile = Profile {
        age: Some(sample(rng, ranges.age).round()),
        weight: Some(tidy(sample(rng, ranges.weight))),
        height: Some(sample(rng, ranges.height).round()),
        gender,
    };

    Scenario {
        id: Some(format!("sample-{:04}", index + 1)),
        nutrients: Some(nutrients),
        context,
        profile,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sampling_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let ranges = SampleRanges::default();
        for i in 0..200 {
            let s = sample_scenario(&mut rng, &ranges, i);
            let n = s.nutrients.as_ref().unwrap();
            assert!(n.carbs >= 0.0 && n.carbs <= 120.0);
            assert!(n.simple_carbs <= n.carbs + 0.1);
            assert!(n.complex_carbs >= -0.1);
            assert!(n.gi >= 20.0 && n.gi <= 100.0);
            assert!(s.context.meal_minutes() >= 6 * 60);
            assert!(s.context.meal_minutes() <= 23 * 60);
            assert!(s.context.trainings.iter().all(|t| t.is_valid()));
        }
    }

    #[test]
    fn test_sampling_reproducible() {
        let ranges = SampleRanges::default();
        let a = sample_scenario(&mut StdRng::seed_from_u64(42), &ranges, 0);
        let b = sample_scenario(&mut StdRng::seed_from_u64(42), &ranges, 0);
        assert_eq!(a, b);
        assert_eq!(a.id.as_deref(), Some("sample-0001"));
    }

    #[test]
    fn test_degenerate_ranges() {
        let ranges = SampleRanges {
            carbs: (30.0, 30.0),
            training_probability: 0.0,
            ..Default::default()
        };
        let s = sample_scenario(&mut StdRng::seed_from_u64(1), &ranges, 0);
        assert_eq!(s.nutrients.unwrap().carbs, 30.0);
        assert!(s.context.trainings.is_empty());
    }
}
