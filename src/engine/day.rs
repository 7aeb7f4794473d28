use std::f64::consts::PI;

use serde::Serialize;

use crate::engine::constants::*;
use crate::models::context::MINUTES_PER_DAY;
use crate::models::{ColdExposure, ColdExposureKind, DayContext, Gender, PreviousMeal, Profile, parse_hhmm};

/// Wave length of a neutral meal for this person, before any other factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBaseline {
    pub base_hours: f64,
    pub age_factor: f64,
    pub bmi_factor: f64,
    pub gender_factor: f64,
    pub total_factor: f64,
}

pub fn personal_baseline(profile: &Profile) -> PersonalBaseline {
    let age_factor = match profile.age {
        Some(age) if age.is_finite() && age > BASELINE_AGE_START => {
            (age - BASELINE_AGE_START) * BASELINE_AGE_PER_YEAR
        }
        _ => 0.0,
    };

    let bmi_factor = match profile.bmi() {
        Some(bmi) if bmi > BASELINE_BMI_START => (bmi - BASELINE_BMI_START) * BASELINE_BMI_PER_UNIT,
        Some(bmi) if bmi < BASELINE_BMI_START => {
            let under = BASELINE_BMI_START - bmi;
            (-under * BASELINE_BMI_PER_UNIT * BASELINE_LOW_BMI_FACTOR).max(BASELINE_LOW_BMI_CAP)
        }
        _ => 0.0,
    };

    let gender_factor = match profile.gender {
        Gender::Female => BASELINE_FEMALE,
        Gender::Male => BASELINE_MALE,
        Gender::Other => 0.0,
    };

    let total_factor = 1.0 + age_factor + bmi_factor + gender_factor;
    let hours = (BASELINE_WAVE_HOURS * total_factor).clamp(BASELINE_MIN_HOURS, BASELINE_MAX_HOURS);

    PersonalBaseline {
        base_hours: (hours * 100.0).round() / 100.0,
        age_factor,
        bmi_factor,
        gender_factor,
        total_factor: (total_factor * 100.0).round() / 100.0,
    }
}

/// Second-meal effect of a still-running previous wave.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealStacking {
    pub bonus: f64,
    pub overlap_minutes: f64,
    pub has_stacking: bool,
}

/// Overlap with the previous wave shortens the new one, up to -15%.
pub fn meal_stacking(previous_end: u32, meal: u32, previous_gl: f64) -> MealStacking {
    let day = MINUTES_PER_DAY as f64;
    let mut overlap = previous_end as f64 - meal as f64;
    if overlap < -day / 2.0 {
        overlap += day;
    }
    if overlap <= 0.0 {
        return MealStacking::default();
    }

    let decay = (overlap / STACKING_OVERLAP_SCALE * STACKING_DECAY_RATE).min(1.0);
    let gl = if previous_gl.is_finite() { previous_gl.max(0.0) } else { 0.0 };
    let gl_factor = (gl / STACKING_GL_DIVISOR).min(STACKING_GL_FACTOR_CAP);
    let bonus = (decay * gl_factor * STACKING_MAX_BONUS).max(STACKING_MAX_BONUS);

    MealStacking {
        bonus: (bonus * 100.0).round() / 100.0,
        overlap_minutes: overlap,
        has_stacking: bonus < STACKING_SIGNIFICANT,
    }
}

/// Stacking for a meal against the context's previous meal, if any.
pub fn stacking_for(previous: Option<&PreviousMeal>, meal_minutes: u32) -> MealStacking {
    previous
        .and_then(|p| parse_hhmm(&p.wave_end).ok().map(|end| meal_stacking(end, meal_minutes, p.gl)))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CircadianPeriod {
    Night,
    EarlyMorning,
    PeakMorning,
    Midday,
    Afternoon,
    Evening,
    LateEvening,
}

impl CircadianPeriod {
    pub fn of_hour(hour: f64) -> Self {
        match hour {
            h if !(5.0..22.0).contains(&h) => CircadianPeriod::Night,
            h if h < 7.0 => CircadianPeriod::EarlyMorning,
            h if h < 10.0 => CircadianPeriod::PeakMorning,
            h if h < 14.0 => CircadianPeriod::Midday,
            h if h < 18.0 => CircadianPeriod::Afternoon,
            h if h < 21.0 => CircadianPeriod::Evening,
            _ => CircadianPeriod::LateEvening,
        }
    }

    pub fn desc(&self) -> &'static str {
        match self {
            CircadianPeriod::Night => "Night mode",
            CircadianPeriod::EarlyMorning => "Waking up",
            CircadianPeriod::PeakMorning => "Peak sensitivity",
            CircadianPeriod::Midday => "Midday",
            CircadianPeriod::Afternoon => "Afternoon balance",
            CircadianPeriod::Evening => "Evening decline",
            CircadianPeriod::LateEvening => "Late evening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Circadian {
    pub multiplier: f64,
    pub period: CircadianPeriod,
}

/// Smooth 24-hour cosine: 0.85 at 08:00, 1.20 at 20:00.
pub fn circadian(hour: f64) -> Circadian {
    let center = (CIRCADIAN_MIN + CIRCADIAN_MAX) / 2.0;
    let amplitude = (CIRCADIAN_MAX - CIRCADIAN_MIN) / 2.0;
    let phase = (hour - CIRCADIAN_PEAK_HOUR) / 24.0 * 2.0 * PI;
    Circadian {
        multiplier: center - amplitude * phase.cos(),
        period: CircadianPeriod::of_hour(hour),
    }
}

pub fn sleep_bonus(hours: Option<f64>) -> f64 {
    hours.map_or(0.0, |h| SLEEP_BONUS.bonus(h))
}

pub fn sleep_quality_bonus(quality: Option<f64>) -> f64 {
    quality.map_or(0.0, |q| SLEEP_QUALITY_BONUS.bonus(q))
}

/// Hydration bonus by share of the daily goal (30 ml per kg).
pub fn hydration_bonus(hydration_ml: Option<f64>, weight: Option<f64>) -> f64 {
    let weight = weight.filter(|w| w.is_finite() && *w > 0.0).unwrap_or(DEFAULT_WEIGHT_KG);
    let goal = weight * HYDRATION_ML_PER_KG;
    hydration_ml.map_or(0.0, |ml| HYDRATION_BONUS.bonus(ml / goal))
}

pub fn stress_bonus(level: Option<f64>) -> f64 {
    level.map_or(0.0, |s| STRESS_BONUS.bonus(s))
}

pub fn age_bonus(age: Option<f64>) -> f64 {
    age.map_or(0.0, |a| AGE_BONUS.bonus(a))
}

pub fn bmi_bonus(profile: &Profile) -> f64 {
    profile.bmi().map_or(0.0, |b| BMI_BONUS.bonus(b))
}

pub fn gender_bonus(gender: Gender) -> f64 {
    match gender {
        Gender::Male => GENDER_MALE_BONUS,
        Gender::Female => GENDER_FEMALE_BONUS,
        Gender::Other => 0.0,
    }
}

pub fn fasting_bonus(hours: Option<f64>) -> f64 {
    hours.map_or(0.0, |h| FASTING_BONUS.bonus(h))
}

/// Cold exposure within the last five hours improves glucose uptake.
pub fn cold_exposure_bonus(exposure: Option<&ColdExposure>) -> f64 {
    let Some(exposure) = exposure else {
        return 0.0;
    };
    if !exposure.hours_ago.is_finite()
        || exposure.hours_ago < 0.0
        || exposure.hours_ago > COLD_EXPOSURE_WINDOW_HOURS
    {
        return 0.0;
    }
    match exposure.kind {
        ColdExposureKind::Shower => COLD_SHOWER,
        ColdExposureKind::Bath => COLD_BATH,
        ColdExposureKind::Swim => COLD_SWIM,
    }
}

/// Autophagy phase by fasting hours, with its sensitivity gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Autophagy {
    pub phase: &'static str,
    pub sensitivity_gain: f64,
}

pub fn autophagy(hours: Option<f64>) -> Option<Autophagy> {
    let (gain, phase) = AUTOPHAGY_PHASES.bonus_tier(hours?);
    phase.map(|phase| Autophagy {
        phase,
        sensitivity_gain: gain,
    })
}

/// Day-side bonuses for one meal.
///
/// Only sleep, sleep quality, hydration and stress enter the wave sum; age,
/// BMI and gender are already in the personal baseline and are reported here
/// for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayFactors {
    pub circadian: Circadian,
    pub sleep: f64,
    pub sleep_quality: f64,
    pub hydration: f64,
    pub stress: f64,
    pub age: f64,
    pub bmi: f64,
    pub gender: f64,
    pub fasting: f64,
    pub cold_exposure: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autophagy: Option<Autophagy>,
    pub stacking: MealStacking,
}

impl DayFactors {
    pub fn personal_sum(&self) -> f64 {
        self.sleep + self.sleep_quality + self.hydration + self.stress
    }
}

pub fn day_factors(context: &DayContext, profile: &Profile) -> DayFactors {
    let meal_minutes = context.meal_minutes();
    DayFactors {
        circadian: circadian(meal_minutes as f64 / 60.0),
        sleep: sleep_bonus(context.sleep_hours),
        sleep_quality: sleep_quality_bonus(context.sleep_quality),
        hydration: hydration_bonus(context.hydration_ml, profile.weight),
        stress: stress_bonus(context.stress_level),
        age: age_bonus(profile.age),
        bmi: bmi_bonus(profile),
        gender: gender_bonus(profile.gender),
        fasting: fasting_bonus(context.hours_since_last_meal),
        cold_exposure: cold_exposure_bonus(context.cold_exposure.as_ref()),
        autophagy: autophagy(context.hours_since_last_meal),
        stacking: stacking_for(context.previous_meal.as_ref(), meal_minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_baseline_neutral() {
        let b = personal_baseline(&Profile::default());
        assert!((b.base_hours - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_personal_baseline_older_heavier() {
        let p = Profile {
            age: Some(65.0),
            weight: Some(95.0),
            height: Some(170.0),
            gender: Gender::Male,
        };
        let b = personal_baseline(&p);
        // 3 × (1 + 0.14 + (32.87 - 25) × 0.015 + 0.03) = 3.864
        assert!((b.base_hours - 3.86).abs() < 1e-9);
    }

    #[test]
    fn test_personal_baseline_low_bmi_capped() {
        let p = Profile {
            weight: Some(35.0),
            height: Some(180.0),
            gender: Gender::Female,
            ..Default::default()
        };
        let b = personal_baseline(&p);
        assert!((b.bmi_factor - (-0.10)).abs() < 1e-9);
        assert!((b.base_hours - 2.55).abs() < 1e-9);
    }

    #[test]
    fn test_meal_stacking_negative() {
        let s = meal_stacking(14 * 60, 13 * 60, 30.0);
        // overlap 60 → decay 0.333, glFactor 1.0
        assert!((s.bonus - (-0.05)).abs() < 1e-9);
        assert!(s.has_stacking);

        let none = meal_stacking(12 * 60, 13 * 60, 30.0);
        assert_eq!(none.bonus, 0.0);
        assert!(!none.has_stacking);
    }

    #[test]
    fn test_meal_stacking_wraps_midnight() {
        // Previous wave ends 00:30, meal at 23:45
        let s = meal_stacking(30, 23 * 60 + 45, 15.0);
        assert!((s.overlap_minutes - 45.0).abs() < 1e-9);
        assert!(s.bonus < 0.0);
    }

    #[test]
    fn test_circadian_extremes() {
        assert!((circadian(8.0).multiplier - 0.85).abs() < 1e-9);
        assert!((circadian(20.0).multiplier - 1.20).abs() < 1e-9);
        assert_eq!(circadian(23.0).period, CircadianPeriod::Night);
        assert_eq!(circadian(4.5).period, CircadianPeriod::Night);
        assert_eq!(circadian(21.5).period, CircadianPeriod::LateEvening);
        assert_eq!(circadian(12.0).period, CircadianPeriod::Midday);
    }

    #[test]
    fn test_day_bonuses() {
        assert!((sleep_bonus(Some(4.5)) - 0.15).abs() < 1e-9);
        assert_eq!(sleep_bonus(None), 0.0);
        assert!((stress_bonus(Some(8.0)) - 0.15).abs() < 1e-9);
        assert!((hydration_bonus(Some(500.0), Some(70.0)) - 0.08).abs() < 1e-9);
        assert_eq!(hydration_bonus(Some(2000.0), Some(70.0)), 0.0);
        assert!((fasting_bonus(Some(13.0)) - (-0.10)).abs() < 1e-9);
    }

    #[test]
    fn test_cold_exposure_window() {
        let recent = ColdExposure {
            kind: ColdExposureKind::Bath,
            hours_ago: 2.0,
        };
        let stale = ColdExposure {
            kind: ColdExposureKind::Bath,
            hours_ago: 6.0,
        };
        assert!((cold_exposure_bonus(Some(&recent)) - (-0.10)).abs() < 1e-9);
        assert_eq!(cold_exposure_bonus(Some(&stale)), 0.0);
    }

    #[test]
    fn test_autophagy_phase() {
        assert!(autophagy(Some(10.0)).is_none());
        let a = autophagy(Some(18.0)).unwrap();
        assert_eq!(a.phase, "active");
        assert!((a.sensitivity_gain - 0.10).abs() < 1e-9);
    }
}
