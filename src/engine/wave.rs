use std::borrow::Cow;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::engine::activity::{
    ContextKind, activity_fallback_bonus, next_day_effect, resolve_activity_context,
};
use crate::engine::auc::analyze_auc;
use crate::engine::constants::*;
use crate::engine::day::{day_factors, personal_baseline};
use crate::engine::food::{
    effective_gl, food_bonuses, insulinogenic_bonus, insulin_index, nutrient_multiplier,
};
use crate::engine::ir_score::ir_score;
use crate::engine::phases::{hypoglycemia_risk, wave_phases};
use crate::engine::predictor::predict;
use crate::engine::scoring::{ScoreContext, ScorePeriod, score_wave};
use crate::engine::shape::{component_params, generate_curve};
use crate::models::context::{MINUTES_PER_DAY, ZONE_COUNT};
use crate::models::{
    DayContext, MealNutrients, MultiplierBreakdown, Profile, WaveResult, format_hhmm,
};

/// Tunable knobs of the wave computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveConfig {
    /// Curve resolution; the curve has `sample_points + 1` samples.
    pub sample_points: usize,
    pub normalize_to_one: bool,
    pub baseline_level: f64,
    /// Wave length the duration score and scored AUC are measured against.
    pub target_minutes: f64,
    /// MET per heart-rate zone, unless the day overrides them.
    pub met_values: [f64; ZONE_COUNT],
    pub min_wave_minutes: f64,
    /// Peak increase per unit of IR score above 1.0.
    pub ir_peak_weight: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            sample_points: CURVE_SAMPLE_POINTS,
            normalize_to_one: true,
            baseline_level: CURVE_BASELINE,
            target_minutes: DEFAULT_WAVE_MINUTES,
            met_values: DEFAULT_ZONE_MET,
            min_wave_minutes: MIN_WAVE_MINUTES,
            ir_peak_weight: IR_PEAK_WEIGHT,
        }
    }
}

/// Wave-length factor from the fast/slow balance: spikes clear sooner.
pub fn kinetics_factor(fast_contribution: f64) -> f64 {
    (1.0 - KINETICS_SLOPE * (fast_contribution - 0.5)).clamp(KINETICS_MIN, KINETICS_MAX)
}

/// Inputs of the relative peak-height estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakInputs {
    pub gl_multiplier: f64,
    pub is_liquid: bool,
    pub insulin_index_peak: f64,
    pub temperature_peak: f64,
    pub large_portion_peak: f64,
    pub next_day_reduction: f64,
    pub ir_score: f64,
}

/// Relative peak insulin, clamped to `[0, 1.5]` and rounded to two decimals.
pub fn peak_estimate(inputs: &PeakInputs, ir_peak_weight: f64) -> f64 {
    let liquid = if inputs.is_liquid { LIQUID_PEAK_MULT } else { 1.0 };
    let ir = 1.0 + ir_peak_weight * (inputs.ir_score - 1.0).max(0.0);
    let peak = inputs.gl_multiplier / GL_CONTINUOUS_MAX
        * liquid
        * inputs.insulin_index_peak
        * inputs.temperature_peak
        * inputs.large_portion_peak
        * (1.0 - inputs.next_day_reduction)
        * ir;
    if !peak.is_finite() {
        return 1.0;
    }
    (peak.clamp(0.0, PEAK_ESTIMATE_MAX) * 100.0).round() / 100.0
}

/// Compute the insulin wave of a meal with the default configuration.
pub fn compute_insulin_wave(
    nutrients: &MealNutrients,
    context: &DayContext,
    profile: &Profile,
) -> WaveResult {
    compute_insulin_wave_with(nutrients, context, profile, &WaveConfig::default())
}

/// Compute the insulin wave of a meal.
///
/// Pure and deterministic: identical inputs give identical results. Invalid
/// input degrades to neutral defaults with a warning.
pub fn compute_insulin_wave_with(
    nutrients: &MealNutrients,
    context: &DayContext,
    profile: &Profile,
    config: &WaveConfig,
) -> WaveResult {
    if !nutrients.is_valid() {
        warn!(meal = %nutrients.debug_string(), "meal nutrients out of range, negatives treated as zero");
    }

    let weight = profile
        .weight
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(DEFAULT_WEIGHT_KG);
    let met = context.met_override.unwrap_or(config.met_values);
    let meal_minutes = context.meal_minutes();

    let baseline = personal_baseline(profile);
    let day = day_factors(context, profile);
    let ir = ir_score(profile, context);
    let activity = resolve_activity_context(nutrients, context, weight, &met);

    // Glycogen refuelling after cardio takes part of the simple-carb load
    let nutrients: Cow<MealNutrients> = match activity.as_ref().and_then(|a| a.simple_multiplier) {
        Some(mult) => Cow::Owned(MealNutrients {
            gl: Some(effective_gl(nutrients) * mult),
            ..nutrients.clone()
        }),
        None => Cow::Borrowed(nutrients),
    };
    let nutrients = nutrients.as_ref();

    let nutrient = nutrient_multiplier(nutrients);
    let food = food_bonuses(nutrients);
    let activity_fallback = match activity {
        Some(_) => None,
        None => Some(activity_fallback_bonus(context)),
    };
    let activity_bonus = match (&activity, &activity_fallback) {
        (Some(ctx), _) => ctx.wave_bonus,
        (None, Some(fallback)) => fallback.total(),
        (None, None) => 0.0,
    };
    let next_day = next_day_effect(&context.recent_trainings, profile.bmi());

    let bonus_sum = day.personal_sum()
        + food.sum()
        + activity_bonus
        + day.fasting
        + day.cold_exposure
        + day.stacking.bonus
        - next_day.wave_reduction;
    let bonus_factor = (1.0 + bonus_sum).max(BONUS_FACTOR_FLOOR);

    let params = component_params(nutrients, ir.excess());
    let fast_contribution = params.fast_contribution();
    let kinetics = kinetics_factor(fast_contribution);

    let night_override = activity.as_ref().is_some_and(|a| a.night_penalty_override);
    let circadian = if night_override {
        day.circadian.multiplier.min(NIGHT_OVERRIDE_CIRCADIAN_CAP)
    } else {
        day.circadian.multiplier
    };

    let spicy = food.spicy_multiplier;
    let total = nutrient.total * circadian * spicy * kinetics * bonus_factor;
    let base_minutes = baseline.base_hours * 60.0;
    let raw_minutes = base_minutes * total;
    let wave_minutes = if raw_minutes.is_finite() {
        raw_minutes.round().max(config.min_wave_minutes)
    } else {
        warn!(raw_minutes, "wave length not finite, using the default");
        config.target_minutes
    };
    trace!(base_minutes, total, bonus_sum, kinetics, "wave composition");

    let curve = generate_curve(
        &params,
        wave_minutes,
        config.sample_points,
        config.baseline_level,
        config.normalize_to_one,
    );
    let auc = analyze_auc(&curve.points, config.baseline_level);

    let peak_value = peak_estimate(
        &PeakInputs {
            gl_multiplier: nutrient.gl_multiplier,
            is_liquid: nutrients.is_liquid,
            insulin_index_peak: insulin_index(nutrients.insulinogenic).peak_multiplier,
            temperature_peak: food.temperature_peak,
            large_portion_peak: food.large_portion_peak,
            next_day_reduction: next_day.peak_reduction,
            ir_score: ir.score,
        },
        config.ir_peak_weight,
    );
    let scored_auc = if config.target_minutes > 0.0 {
        auc.total * peak_value * wave_minutes / config.target_minutes
    } else {
        auc.total * peak_value
    };
    let scored_auc = (scored_auc * 1000.0).round() / 1000.0;

    let has_activity = activity.is_some()
        || activity_fallback.as_ref().is_some_and(|f| f.total() < 0.0);
    let phases = wave_phases(wave_minutes, nutrients, has_activity);
    let hypoglycemia = hypoglycemia_risk(nutrients, context.hours_since_last_meal);
    let prediction = predict(&curve.points);

    let score_context = ScoreContext {
        has_training: activity.as_ref().is_some_and(|a| a.kind.is_training()),
        is_post_workout: activity
            .as_ref()
            .is_some_and(|a| a.kind == ContextKind::Post),
        period: ScorePeriod::from(day.circadian.period),
        meal_gap_minutes: context
            .hours_since_last_meal
            .filter(|h| h.is_finite() && *h >= 0.0)
            .map(|h| h * 60.0),
        night_penalty_override: night_override,
    };
    let score = score_wave(
        peak_value,
        wave_minutes,
        curve.shape,
        fast_contribution,
        scored_auc,
        &score_context,
    );

    debug!(
        wave_minutes,
        peak_value,
        shape = curve.shape.label(),
        score = score.score,
        context = activity.as_ref().map(|a| a.kind.label()).unwrap_or("none"),
        "insulin wave computed"
    );

    let whole_minutes = wave_minutes as u32;
    WaveResult {
        wave_minutes: whole_minutes,
        wave_hours: (wave_minutes / 60.0 * 100.0).round() / 100.0,
        start_time: format_hhmm(meal_minutes),
        end_time: format_hhmm((meal_minutes + whole_minutes) % MINUTES_PER_DAY),
        peak_time: curve.peak_time,
        peak_value,
        shape: curve.shape,
        fast_contribution: (fast_contribution * 1000.0).round() / 1000.0,
        auc,
        scored_auc,
        score: score.score,
        score_level: score.level,
        score_components: score.components,
        recommendations: score.recommendations,
        multipliers: MultiplierBreakdown {
            baseline,
            base_minutes,
            nutrient,
            food,
            day,
            activity: activity_bonus,
            activity_fallback,
            next_day_reduction: next_day.wave_reduction,
            insulinogenic: insulinogenic_bonus(nutrients.insulinogenic),
            bonus_sum,
            bonus_factor,
            circadian,
            spicy,
            kinetics,
            total,
        },
        phases,
        activity,
        ir,
        next_day,
        prediction,
        hypoglycemia,
        params,
        curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Training, TrainingType};

    fn rice_bowl() -> MealNutrients {
        MealNutrients {
            carbs: 60.0,
            simple_carbs: 5.0,
            complex_carbs: 55.0,
            protein: 12.0,
            fat: 8.0,
            fiber: 3.0,
            gi: 70.0,
            kcal: 360.0,
            ..Default::default()
        }
    }

    fn at(meal_time: &str) -> DayContext {
        DayContext {
            meal_time: Some(meal_time.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_kinetics_factor_bounds() {
        assert!((kinetics_factor(0.5) - 1.0).abs() < 1e-12);
        assert!((kinetics_factor(1.0) - KINETICS_MIN).abs() < 1e-12);
        assert!((kinetics_factor(0.0) - KINETICS_MAX).abs() < 1e-12);
    }

    #[test]
    fn test_peak_estimate() {
        let reference = PeakInputs {
            gl_multiplier: GL_CONTINUOUS_MAX,
            is_liquid: false,
            insulin_index_peak: 1.0,
            temperature_peak: 1.0,
            large_portion_peak: 1.0,
            next_day_reduction: 0.0,
            ir_score: 1.0,
        };
        assert_eq!(peak_estimate(&reference, IR_PEAK_WEIGHT), 1.0);

        let liquid = PeakInputs {
            is_liquid: true,
            ..reference
        };
        assert_eq!(peak_estimate(&liquid, IR_PEAK_WEIGHT), 1.35);

        let resistant = PeakInputs {
            ir_score: 3.0,
            ..liquid
        };
        assert_eq!(peak_estimate(&resistant, IR_PEAK_WEIGHT), PEAK_ESTIMATE_MAX);

        let trained = PeakInputs {
            next_day_reduction: 0.5,
            ..reference
        };
        assert_eq!(peak_estimate(&trained, IR_PEAK_WEIGHT), 0.5);
    }

    #[test]
    fn test_wave_deterministic() {
        let ctx = at("13:00");
        let profile = Profile::default();
        let a = compute_insulin_wave(&rice_bowl(), &ctx, &profile);
        let b = compute_insulin_wave(&rice_bowl(), &ctx, &profile);
        assert_eq!(a, b);
    }

    #[test]
    fn test_wave_result_invariants() {
        let r = compute_insulin_wave(&rice_bowl(), &at("13:00"), &Profile::default());
        assert!(r.wave_minutes >= MIN_WAVE_MINUTES as u32);
        assert!((0.0..=PEAK_ESTIMATE_MAX).contains(&r.peak_value));
        assert!(r.score <= 100);
        assert_eq!(r.curve.len(), CURVE_SAMPLE_POINTS + 1);
        assert_eq!(r.start_time, "13:00");
        assert!(r.peak_time <= f64::from(r.wave_minutes));
        assert!(r.multipliers.bonus_factor >= BONUS_FACTOR_FLOOR);
        assert!(r.activity.is_none());
        assert!(r.multipliers.activity_fallback.is_some());
    }

    #[test]
    fn test_evening_wave_longer() {
        let morning = compute_insulin_wave(&rice_bowl(), &at("08:00"), &Profile::default());
        let evening = compute_insulin_wave(&rice_bowl(), &at("20:00"), &Profile::default());
        assert!(evening.wave_minutes > morning.wave_minutes);
        assert!(evening.multipliers.circadian > morning.multipliers.circadian);
    }

    #[test]
    fn test_end_time_wraps_midnight() {
        let r = compute_insulin_wave(&rice_bowl(), &at("23:30"), &Profile::default());
        let expected = format_hhmm((23 * 60 + 30 + r.wave_minutes) % MINUTES_PER_DAY);
        assert_eq!(r.end_time, expected);
        assert!(r.end_time < r.start_time);
    }

    #[test]
    fn test_post_workout_shortens_wave() {
        let rest = at("14:30");
        let trained = DayContext {
            trainings: vec![Training::new("13:00", [0.0, 0.0, 30.0, 0.0], TrainingType::Strength)],
            ..at("14:30")
        };
        let a = compute_insulin_wave(&rice_bowl(), &rest, &Profile::default());
        let b = compute_insulin_wave(&rice_bowl(), &trained, &Profile::default());
        assert!(b.wave_minutes < a.wave_minutes);
        assert!(b.has_training_context());
        assert!(b.multipliers.activity_fallback.is_none());
    }

    #[test]
    fn test_night_override_caps_circadian() {
        let ctx = DayContext {
            trainings: vec![Training::new("21:30", [0.0, 30.0, 0.0, 0.0], TrainingType::Cardio)],
            ..at("22:30")
        };
        let r = compute_insulin_wave(&rice_bowl(), &ctx, &Profile::default());
        assert!(r.activity.as_ref().is_some_and(|a| a.night_penalty_override));
        assert!(r.multipliers.circadian <= NIGHT_OVERRIDE_CIRCADIAN_CAP);
        assert!(r.multipliers.day.circadian.multiplier > NIGHT_OVERRIDE_CIRCADIAN_CAP);
    }

    #[test]
    fn test_cardio_simple_carbs_lower_gl() {
        let sweet = MealNutrients {
            carbs: 50.0,
            simple_carbs: 40.0,
            complex_carbs: 10.0,
            gi: 80.0,
            ..Default::default()
        };
        let ctx = DayContext {
            trainings: vec![Training::new("11:00", [0.0, 40.0, 10.0, 0.0], TrainingType::Cardio)],
            ..at("12:00")
        };
        let r = compute_insulin_wave(&sweet, &ctx, &Profile::default());
        let raw_gl = effective_gl(&sweet);
        assert!((r.multipliers.nutrient.gl - raw_gl * CARDIO_SIMPLE_MULT).abs() < 0.01);
    }

    #[test]
    fn test_invalid_nutrients_degrade() {
        let broken = MealNutrients {
            carbs: -10.0,
            protein: f64::NAN,
            ..Default::default()
        };
        let r = compute_insulin_wave(&broken, &at("12:00"), &Profile::default());
        assert!(r.wave_minutes >= MIN_WAVE_MINUTES as u32);
        assert!(r.peak_value.is_finite());
        assert!(r.auc.total.is_finite());
    }

    #[test]
    fn test_custom_config_resolution() {
        let config = WaveConfig {
            sample_points: 20,
            ..Default::default()
        };
        let r = compute_insulin_wave_with(&rice_bowl(), &at("12:00"), &Profile::default(), &config);
        assert_eq!(r.curve.len(), 21);
    }
}
