//! Training, steps and household activity around a meal.
//!
//! [`resolve_activity_context`] picks the single best situational context for
//! a meal. When none applies the day-level bonuses (workout, postprandial,
//! NEAT, steps) are summed instead by [`activity_fallback_bonus`].

use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::constants::*;
use crate::models::context::{MINUTES_PER_DAY, ZONE_COUNT};
use crate::models::{DayContext, MealNutrients, RecentTraining, Training, TrainingType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntensityType {
    Hiit,
    Moderate,
    Liss,
}

impl IntensityType {
    /// Classify by share of minutes spent in zones 3 and 4.
    pub fn classify(training: &Training) -> Self {
        let total = training.total_zone_minutes();
        let ratio = if total > 0.0 {
            training.high_zone_minutes() / total
        } else {
            0.0
        };
        if ratio >= INTENSITY_HIIT_RATIO {
            IntensityType::Hiit
        } else if ratio >= INTENSITY_MODERATE_RATIO {
            IntensityType::Moderate
        } else {
            IntensityType::Liss
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            IntensityType::Hiit => INTENSITY_HIIT_MULT,
            IntensityType::Moderate => INTENSITY_MODERATE_MULT,
            IntensityType::Liss => INTENSITY_LISS_MULT,
        }
    }
}

/// Training time span in minutes since midnight. Both ends are inclusive: a
/// meal exactly at `end` still counts as eaten during the training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingInterval {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

impl TrainingInterval {
    /// Start from the training time (noon when absent), length from the zone
    /// sum (30 minutes when every zone is empty).
    pub fn of(training: &Training) -> Self {
        let start = training
            .start_minutes()
            .unwrap_or(crate::models::context::DEFAULT_MEAL_MINUTES) as f64;
        let total = training.total_zone_minutes();
        let duration = if total > 0.0 {
            total
        } else {
            DEFAULT_TRAINING_MINUTES
        };
        Self {
            start,
            end: start + duration,
            duration,
        }
    }
}

/// Training energy from zone minutes: `Σ minutes × MET × 3.5 × weight / 200`.
pub fn training_kcal(training: &Training, weight: f64, met: &[f64; ZONE_COUNT]) -> f64 {
    let weight = if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        DEFAULT_WEIGHT_KG
    };
    let kcal: f64 = (0..ZONE_COUNT)
        .map(|i| training.zone(i) * met[i] * 3.5 * weight / 200.0)
        .sum();
    kcal.round()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextKind {
    Peri,
    Post,
    Pre,
    Steps,
    Household,
    Morning,
    Double,
}

impl ContextKind {
    pub fn priority(&self) -> u8 {
        match self {
            ContextKind::Peri => PRIORITY_PERI,
            ContextKind::Post => PRIORITY_POST,
            ContextKind::Pre => PRIORITY_PRE,
            ContextKind::Steps => PRIORITY_STEPS,
            ContextKind::Household => PRIORITY_HOUSEHOLD,
            ContextKind::Morning => PRIORITY_MORNING,
            ContextKind::Double => PRIORITY_DOUBLE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContextKind::Peri => "peri",
            ContextKind::Post => "post",
            ContextKind::Pre => "pre",
            ContextKind::Steps => "steps",
            ContextKind::Household => "household",
            ContextKind::Morning => "morning",
            ContextKind::Double => "double",
        }
    }

    pub fn is_training(&self) -> bool {
        matches!(self, ContextKind::Peri | ContextKind::Post | ContextKind::Pre)
    }
}

/// The training a context was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRef {
    pub index: usize,
    pub kind: TrainingType,
    pub intensity: IntensityType,
    pub kcal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    pub kind: ContextKind,
    pub priority: u8,
    pub wave_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityContext {
    pub kind: ContextKind,
    pub priority: u8,
    /// Additive wave-length bonus, negative shortens.
    pub wave_bonus: f64,
    /// Scale on meal harm, 1.0 is neutral.
    pub harm_multiplier: f64,
    pub badge: String,
    pub desc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainingRef>,
    /// Minutes between meal and training (after for post, before for pre).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_minutes: Option<f64>,
    /// Share of the training elapsed when a peri meal was eaten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// GL scale for simple carbs after cardio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_multiplier: Option<f64>,
    pub night_penalty_override: bool,
    pub fasted: bool,
    pub all_contexts: Vec<ContextSummary>,
}

impl ActivityContext {
    fn new(kind: ContextKind, wave_bonus: f64, harm_multiplier: f64, badge: &str, desc: String) -> Self {
        Self {
            kind,
            priority: kind.priority(),
            wave_bonus,
            harm_multiplier,
            badge: badge.to_string(),
            desc,
            training: None,
            gap_minutes: None,
            progress: None,
            simple_multiplier: None,
            night_penalty_override: false,
            fasted: false,
            all_contexts: Vec::new(),
        }
    }
}

/// Trainings that pass the validity filter, with a warning for malformed ones.
pub fn valid_trainings(context: &DayContext) -> Vec<(usize, &Training)> {
    context
        .trainings
        .iter()
        .enumerate()
        .filter(|(i, t)| {
            if t.is_malformed() {
                warn!(index = i, "malformed training entry, sanitizing");
            }
            t.is_valid()
        })
        .collect()
}

fn peri_context(meal: f64, interval: &TrainingInterval, intensity: IntensityType) -> ActivityContext {
    let mult = intensity.multiplier();
    let progress = if interval.duration > 0.0 {
        (meal - interval.start) / interval.duration
    } else {
        0.5
    };
    let wave_bonus = (PERI_BASE_BONUS * mult).max(PERI_MAX_BONUS);
    let harm = (PERI_BASE_HARM / mult).max(PERI_MIN_HARM);
    let mut ctx = ActivityContext::new(
        ContextKind::Peri,
        wave_bonus,
        harm,
        "Fuel",
        "Eaten during training, energy goes straight to muscles".to_string(),
    );
    ctx.progress = Some(progress);
    ctx
}

fn post_context(gap: f64, kcal: f64, kind: TrainingType) -> ActivityContext {
    let (tier_bonus, label) = match POST_WORKOUT_GAP.find(gap) {
        Some(tier) => (tier.value, tier.name),
        None => (POST_WORKOUT_GAP.fallback, "residual"),
    };
    let kcal_mult = POST_WORKOUT_KCAL.lookup(kcal);
    let type_mult = match kind {
        TrainingType::Cardio => POST_CARDIO_MULT,
        TrainingType::Strength => POST_STRENGTH_MULT,
        TrainingType::Hobby => POST_HOBBY_MULT,
    };
    let wave_bonus = (tier_bonus * kcal_mult * type_mult).max(POST_MAX_BONUS);
    let harm_reduction = (kcal / POST_HARM_KCAL_DIVISOR).min(POST_HARM_MAX_REDUCTION);
    let harm = (POST_BASE_HARM - harm_reduction).max(POST_MIN_HARM);
    let mut ctx = ActivityContext::new(
        ContextKind::Post,
        wave_bonus,
        harm,
        "Recovery",
        format!(
            "{} window, {} min after {} kcal {}",
            label,
            gap.round(),
            kcal.round(),
            kind.label()
        ),
    );
    ctx.gap_minutes = Some(gap);
    ctx.night_penalty_override = true;
    ctx
}

fn pre_context(gap: f64) -> Option<ActivityContext> {
    if gap > PRE_WORKOUT_WINDOW_MIN {
        return None;
    }
    let tier = PRE_WORKOUT_GAP.find(gap)?;
    let harm = if tier.name == "close" {
        PRE_WORKOUT_CLOSE_HARM
    } else {
        PRE_WORKOUT_AHEAD_HARM
    };
    let mut ctx = ActivityContext::new(
        ContextKind::Pre,
        tier.value,
        harm,
        "Pre-workout",
        format!("Eaten {} min before training, burned during the session", gap.round()),
    );
    ctx.gap_minutes = Some(gap);
    Some(ctx)
}

fn steps_context(steps: f64, meal: f64) -> Option<ActivityContext> {
    if !steps.is_finite() || steps <= 0.0 {
        return None;
    }
    let idx = STEPS_CONTEXT
        .tiers
        .iter()
        .position(|t| steps >= t.threshold)?;
    let tier = &STEPS_CONTEXT.tiers[idx];
    let evening = meal >= (STEPS_EVENING_HOUR * 60) as f64;
    let mult = if evening { STEPS_EVENING_MULT } else { 1.0 };
    Some(ActivityContext::new(
        ContextKind::Steps,
        tier.value * mult,
        STEPS_CONTEXT_HARM[idx],
        "Steps",
        format!(
            "{}k steps{}",
            (steps / 1000.0).round(),
            if evening { ", evening" } else { "" }
        ),
    ))
}

fn household_context(minutes: f64) -> Option<ActivityContext> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    let idx = HOUSEHOLD_CONTEXT
        .tiers
        .iter()
        .position(|t| minutes >= t.threshold)?;
    Some(ActivityContext::new(
        ContextKind::Household,
        HOUSEHOLD_CONTEXT.tiers[idx].value,
        HOUSEHOLD_CONTEXT_HARM[idx],
        "Household",
        format!("{} min of household activity", minutes.round()),
    ))
}

/// Best activity context for a meal, or `None` when nothing applies.
///
/// Training-relative contexts are evaluated per valid training; steps,
/// household, morning and double-training contexts come from the day.
/// The highest static priority wins and every candidate is kept in
/// `all_contexts`.
pub fn resolve_activity_context(
    nutrients: &MealNutrients,
    context: &DayContext,
    weight: f64,
    met: &[f64; ZONE_COUNT],
) -> Option<ActivityContext> {
    let meal = context.meal_minutes() as f64;
    let trainings = valid_trainings(context);
    let mut found: Vec<ActivityContext> = Vec::new();

    for (index, training) in &trainings {
        let interval = TrainingInterval::of(training);
        let intensity = IntensityType::classify(training);
        let kcal = training_kcal(training, weight, met);
        let reference = TrainingRef {
            index: *index,
            kind: training.kind,
            intensity,
            kcal,
        };

        if meal >= interval.start && meal <= interval.end {
            let mut ctx = peri_context(meal, &interval, intensity);
            ctx.training = Some(reference);
            found.push(ctx);
            continue;
        }

        if meal > interval.end {
            let gap = meal - interval.end;
            let window = (POST_BASE_WINDOW_MIN + kcal / POST_KCAL_PER_WINDOW_MIN)
                .min(POST_MAX_WINDOW_MIN * intensity.multiplier());
            if gap <= window {
                let mut ctx = post_context(gap, kcal, training.kind);
                if is_fasted_training(context, gap, interval.duration) {
                    ctx.wave_bonus = (ctx.wave_bonus * FASTED_TRAINING_MULT).max(POST_MAX_BONUS);
                    ctx.fasted = true;
                }
                ctx.training = Some(reference);
                found.push(ctx);
            }
        } else if let Some(mut ctx) = pre_context(interval.start - meal) {
            ctx.training = Some(reference);
            found.push(ctx);
        }
    }

    found.extend(steps_context(context.steps, meal));
    found.extend(household_context(context.household_minutes));

    if trainings.iter().any(|(_, t)| {
        t.start_minutes()
            .is_some_and(|m| m / 60 < MORNING_TRAINING_HOUR)
    }) {
        found.push(ActivityContext::new(
            ContextKind::Morning,
            MORNING_TRAINING_BONUS,
            1.0,
            "Morning boost",
            "Morning training speeds metabolism for the whole day".to_string(),
        ));
    }

    if trainings.len() >= 2 {
        found.push(ActivityContext::new(
            ContextKind::Double,
            DOUBLE_TRAINING_BONUS,
            1.0,
            "Double day",
            format!("{} trainings, insulin sensitivity maxed out", trainings.len()),
        ));
    }

    apply_modifiers(&mut found, nutrients, meal);

    // Stable sort keeps input order among equal priorities.
    found.sort_by(|a, b| b.priority.cmp(&a.priority));
    let summaries: Vec<ContextSummary> = found
        .iter()
        .map(|c| ContextSummary {
            kind: c.kind,
            priority: c.priority,
            wave_bonus: c.wave_bonus,
        })
        .collect();

    let mut best = found.into_iter().next()?;
    best.all_contexts = summaries;
    debug!(
        kind = best.kind.label(),
        wave_bonus = best.wave_bonus,
        harm = best.harm_multiplier,
        candidates = best.all_contexts.len(),
        "activity context resolved"
    );
    Some(best)
}

/// Whether the training ended after a fast of at least 8 hours.
fn is_fasted_training(context: &DayContext, gap: f64, duration: f64) -> bool {
    match context.hours_since_last_meal {
        Some(hours) if hours.is_finite() => {
            hours - (gap + duration) / 60.0 >= FASTED_TRAINING_HOURS
        }
        _ => false,
    }
}

/// Strength + protein, cardio + simple carbs and the late-night override.
fn apply_modifiers(found: &mut [ActivityContext], nutrients: &MealNutrients, meal: f64) {
    if nutrients.protein >= STRENGTH_PROTEIN_MIN {
        if let Some(post) = found.iter_mut().find(|c| {
            c.kind == ContextKind::Post
                && c.training.as_ref().is_some_and(|t| t.kind == TrainingType::Strength)
        }) {
            post.harm_multiplier = post.harm_multiplier.min(STRENGTH_PROTEIN_MAX_HARM);
            post.badge = "Muscle recovery".to_string();
            post.desc
                .push_str(&format!(" | {}g protein", nutrients.protein.round()));
        }
    }

    if nutrients.simple_carbs > 0.0 {
        let is_cardio = |c: &ActivityContext| {
            c.training.as_ref().is_some_and(|t| t.kind == TrainingType::Cardio)
        };
        let target = match found
            .iter()
            .position(|c| c.kind == ContextKind::Peri && is_cardio(c))
        {
            Some(i) => Some(i),
            None => found
                .iter()
                .position(|c| c.kind == ContextKind::Post && is_cardio(c)),
        };
        if let Some(i) = target {
            found[i].simple_multiplier = Some(CARDIO_SIMPLE_MULT);
            found[i].desc.push_str(" | simple carbs refuel glycogen");
        }
    }

    if meal >= (NIGHT_OVERRIDE_HOUR * 60) as f64 {
        for ctx in found.iter_mut().filter(|c| c.kind == ContextKind::Post) {
            if ctx.gap_minutes.is_some_and(|g| g <= NIGHT_OVERRIDE_WINDOW_MIN) {
                ctx.night_penalty_override = true;
                ctx.desc.push_str(" | night penalty lifted");
            }
        }
    }
}

/// Day-level activity bonuses used when no context resolves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBonuses {
    pub workout: f64,
    pub postprandial: f64,
    pub neat: f64,
    pub steps: f64,
}

impl ActivityBonuses {
    pub fn total(&self) -> f64 {
        self.workout + self.postprandial + self.neat + self.steps
    }
}

/// Workout bonus from the day's intensity minutes (high zones count 1.5×).
pub fn workout_bonus(trainings: &[&Training]) -> f64 {
    let intensity_minutes: f64 = trainings
        .iter()
        .map(|t| t.low_zone_minutes() + t.high_zone_minutes() * WORKOUT_HIGH_ZONE_WEIGHT)
        .sum();
    WORKOUT_BONUS.bonus(intensity_minutes)
}

/// Bonus for training started within two hours after the meal; the strongest
/// matching training wins.
pub fn postprandial_bonus(trainings: &[&Training], meal_minutes: u32) -> f64 {
    let meal = meal_minutes as f64;
    let day = MINUTES_PER_DAY as f64;
    let mut best = 0.0_f64;

    for training in trainings {
        let Some(start) = training.start_minutes() else {
            continue;
        };
        let mut gap = start as f64 - meal;
        if gap < 0.0 && gap.abs() > day / 2.0 {
            gap += day;
        }
        if gap <= 0.0 || gap > POSTPRANDIAL_WINDOW_MIN {
            continue;
        }

        let low = training.low_zone_minutes();
        let high = training.high_zone_minutes();
        let total = low + high;
        let raw = if high >= POSTPRANDIAL_HIGH_INTENSITY_MIN {
            POSTPRANDIAL_HIGH_INTENSITY_BONUS
        } else if total >= POSTPRANDIAL_MODERATE_MIN {
            POSTPRANDIAL_MODERATE_BONUS
        } else if total >= POSTPRANDIAL_LIGHT_MIN {
            POSTPRANDIAL_LIGHT_BONUS
        } else {
            0.0
        };
        let type_mult = match training.kind {
            TrainingType::Cardio => POSTPRANDIAL_CARDIO,
            TrainingType::Strength => POSTPRANDIAL_STRENGTH,
            TrainingType::Hobby => POSTPRANDIAL_HOBBY,
        };
        let proximity = POSTPRANDIAL_PROXIMITY.lookup(gap);
        let effort = if high > low { 1.5 } else { 1.0 };
        let kcal = total * POSTPRANDIAL_KCAL_PER_MIN * effort;
        let kcal_mult = POSTPRANDIAL_KCAL.lookup(kcal);

        let bonus = (raw * type_mult * proximity * kcal_mult).max(POSTPRANDIAL_FLOOR);
        best = best.min(bonus);
    }
    best
}

pub fn neat_bonus(household_minutes: f64) -> f64 {
    NEAT_BONUS.bonus(household_minutes)
}

pub fn steps_bonus(steps: f64) -> f64 {
    STEPS_BONUS.bonus(steps)
}

pub fn activity_fallback_bonus(context: &DayContext) -> ActivityBonuses {
    let trainings: Vec<&Training> = valid_trainings(context).into_iter().map(|(_, t)| t).collect();
    ActivityBonuses {
        workout: workout_bonus(&trainings),
        postprandial: postprandial_bonus(&trainings, context.meal_minutes()),
        neat: neat_bonus(context.household_minutes),
        steps: steps_bonus(context.steps),
    }
}

/// Next-day training effect: yesterday's heavy training keeps insulin
/// sensitivity raised for up to 48 hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextDayEffect {
    pub active: bool,
    pub tdee_boost: f64,
    pub wave_reduction: f64,
    pub peak_reduction: f64,
    pub training_kcal: f64,
    pub hours_since: f64,
    pub trainings_count: usize,
}

/// Combine the trainings of the last 48 hours: kcal summed, the most recent
/// start sets the decay and the heaviest training sets the type.
pub fn next_day_effect(recent: &[RecentTraining], bmi: Option<f64>) -> NextDayEffect {
    let in_window: Vec<&RecentTraining> = recent
        .iter()
        .filter(|t| {
            t.hours_ago.is_finite()
                && t.hours_ago >= 0.0
                && t.hours_ago < NDTE_MAX_WINDOW_HOURS
                && t.kcal.is_finite()
                && t.kcal > 0.0
        })
        .collect();
    if in_window.is_empty() {
        return NextDayEffect::default();
    }

    let kcal: f64 = in_window.iter().map(|t| t.kcal).sum();
    let hours_since = in_window
        .iter()
        .map(|t| t.hours_ago)
        .fold(f64::INFINITY, f64::min);
    let kind = in_window
        .iter()
        .max_by(|a, b| a.kcal.total_cmp(&b.kcal))
        .map(|t| t.kind)
        .unwrap_or_default();

    next_day_effect_for(kcal, hours_since, bmi.unwrap_or(22.0), kind, in_window.len())
}

pub fn next_day_effect_for(
    kcal: f64,
    hours_since: f64,
    bmi: f64,
    kind: TrainingType,
    count: usize,
) -> NextDayEffect {
    if hours_since >= NDTE_MAX_WINDOW_HOURS || kcal < NDTE_MIN_KCAL {
        return NextDayEffect::default();
    }

    let (tdee, wave, peak) = match NDTE_KCAL_TIERS.iter().find(|(min, ..)| kcal >= *min) {
        Some(&(_, tdee, wave, peak)) => (tdee, wave, peak),
        None => {
            let (min_kcal, tdee, wave, peak) = NDTE_KCAL_TIERS[NDTE_KCAL_TIERS.len() - 1];
            let ratio = kcal / min_kcal;
            (tdee * ratio, wave * ratio, peak * ratio)
        }
    };

    let bmi_mult = if bmi.is_finite() && bmi > 0.0 {
        NDTE_BMI.lookup(bmi)
    } else {
        1.0
    };
    let decay = if hours_since > 0.0 {
        NDTE_DECAY.lookup(hours_since)
    } else {
        1.0
    };
    let (type_tdee, type_wave) = match kind {
        TrainingType::Strength => NDTE_STRENGTH,
        TrainingType::Cardio => NDTE_CARDIO,
        TrainingType::Hobby => NDTE_HOBBY,
    };
    let cumulative = if count > 1 {
        (1.0 + (count - 1) as f64 * NDTE_CUMULATIVE_STEP).min(NDTE_CUMULATIVE_MAX)
    } else {
        1.0
    };

    let round3 = |v: f64| (v * 1000.0).round() / 1000.0;
    let base = bmi_mult * decay * cumulative;
    NextDayEffect {
        active: true,
        tdee_boost: round3(tdee * base * type_tdee).min(NDTE_MAX_TDEE),
        wave_reduction: round3(wave * base * type_wave).min(NDTE_MAX_WAVE),
        peak_reduction: round3(peak * base).min(NDTE_MAX_PEAK),
        training_kcal: kcal,
        hours_since: hours_since.round(),
        trainings_count: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_with(trainings: Vec<Training>, meal_time: &str) -> DayContext {
        DayContext {
            meal_time: Some(meal_time.to_string()),
            trainings,
            ..Default::default()
        }
    }

    fn resolve(ctx: &DayContext, nutrients: &MealNutrients) -> Option<ActivityContext> {
        resolve_activity_context(nutrients, ctx, DEFAULT_WEIGHT_KG, &DEFAULT_ZONE_MET)
    }

    #[test]
    fn test_intensity_classification() {
        let hiit = Training::new("10:00", [0.0, 10.0, 10.0, 5.0], TrainingType::Cardio);
        let moderate = Training::new("10:00", [10.0, 20.0, 8.0, 0.0], TrainingType::Cardio);
        let liss = Training::new("10:00", [30.0, 10.0, 0.0, 0.0], TrainingType::Cardio);
        assert_eq!(IntensityType::classify(&hiit), IntensityType::Hiit);
        assert_eq!(IntensityType::classify(&moderate), IntensityType::Moderate);
        assert_eq!(IntensityType::classify(&liss), IntensityType::Liss);
    }

    #[test]
    fn test_training_kcal_met_formula() {
        let t = Training::new("13:00", [0.0, 0.0, 30.0, 0.0], TrainingType::Strength);
        // 30 × 8 × 3.5 × 70 / 200 = 294
        assert_eq!(training_kcal(&t, 70.0, &DEFAULT_ZONE_MET), 294.0);
    }

    #[test]
    fn test_interval_defaults() {
        let t = Training {
            time: None,
            zones: vec![0.0, 0.0, 0.0, 0.0],
            kind: TrainingType::Hobby,
        };
        let interval = TrainingInterval::of(&t);
        assert_eq!(interval.start, 720.0);
        assert_eq!(interval.duration, 30.0);
    }

    #[test]
    fn test_peri_when_meal_inside_training() {
        let ctx = DayContext {
            steps: 15000.0,
            household_minutes: 120.0,
            ..day_with(
                vec![Training::new("10:00", [0.0, 20.0, 20.0, 20.0], TrainingType::Cardio)],
                "10:30",
            )
        };
        let best = resolve(&ctx, &MealNutrients::default()).unwrap();
        assert_eq!(best.kind, ContextKind::Peri);
        // HIIT: -0.60 × 2.0 capped at -0.95; harm 0.5 / 2 = 0.25
        assert!((best.wave_bonus - (-0.95)).abs() < 1e-9);
        assert!((best.harm_multiplier - 0.25).abs() < 1e-9);
        assert!(best.all_contexts.len() >= 3);
        assert!((best.progress.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_post_workout_strength_protein() {
        let ctx = day_with(
            vec![Training::new("13:00", [0.0, 0.0, 30.0, 0.0], TrainingType::Strength)],
            "14:30",
        );
        let meal = MealNutrients {
            protein: 40.0,
            ..Default::default()
        };
        let best = resolve(&ctx, &meal).unwrap();
        assert_eq!(best.kind, ContextKind::Post);
        assert!(best.wave_bonus < 0.0);
        assert!(best.harm_multiplier < 1.0);
        // gap 60 → -0.35; 294 kcal → ×1.15; strength ×1.0
        assert!((best.wave_bonus - (-0.35 * 1.15)).abs() < 1e-9);
        assert_eq!(best.badge, "Muscle recovery");
    }

    #[test]
    fn test_pre_workout_tiers() {
        let ctx = day_with(
            vec![Training::new("18:00", [10.0, 20.0, 0.0, 0.0], TrainingType::Cardio)],
            "17:30",
        );
        let best = resolve(&ctx, &MealNutrients::default()).unwrap();
        assert_eq!(best.kind, ContextKind::Pre);
        assert!((best.wave_bonus - (-0.20)).abs() < 1e-9);
        assert!((best.harm_multiplier - 0.6).abs() < 1e-9);

        let far = day_with(
            vec![Training::new("18:00", [10.0, 20.0, 0.0, 0.0], TrainingType::Cardio)],
            "15:00",
        );
        assert!(resolve(&far, &MealNutrients::default()).is_none());
    }

    #[test]
    fn test_post_type_factors() {
        // gap 20 → -0.40; 300 kcal → ×1.15
        let strength = post_context(20.0, 300.0, TrainingType::Strength);
        let cardio = post_context(20.0, 300.0, TrainingType::Cardio);
        let hobby = post_context(20.0, 300.0, TrainingType::Hobby);
        assert!((strength.wave_bonus - (-0.40 * 1.15)).abs() < 1e-9);
        assert!((cardio.wave_bonus - (-0.40 * 1.15 * 1.15)).abs() < 1e-9);
        assert!((hobby.wave_bonus - (-0.40 * 1.15 * 0.8)).abs() < 1e-9);
        assert!(strength.night_penalty_override);
        assert_eq!(strength.gap_minutes, Some(20.0));
    }

    #[test]
    fn test_post_kcal_tiers() {
        // gap 100 → -0.25, strength ×1.0
        let bonus = |kcal: f64| post_context(100.0, kcal, TrainingType::Strength).wave_bonus;
        assert!((bonus(150.0) - (-0.25)).abs() < 1e-9);
        assert!((bonus(400.0) - (-0.25 * 1.25)).abs() < 1e-9);
        assert!((bonus(700.0) - (-0.25 * 1.35)).abs() < 1e-9);
        assert!((bonus(1000.0) - (-0.25 * 1.5)).abs() < 1e-9);
        // 400 kcal lowers harm by 0.2
        let harm = post_context(100.0, 400.0, TrainingType::Strength).harm_multiplier;
        assert!((harm - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_post_bonus_floor() {
        // -0.40 × 1.5 × 1.15 = -0.69, floored
        let ctx = post_context(20.0, 1200.0, TrainingType::Cardio);
        assert!((ctx.wave_bonus - POST_MAX_BONUS).abs() < 1e-9);
        assert!((ctx.harm_multiplier - POST_MIN_HARM).abs() < 1e-9);
    }

    #[test]
    fn test_post_window_cutoff() {
        // HIIT, 294 kcal: window min(120 + 4.9, 360 × 2) = 124.9 min after 13:30
        let training = vec![Training::new("13:00", [0.0, 0.0, 30.0, 0.0], TrainingType::Strength)];
        let inside = day_with(training.clone(), "15:34");
        let best = resolve(&inside, &MealNutrients::default()).unwrap();
        assert_eq!(best.kind, ContextKind::Post);
        assert_eq!(best.gap_minutes, Some(124.0));

        let outside = day_with(training, "15:35");
        assert!(resolve(&outside, &MealNutrients::default()).is_none());
    }

    #[test]
    fn test_post_window_capped_by_intensity() {
        // LISS at a huge weight: 120 + kcal / 60 exceeds the 360 × 1.0 cap
        let ctx = |meal: &str| {
            day_with(
                vec![Training::new("13:00", [60.0, 0.0, 0.0, 0.0], TrainingType::Strength)],
                meal,
            )
        };
        let heavy = 10000.0;
        let inside = resolve_activity_context(&MealNutrients::default(), &ctx("19:55"), heavy, &DEFAULT_ZONE_MET)
            .unwrap();
        assert_eq!(inside.kind, ContextKind::Post);
        assert_eq!(inside.gap_minutes, Some(355.0));

        let outside =
            resolve_activity_context(&MealNutrients::default(), &ctx("20:05"), heavy, &DEFAULT_ZONE_MET);
        assert!(outside.is_none());
    }

    #[test]
    fn test_meal_at_training_end_is_peri() {
        let ctx = day_with(
            vec![Training::new("13:00", [0.0, 0.0, 30.0, 0.0], TrainingType::Strength)],
            "13:30",
        );
        let best = resolve(&ctx, &MealNutrients::default()).unwrap();
        assert_eq!(best.kind, ContextKind::Peri);
        assert!((best.progress.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_training_day() {
        let ctx = day_with(
            vec![
                Training::new("13:00", [20.0, 10.0, 0.0, 0.0], TrainingType::Hobby),
                Training::new("18:00", [30.0, 0.0, 0.0, 0.0], TrainingType::Cardio),
            ],
            "16:00",
        );
        let best = resolve(&ctx, &MealNutrients::default()).unwrap();
        assert_eq!(best.kind, ContextKind::Double);
        assert_eq!(best.priority, PRIORITY_DOUBLE);
        assert!((best.wave_bonus - DOUBLE_TRAINING_BONUS).abs() < 1e-9);
        assert_eq!(best.all_contexts.len(), 1);

        let single = day_with(
            vec![Training::new("13:00", [20.0, 10.0, 0.0, 0.0], TrainingType::Hobby)],
            "16:00",
        );
        assert!(resolve(&single, &MealNutrients::default()).is_none());
    }

    #[test]
    fn test_steps_evening_boost() {
        let ctx = DayContext {
            meal_time: Some("19:00".to_string()),
            steps: 10500.0,
            ..Default::default()
        };
        let best = resolve(&ctx, &MealNutrients::default()).unwrap();
        assert_eq!(best.kind, ContextKind::Steps);
        assert!((best.wave_bonus - (-0.13)).abs() < 1e-9);
        assert!((best.harm_multiplier - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_household_beats_morning() {
        let ctx = DayContext {
            meal_time: Some("20:00".to_string()),
            household_minutes: 65.0,
            trainings: vec![Training::new("07:00", [20.0, 10.0, 0.0, 0.0], TrainingType::Hobby)],
            ..Default::default()
        };
        let best = resolve(&ctx, &MealNutrients::default()).unwrap();
        assert_eq!(best.kind, ContextKind::Household);
        assert!(best.all_contexts.iter().any(|c| c.kind == ContextKind::Morning));
    }

    #[test]
    fn test_invalid_trainings_ignored() {
        let ctx = day_with(vec![Training::default(), Training::default()], "12:00");
        assert!(resolve(&ctx, &MealNutrients::default()).is_none());
    }

    #[test]
    fn test_cardio_simple_carbs_flag() {
        let ctx = day_with(
            vec![Training::new("11:00", [0.0, 40.0, 10.0, 0.0], TrainingType::Cardio)],
            "12:00",
        );
        let meal = MealNutrients {
            carbs: 40.0,
            simple_carbs: 30.0,
            ..Default::default()
        };
        let best = resolve(&ctx, &meal).unwrap();
        assert_eq!(best.kind, ContextKind::Post);
        assert_eq!(best.simple_multiplier, Some(CARDIO_SIMPLE_MULT));
    }

    #[test]
    fn test_fasted_training_amplifies_post() {
        let training = Training::new("07:00", [0.0, 30.0, 0.0, 0.0], TrainingType::Strength);
        let fed = day_with(vec![training.clone()], "07:45");
        let fasted = DayContext {
            hours_since_last_meal: Some(12.0),
            ..day_with(vec![training], "07:45")
        };
        let a = resolve(&fed, &MealNutrients::default()).unwrap();
        let b = resolve(&fasted, &MealNutrients::default()).unwrap();
        assert!(b.fasted);
        assert!(b.wave_bonus < a.wave_bonus);
    }

    #[test]
    fn test_fallback_bonuses() {
        let ctx = DayContext {
            meal_time: Some("12:00".to_string()),
            trainings: vec![Training::new("13:00", [0.0, 10.0, 30.0, 0.0], TrainingType::Cardio)],
            household_minutes: 40.0,
            steps: 6000.0,
            ..Default::default()
        };
        let b = activity_fallback_bonus(&ctx);
        // 10 + 30 × 1.5 = 55 intensity minutes
        assert!((b.workout - (-0.15)).abs() < 1e-9);
        // high ≥ 30: -0.50 × cardio 1.3 × proximity 1.0 × kcal 1.25, floored at -0.85
        assert!((b.postprandial - (-0.8125)).abs() < 1e-9);
        assert!((b.neat - (-0.05)).abs() < 1e-9);
        assert!((b.steps - (-0.04)).abs() < 1e-9);
    }

    #[test]
    fn test_next_day_effect() {
        let inactive = next_day_effect_for(150.0, 10.0, 22.0, TrainingType::Cardio, 1);
        assert!(!inactive.active);

        let e = next_day_effect_for(600.0, 20.0, 27.0, TrainingType::Cardio, 1);
        assert!(e.active);
        // 0.15 × 1.4 × 0.8 × 1.1
        assert!((e.wave_reduction - 0.185).abs() < 1e-9);
        assert!((e.peak_reduction - 0.224).abs() < 1e-9);

        let light = next_day_effect_for(250.0, 6.0, 22.0, TrainingType::Cardio, 1);
        assert!((light.wave_reduction - 0.073).abs() < 1e-9);
    }

    #[test]
    fn test_next_day_effect_aggregates_recent() {
        let recent = vec![
            RecentTraining {
                hours_ago: 20.0,
                kcal: 400.0,
                kind: TrainingType::Strength,
            },
            RecentTraining {
                hours_ago: 60.0,
                kcal: 900.0,
                kind: TrainingType::Cardio,
            },
        ];
        let e = next_day_effect(&recent, None);
        assert!(e.active);
        assert_eq!(e.trainings_count, 1);
        assert_eq!(e.training_kcal, 400.0);
    }
}
