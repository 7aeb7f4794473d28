use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::engine::tiers::{Comparison, FactorId, TierTable, tier_table};

// ─────────────────────────────────────────────────────────────────────────────
// Glycemic index and load
// ─────────────────────────────────────────────────────────────────────────────

/// GI category wave multiplier (low ≤35, medium ≤55, high ≤70, very high).
pub static GI_CATEGORIES: TierTable = tier_table!(
    FactorId::GiCategory,
    Comparison::AtMost,
    fallback: 1.2,
    [(35.0, 0.85, "low"), (55.0, 1.0, "medium"), (70.0, 1.1, "high")]
);

/// Name of the GI category above the last tier.
pub const GI_VERY_HIGH: &str = "veryHigh";

/// Stepped GL categories; the continuous curve below is what the engine uses.
pub static GL_CATEGORIES: TierTable = tier_table!(
    FactorId::GlCategory,
    Comparison::Below,
    fallback: 1.25,
    [
        (2.0, 0.25, "micro"),
        (5.0, 0.40, "veryLow"),
        (10.0, 0.55, "low"),
        (20.0, 1.0, "medium"),
        (30.0, 1.15, "high"),
    ]
);

/// GL at which the continuous multiplier saturates.
pub const GL_CONTINUOUS_MAX_GL: f64 = 40.0;
pub const GL_CONTINUOUS_MIN: f64 = 0.15;
pub const GL_CONTINUOUS_MAX: f64 = 1.30;
/// Power-curve exponent: fast growth at low GL, flattening near the cap.
pub const GL_CONTINUOUS_EXPONENT: f64 = 0.6;

/// GI only matters from this GL upward.
pub const GI_BLEND_MIN_GL: f64 = 7.0;
/// Full GI effect from this GL upward; also where nutrient bonuses stop scaling.
pub const GI_BLEND_FULL_GL: f64 = 20.0;
/// Floor of the GL scale factor applied to nutrient bonuses.
pub const GL_SCALE_MIN: f64 = 0.25;

/// Carbs below this give a minimal wave.
pub const CARBS_MIN_THRESHOLD: f64 = 5.0;
/// Carbs from which the wave is full length.
pub const CARBS_FULL_THRESHOLD: f64 = 30.0;
pub const CARBS_MIN_MULTIPLIER: f64 = 0.25;

// ─────────────────────────────────────────────────────────────────────────────
// Macronutrients
// ─────────────────────────────────────────────────────────────────────────────

/// Base protein bonus before the protein-type multiplier.
pub static PROTEIN_BONUS: TierTable = tier_table!(
    FactorId::ProteinBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(50.0, 0.07, "veryHigh"), (35.0, 0.05, "high"), (20.0, 0.03, "medium")]
);

pub const PROTEIN_MULT_ANIMAL: f64 = 1.8;
pub const PROTEIN_MULT_PLANT: f64 = 1.3;
pub const PROTEIN_MULT_WHEY: f64 = 2.0;
pub const PROTEIN_MULT_MIXED: f64 = 1.5;

/// Fiber shortens the wave.
pub static FIBER_BONUS: TierTable = tier_table!(
    FactorId::FiberBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(15.0, -0.20, "veryHigh"), (10.0, -0.15, "high"), (5.0, -0.08, "medium")]
);

/// Fat slows gastric emptying.
pub static FAT_BONUS: TierTable = tier_table!(
    FactorId::FatBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(25.0, 0.15, "high"), (15.0, 0.10, "medium"), (8.0, 0.05, "low")]
);

pub static TRANS_FAT_BONUS: TierTable = tier_table!(
    FactorId::TransFat,
    Comparison::AtLeast,
    fallback: 0.0,
    [(2.0, 0.15, "high"), (1.0, 0.08, "medium"), (0.5, 0.04, "low")]
);

// ─────────────────────────────────────────────────────────────────────────────
// Food form and composition
// ─────────────────────────────────────────────────────────────────────────────

/// Liquid meals: shorter wave, higher peak.
pub const LIQUID_WAVE_MULT: f64 = 0.75;
pub const LIQUID_PEAK_MULT: f64 = 1.35;
/// Liquid grams over total grams above which a meal counts as liquid.
pub const LIQUID_RATIO_THRESHOLD: f64 = 0.5;

pub const FOOD_FORM_LIQUID: f64 = 1.30;
pub const FOOD_FORM_PROCESSED: f64 = 1.15;
pub const FOOD_FORM_WHOLE: f64 = 0.85;

/// Insulin index factors: (GL boost, peak multiplier, wave multiplier).
pub const II_LIQUID_DAIRY: (f64, f64, f64) = (1.5, 1.35, 0.85);
pub const II_SOFT_DAIRY: (f64, f64, f64) = (1.3, 1.25, 0.90);
pub const II_HARD_DAIRY: (f64, f64, f64) = (1.1, 1.10, 0.95);
pub const II_PURE_PROTEIN: (f64, f64, f64) = (1.2, 1.15, 0.92);
pub const II_HIGH_FIBER: (f64, f64, f64) = (0.8, 0.85, 1.10);
/// Maximum extra GL from the insulin index, as a fraction of the base GL.
pub const II_MAX_GL_BOOST: f64 = 2.0;
/// Below this GL the boost factor is capped at `II_LOW_GL_BOOST_CAP`.
pub const II_LOW_GL: f64 = 3.0;
pub const II_LOW_GL_BOOST_CAP: f64 = 1.5;

/// Legacy insulinogenic bonuses, kept for the breakdown display.
pub const INSULINOGENIC_LIQUID_DAIRY: f64 = 0.15;
pub const INSULINOGENIC_SOFT_DAIRY: f64 = 0.10;
pub const INSULINOGENIC_HARD_DAIRY: f64 = 0.05;
pub const INSULINOGENIC_PROTEIN: f64 = 0.08;

pub const ALCOHOL_STRONG: f64 = 0.25;
pub const ALCOHOL_MEDIUM: f64 = 0.18;
pub const ALCOHOL_WEAK: f64 = 0.10;

pub const CAFFEINE_BONUS: f64 = 0.06;
/// Spicy food speeds metabolism by about 4%.
pub const SPICY_MULTIPLIER: f64 = 0.96;
/// Cooled starches turn partly resistant.
pub const RESISTANT_STARCH_BONUS: f64 = -0.15;

pub const MEAL_ORDER_CARBS_LAST: f64 = -0.25;
pub const MEAL_ORDER_CARBS_FIRST: f64 = 0.10;

/// Temperature: (wave bonus, peak multiplier).
pub const TEMPERATURE_HOT: (f64, f64) = (0.08, 1.15);
pub const TEMPERATURE_COLD: (f64, f64) = (-0.05, 0.90);
pub const TEMPERATURE_ROOM: (f64, f64) = (0.0, 1.0);

/// Large portions: wave bonus by kcal.
pub static LARGE_PORTION_BONUS: TierTable = tier_table!(
    FactorId::LargePortion,
    Comparison::AtLeast,
    fallback: 0.0,
    [
        (1200.0, 0.25, "huge"),
        (1000.0, 0.18, "veryLarge"),
        (800.0, 0.10, "large"),
        (600.0, 0.05, "medium"),
    ]
);

/// Large portions: peak multiplier by kcal (slower emptying flattens the peak).
pub static LARGE_PORTION_PEAK: TierTable = tier_table!(
    FactorId::LargePortionPeak,
    Comparison::AtLeast,
    fallback: 1.0,
    [(1200.0, 0.80, "huge"), (1000.0, 0.85, "veryLarge"), (800.0, 0.90, "large"), (600.0, 0.95, "medium")]
);

pub const LARGE_PORTION_MAX_BONUS: f64 = 0.30;

pub const SUPPLEMENT_VINEGAR: f64 = -0.20;
pub const SUPPLEMENT_CINNAMON: f64 = -0.10;
pub const SUPPLEMENT_BERBERINE: f64 = -0.15;

// ─────────────────────────────────────────────────────────────────────────────
// Personal baseline and meal stacking
// ─────────────────────────────────────────────────────────────────────────────

pub const BASELINE_WAVE_HOURS: f64 = 3.0;
pub const BASELINE_MIN_HOURS: f64 = 1.5;
pub const BASELINE_MAX_HOURS: f64 = 4.5;
pub const BASELINE_AGE_START: f64 = 30.0;
pub const BASELINE_AGE_PER_YEAR: f64 = 0.004;
pub const BASELINE_BMI_START: f64 = 25.0;
pub const BASELINE_BMI_PER_UNIT: f64 = 0.015;
/// Low BMI counts at half strength, capped.
pub const BASELINE_LOW_BMI_FACTOR: f64 = 0.5;
pub const BASELINE_LOW_BMI_CAP: f64 = -0.10;
pub const BASELINE_FEMALE: f64 = -0.05;
pub const BASELINE_MALE: f64 = 0.03;

/// Second-meal effect: an overlapping previous wave shortens the new one.
pub const STACKING_MAX_BONUS: f64 = -0.15;
pub const STACKING_DECAY_RATE: f64 = 0.5;
pub const STACKING_OVERLAP_SCALE: f64 = 90.0;
pub const STACKING_GL_DIVISOR: f64 = 30.0;
pub const STACKING_GL_FACTOR_CAP: f64 = 1.2;
/// Stacking below this counts as significant.
pub const STACKING_SIGNIFICANT: f64 = -0.03;

// ─────────────────────────────────────────────────────────────────────────────
// Wave phases
// ─────────────────────────────────────────────────────────────────────────────

pub const PHASE_RISE_BASE_MIN: f64 = 20.0;
/// Extra rise minutes per full 5 g of fiber.
pub const PHASE_RISE_FIBER_MIN: f64 = 3.0;
pub const PHASE_RISE_LIQUID_MULT: f64 = 0.6;
pub const PHASE_RISE_MIN: f64 = 10.0;
pub const PHASE_RISE_MAX: f64 = 45.0;
pub const PHASE_PLATEAU_BASE_PCT: f64 = 0.35;
/// Per full 20 g of protein.
pub const PHASE_PLATEAU_PROTEIN_PCT: f64 = 0.05;
/// Per full 15 g of fat.
pub const PHASE_PLATEAU_FAT_PCT: f64 = 0.08;
pub const PHASE_PLATEAU_MAX_PCT: f64 = 0.55;
pub const PHASE_DECLINE_ACTIVITY: f64 = -0.15;
pub const PHASE_DECLINE_MIN: f64 = 20.0;

// ─────────────────────────────────────────────────────────────────────────────
// Activity
// ─────────────────────────────────────────────────────────────────────────────

/// Day workout bonus by intensity minutes (low zones + 1.5 × high zones).
pub static WORKOUT_BONUS: TierTable = tier_table!(
    FactorId::WorkoutBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(45.0, -0.15, "high"), (20.0, -0.08, "medium")]
);
pub const WORKOUT_HIGH_ZONE_WEIGHT: f64 = 1.5;

/// Training started after the meal, within this many minutes.
pub const POSTPRANDIAL_WINDOW_MIN: f64 = 120.0;
pub const POSTPRANDIAL_HIGH_INTENSITY_MIN: f64 = 30.0;
pub const POSTPRANDIAL_HIGH_INTENSITY_BONUS: f64 = -0.50;
pub const POSTPRANDIAL_MODERATE_MIN: f64 = 20.0;
pub const POSTPRANDIAL_MODERATE_BONUS: f64 = -0.35;
pub const POSTPRANDIAL_LIGHT_MIN: f64 = 15.0;
pub const POSTPRANDIAL_LIGHT_BONUS: f64 = -0.20;
pub const POSTPRANDIAL_CARDIO: f64 = 1.3;
pub const POSTPRANDIAL_STRENGTH: f64 = 1.0;
pub const POSTPRANDIAL_HOBBY: f64 = 0.8;
pub const POSTPRANDIAL_FLOOR: f64 = -0.85;

/// Multiplier by minutes between meal and training start.
pub static POSTPRANDIAL_PROXIMITY: TierTable = tier_table!(
    FactorId::PostprandialProximity,
    Comparison::AtMost,
    fallback: 0.7,
    [(15.0, 1.5, "immediate"), (30.0, 1.3, "soon"), (60.0, 1.0, "within hour")]
);

/// Multiplier by estimated training kcal.
pub static POSTPRANDIAL_KCAL: TierTable = tier_table!(
    FactorId::PostprandialKcal,
    Comparison::AtLeast,
    fallback: 1.0,
    [(500.0, 1.5, "high"), (300.0, 1.25, "medium")]
);
/// Rough kcal per zone minute for a 70 kg person.
pub const POSTPRANDIAL_KCAL_PER_MIN: f64 = 5.0;

pub static NEAT_BONUS: TierTable = tier_table!(
    FactorId::NeatBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(60.0, -0.10, "high"), (30.0, -0.05, "medium"), (15.0, -0.02, "low")]
);

pub static STEPS_BONUS: TierTable = tier_table!(
    FactorId::StepsBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(8000.0, -0.08, "high"), (5000.0, -0.04, "medium"), (2000.0, -0.02, "low")]
);

/// Default MET per heart-rate zone.
pub const DEFAULT_ZONE_MET: [f64; 4] = [2.5, 6.0, 8.0, 10.0];
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

// ─────────────────────────────────────────────────────────────────────────────
// Activity context (training proximity)
// ─────────────────────────────────────────────────────────────────────────────

pub const INTENSITY_HIIT_RATIO: f64 = 0.5;
pub const INTENSITY_MODERATE_RATIO: f64 = 0.2;
pub const INTENSITY_HIIT_MULT: f64 = 2.0;
pub const INTENSITY_MODERATE_MULT: f64 = 1.5;
pub const INTENSITY_LISS_MULT: f64 = 1.0;

/// Duration assumed for a timed training with no zone minutes.
pub const DEFAULT_TRAINING_MINUTES: f64 = 30.0;

pub const PERI_BASE_BONUS: f64 = -0.60;
pub const PERI_MAX_BONUS: f64 = -0.95;
pub const PERI_BASE_HARM: f64 = 0.5;
pub const PERI_MIN_HARM: f64 = 0.2;

pub const POST_BASE_WINDOW_MIN: f64 = 120.0;
pub const POST_KCAL_PER_WINDOW_MIN: f64 = 60.0;
pub const POST_MAX_WINDOW_MIN: f64 = 360.0;
pub const POST_MAX_BONUS: f64 = -0.60;
pub const POST_BASE_HARM: f64 = 0.7;
pub const POST_MIN_HARM: f64 = 0.3;
pub const POST_HARM_KCAL_DIVISOR: f64 = 2000.0;
pub const POST_HARM_MAX_REDUCTION: f64 = 0.5;
pub const POST_CARDIO_MULT: f64 = 1.15;
pub const POST_STRENGTH_MULT: f64 = 1.0;
pub const POST_HOBBY_MULT: f64 = 0.8;

/// Post-workout wave bonus by minutes since the training ended.
pub static POST_WORKOUT_GAP: TierTable = tier_table!(
    FactorId::PostWorkoutGap,
    Comparison::AtMost,
    fallback: -0.08,
    [
        (30.0, -0.40, "anabolic"),
        (60.0, -0.35, "early"),
        (120.0, -0.25, "window"),
        (240.0, -0.15, "late"),
        (360.0, -0.08, "residual"),
    ]
);

/// Post-workout multiplier by training kcal.
pub static POST_WORKOUT_KCAL: TierTable = tier_table!(
    FactorId::PostWorkoutKcal,
    Comparison::AtLeast,
    fallback: 1.0,
    [(1000.0, 1.5, "extreme"), (700.0, 1.35, "high"), (400.0, 1.25, "medium"), (200.0, 1.15, "light")]
);

/// Pre-workout wave bonus by minutes until the training starts.
pub static PRE_WORKOUT_GAP: TierTable = tier_table!(
    FactorId::PreWorkoutGap,
    Comparison::AtMost,
    fallback: 0.0,
    [(45.0, -0.20, "close"), (90.0, -0.10, "ahead")]
);
pub const PRE_WORKOUT_CLOSE_HARM: f64 = 0.6;
pub const PRE_WORKOUT_AHEAD_HARM: f64 = 0.8;
pub const PRE_WORKOUT_WINDOW_MIN: f64 = 90.0;

/// Step-context wave bonus; harm multipliers live in `STEPS_CONTEXT_HARM`.
pub static STEPS_CONTEXT: TierTable = tier_table!(
    FactorId::StepsContext,
    Comparison::AtLeast,
    fallback: 0.0,
    [(12000.0, -0.12, "veryActive"), (10000.0, -0.10, "active"), (7500.0, -0.06, "moderate"), (5000.0, -0.04, "light")]
);
pub const STEPS_CONTEXT_HARM: [f64; 4] = [0.92, 0.95, 0.97, 0.98];
pub const STEPS_EVENING_HOUR: u32 = 18;
pub const STEPS_EVENING_MULT: f64 = 1.3;

pub static HOUSEHOLD_CONTEXT: TierTable = tier_table!(
    FactorId::HouseholdContext,
    Comparison::AtLeast,
    fallback: 0.0,
    [(90.0, -0.12, "high"), (60.0, -0.10, "medium"), (30.0, -0.05, "light")]
);
pub const HOUSEHOLD_CONTEXT_HARM: [f64; 3] = [0.90, 0.93, 0.96];

pub const MORNING_TRAINING_HOUR: u32 = 12;
pub const MORNING_TRAINING_BONUS: f64 = -0.05;
pub const DOUBLE_TRAINING_BONUS: f64 = -0.10;

pub const STRENGTH_PROTEIN_MIN: f64 = 30.0;
pub const STRENGTH_PROTEIN_MAX_HARM: f64 = 0.8;
pub const CARDIO_SIMPLE_MULT: f64 = 0.7;
pub const NIGHT_OVERRIDE_HOUR: u32 = 22;
pub const NIGHT_OVERRIDE_WINDOW_MIN: f64 = 240.0;
pub const FASTED_TRAINING_HOURS: f64 = 8.0;
pub const FASTED_TRAINING_MULT: f64 = 1.3;

pub const PRIORITY_PERI: u8 = 100;
pub const PRIORITY_POST: u8 = 80;
pub const PRIORITY_PRE: u8 = 60;
pub const PRIORITY_STEPS: u8 = 20;
pub const PRIORITY_HOUSEHOLD: u8 = 15;
pub const PRIORITY_MORNING: u8 = 10;
pub const PRIORITY_DOUBLE: u8 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Next-day training effect
// ─────────────────────────────────────────────────────────────────────────────

pub const NDTE_MAX_WINDOW_HOURS: f64 = 48.0;
pub const NDTE_MIN_KCAL: f64 = 200.0;
/// (kcal threshold, tdee boost, wave reduction, peak reduction), highest first.
pub const NDTE_KCAL_TIERS: [(f64, f64, f64, f64); 3] = [
    (900.0, 0.10, 0.25, 0.30),
    (500.0, 0.07, 0.15, 0.20),
    (300.0, 0.04, 0.08, 0.10),
];

pub static NDTE_BMI: TierTable = tier_table!(
    FactorId::NdteBmi,
    Comparison::AtLeast,
    fallback: 0.8,
    [(30.0, 1.8, "obese"), (25.0, 1.4, "overweight"), (18.5, 1.0, "normal")]
);

pub static NDTE_DECAY: TierTable = tier_table!(
    FactorId::NdteDecay,
    Comparison::AtMost,
    fallback: 0.0,
    [(12.0, 1.0, "fresh"), (24.0, 0.8, "nextDay"), (36.0, 0.5, "fading"), (48.0, 0.25, "residual")]
);

/// Type multipliers: (tdee, wave).
pub const NDTE_STRENGTH: (f64, f64) = (1.2, 0.9);
pub const NDTE_CARDIO: (f64, f64) = (1.0, 1.1);
pub const NDTE_HOBBY: (f64, f64) = (0.8, 0.8);
pub const NDTE_CUMULATIVE_STEP: f64 = 0.2;
pub const NDTE_CUMULATIVE_MAX: f64 = 1.5;
pub const NDTE_MAX_TDEE: f64 = 0.20;
pub const NDTE_MAX_WAVE: f64 = 0.45;
pub const NDTE_MAX_PEAK: f64 = 0.50;

// ─────────────────────────────────────────────────────────────────────────────
// Circadian rhythm and day factors
// ─────────────────────────────────────────────────────────────────────────────

/// Hour of best insulin sensitivity.
pub const CIRCADIAN_PEAK_HOUR: f64 = 8.0;
pub const CIRCADIAN_MIN: f64 = 0.85;
pub const CIRCADIAN_MAX: f64 = 1.20;

pub static FASTING_BONUS: TierTable = tier_table!(
    FactorId::FastingBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(16.0, -0.15, "extended"), (12.0, -0.10, "overnight"), (8.0, -0.05, "short")]
);

pub static STRESS_BONUS: TierTable = tier_table!(
    FactorId::StressBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(7.0, 0.15, "high"), (5.0, 0.08, "moderate")]
);

pub static SLEEP_BONUS: TierTable = tier_table!(
    FactorId::SleepBonus,
    Comparison::Below,
    fallback: 0.0,
    [(4.0, 0.20, "severe"), (5.0, 0.15, "moderate"), (6.0, 0.08, "mild")]
);

/// Sleep quality on a 1-10 scale.
pub static SLEEP_QUALITY_BONUS: TierTable = tier_table!(
    FactorId::SleepQuality,
    Comparison::AtMost,
    fallback: 0.0,
    [(4.0, 0.08, "poor"), (6.0, 0.04, "fair")]
);

/// Hydration bonus by fraction of the daily water goal.
pub static HYDRATION_BONUS: TierTable = tier_table!(
    FactorId::HydrationBonus,
    Comparison::Below,
    fallback: 0.0,
    [(0.3, 0.08, "severe"), (0.5, 0.05, "moderate"), (0.7, 0.03, "mild")]
);
pub const HYDRATION_ML_PER_KG: f64 = 30.0;

pub static AGE_BONUS: TierTable = tier_table!(
    FactorId::AgeBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(70.0, 0.40, "senior"), (60.0, 0.25, "elderly"), (45.0, 0.12, "middle"), (30.0, 0.06, "adult")]
);

pub static BMI_BONUS: TierTable = tier_table!(
    FactorId::BmiBonus,
    Comparison::AtLeast,
    fallback: 0.0,
    [(30.0, 0.20, "obese"), (25.0, 0.10, "overweight")]
);

pub const GENDER_MALE_BONUS: f64 = 0.05;
pub const GENDER_FEMALE_BONUS: f64 = -0.05;

pub const COLD_SHOWER: f64 = -0.05;
pub const COLD_BATH: f64 = -0.10;
pub const COLD_SWIM: f64 = -0.12;
pub const COLD_EXPOSURE_WINDOW_HOURS: f64 = 5.0;

/// Insulin-sensitivity bonus by fasting hours.
pub static AUTOPHAGY_PHASES: TierTable = tier_table!(
    FactorId::Autophagy,
    Comparison::AtLeast,
    fallback: 0.0,
    [(48.0, 0.18, "extended"), (24.0, 0.15, "deep"), (16.0, 0.10, "active"), (12.0, 0.05, "early")]
);

// ─────────────────────────────────────────────────────────────────────────────
// Insulin-resistance score
// ─────────────────────────────────────────────────────────────────────────────

pub static IR_BMI: TierTable = tier_table!(
    FactorId::IrBmi,
    Comparison::Below,
    fallback: 1.4,
    [(25.0, 1.0, "Normal"), (30.0, 1.1, "Overweight"), (35.0, 1.25, "Obese I")]
);
pub const IR_BMI_TOP_LABEL: &str = "Obese II+";

pub static IR_SLEEP: TierTable = tier_table!(
    FactorId::IrSleep,
    Comparison::AtLeast,
    fallback: 1.15,
    [(7.0, 1.0, "Rested"), (6.0, 1.05, "Short")]
);
pub const IR_SLEEP_BOTTOM_LABEL: &str = "Deprived";

pub static IR_STRESS: TierTable = tier_table!(
    FactorId::IrStress,
    Comparison::AtMost,
    fallback: 1.15,
    [(3.0, 1.0, "Calm"), (6.0, 1.08, "Moderate")]
);
pub const IR_STRESS_TOP_LABEL: &str = "High";

pub static IR_AGE: TierTable = tier_table!(
    FactorId::IrAge,
    Comparison::Below,
    fallback: 1.25,
    [(30.0, 1.0, "Young"), (45.0, 1.06, "Adult"), (60.0, 1.12, "Middle")]
);
pub const IR_AGE_TOP_LABEL: &str = "Senior";

pub const IR_DEFAULT_WEIGHT: f64 = 70.0;
pub const IR_DEFAULT_HEIGHT: f64 = 170.0;
pub const IR_DEFAULT_AGE: f64 = 30.0;
pub const IR_DEFAULT_SLEEP: f64 = 7.0;
pub const IR_DEFAULT_STRESS: f64 = 3.0;

pub const IR_BAND_OPTIMAL: f64 = 1.1;
pub const IR_BAND_MODERATE: f64 = 1.25;
pub const IR_BAND_ELEVATED: f64 = 1.5;

// ─────────────────────────────────────────────────────────────────────────────
// Wave shape
// ─────────────────────────────────────────────────────────────────────────────

pub const FAST_PEAK: f64 = 0.15;
pub const FAST_SIGMA: f64 = 0.12;
pub const FAST_AMPLITUDE: f64 = 0.6;
pub const FAST_HIGH_GI: f64 = 70.0;
pub const FAST_GI_MULT: f64 = 1.3;
pub const FAST_LIQUID_BOOST: f64 = 1.5;
pub const FAST_LIQUID_SIGMA: f64 = 0.8;
pub const FAST_LIQUID_PEAK: f64 = 0.8;
pub const FAST_FIBER_MIN: f64 = 5.0;
pub const FAST_FIBER_DAMPING: f64 = 0.7;
pub const FAST_FIBER_SIGMA: f64 = 1.2;
pub const FAST_SIMPLE_RATIO: f64 = 0.5;

pub const SLOW_PEAK: f64 = 0.45;
pub const SLOW_SIGMA: f64 = 0.25;
pub const SLOW_AMPLITUDE: f64 = 0.35;
pub const SLOW_PROTEIN_MIN: f64 = 20.0;
pub const SLOW_PROTEIN_BOOST: f64 = 1.4;
pub const SLOW_FAT_MIN: f64 = 15.0;
pub const SLOW_FAT_BOOST: f64 = 1.3;
pub const SLOW_COMPLEX_BOOST: f64 = 1.2;

pub const HEPATIC_PEAK: f64 = 0.70;
pub const HEPATIC_SIGMA: f64 = 0.35;
pub const HEPATIC_AMPLITUDE: f64 = 0.05;
/// IR excess (score above 1.0) that starts boosting the hepatic component.
pub const HEPATIC_IR_THRESHOLD: f64 = 0.3;
pub const HEPATIC_IR_BOOST: f64 = 1.5;
pub const HEPATIC_ALCOHOL_BOOST: f64 = 1.3;

pub const CURVE_BASELINE: f64 = 0.05;
pub const CURVE_SAMPLE_POINTS: usize = 100;

pub const SHAPE_SPIKE_MIN: f64 = 0.7;
pub const SHAPE_PROLONGED_MAX: f64 = 0.3;

/// Wave length scaling by fast contribution: spikes clear faster.
pub const KINETICS_SLOPE: f64 = 0.5;
pub const KINETICS_MIN: f64 = 0.80;
pub const KINETICS_MAX: f64 = 1.10;

// ─────────────────────────────────────────────────────────────────────────────
// Composition
// ─────────────────────────────────────────────────────────────────────────────

/// Lowest factor `1 + bonusSum` may reach.
pub const BONUS_FACTOR_FLOOR: f64 = 0.3;
/// Wave length used when composition degenerates (3 h).
pub const DEFAULT_WAVE_MINUTES: f64 = 180.0;
pub const MIN_WAVE_MINUTES: f64 = 30.0;
pub const PEAK_ESTIMATE_MAX: f64 = 1.5;
/// Peak weight of IR excess over 1.0.
pub const IR_PEAK_WEIGHT: f64 = 0.5;
/// Circadian cap for post-workout refuelling late in the evening.
pub const NIGHT_OVERRIDE_CIRCADIAN_CAP: f64 = 1.0;

// ─────────────────────────────────────────────────────────────────────────────
// AUC, prediction, risk
// ─────────────────────────────────────────────────────────────────────────────

/// (name, start, end) of the named AUC segments.
pub const AUC_SEGMENTS: [(&str, f64, f64); 3] =
    [("early", 0.0, 0.25), ("peak", 0.15, 0.50), ("late", 0.50, 1.0)];
pub const AUC_FRONT_LOADED: f64 = 1.5;
pub const AUC_PROLONGED: f64 = 0.5;
pub const AUC_REF_GLUCOSE: f64 = 1.0;
pub const AUC_REF_WHITE_RICE: f64 = 0.85;
pub const AUC_REF_OATMEAL: f64 = 0.45;

pub const PREDICTION_TIME_POINTS: [u32; 5] = [15, 30, 60, 90, 120];
pub const LEVEL_PEAK: f64 = 0.9;
pub const LEVEL_HIGH: f64 = 0.6;
pub const LEVEL_MODERATE: f64 = 0.3;
pub const LEVEL_LOW: f64 = 0.1;
pub const THRESHOLD_SAFE_TO_EAT: f64 = 0.3;
pub const THRESHOLD_FAT_BURNING: f64 = 0.15;
pub const THRESHOLD_OPTIMAL_WINDOW: f64 = 0.25;

/// Insulin levels (µU/ml) separating lipolysis states.
pub const LIPOLYSIS_FULL: f64 = 5.0;
pub const LIPOLYSIS_PARTIAL: f64 = 15.0;
pub const LIPOLYSIS_SUPPRESSED: f64 = 50.0;
pub const LIPOLYSIS_BLOCKED: f64 = 100.0;

pub const HYPO_WINDOW_START: f64 = 120.0;
pub const HYPO_WINDOW_END: f64 = 240.0;
pub const HYPO_HIGH_GI: f64 = 70.0;
pub const HYPO_LOW_PROTEIN: f64 = 10.0;
pub const HYPO_LOW_FAT: f64 = 5.0;
pub const HYPO_WEIGHT_GI: f64 = 0.4;
pub const HYPO_WEIGHT_PROTEIN: f64 = 0.3;
pub const HYPO_WEIGHT_FAT: f64 = 0.2;
pub const HYPO_WEIGHT_FASTED: f64 = 0.1;
pub const HYPO_FASTED_HOURS: f64 = 8.0;
pub const HYPO_WARNING: f64 = 0.6;

// ─────────────────────────────────────────────────────────────────────────────
// Scoring
// ─────────────────────────────────────────────────────────────────────────────

pub const SCORE_WEIGHT_PEAK: f64 = 0.25;
pub const SCORE_WEIGHT_DURATION: f64 = 0.20;
pub const SCORE_WEIGHT_SHAPE: f64 = 0.20;
pub const SCORE_WEIGHT_AUC: f64 = 0.20;
pub const SCORE_WEIGHT_CONTEXT: f64 = 0.15;

/// Excellent / good / fair / poor bounds for peak height.
pub const SCORE_PEAK_BANDS: [f64; 4] = [0.6, 0.75, 0.9, 1.0];
pub const SCORE_AUC_BANDS: [f64; 4] = [0.5, 0.75, 1.0, 1.5];
pub const SCORE_DURATION_TARGET: f64 = 180.0;
pub const SCORE_DURATION_TOLERANCE: f64 = 30.0;
pub const SCORE_DURATION_MAX_PENALTY: f64 = 60.0;
pub const SCORE_CONTEXT_BASE: f64 = 70.0;
pub const SCORE_CONTEXT_TRAINING: f64 = 15.0;
pub const SCORE_CONTEXT_GOOD_TIME: f64 = 10.0;
pub const SCORE_CONTEXT_NIGHT: f64 = -10.0;
pub const SCORE_CONTEXT_MEAL_GAP: f64 = 5.0;
pub const SCORE_CONTEXT_MEAL_GAP_MIN: f64 = 180.0;
/// Sub-scores below this trigger a recommendation.
pub const SCORE_RECOMMEND_BELOW: f64 = 70.0;

pub const LEVEL_EXCELLENT_MIN: u32 = 85;
pub const LEVEL_GOOD_MIN: u32 = 70;
pub const LEVEL_FAIR_MIN: u32 = 50;

/// Every tier table by factor, for listing and lookup by id.
pub static TIER_TABLES: LazyLock<BTreeMap<FactorId, &'static TierTable>> = LazyLock::new(|| {
    let tables: [&'static TierTable; 32] = [
        &GI_CATEGORIES,
        &GL_CATEGORIES,
        &PROTEIN_BONUS,
        &FIBER_BONUS,
        &FAT_BONUS,
        &TRANS_FAT_BONUS,
        &LARGE_PORTION_BONUS,
        &LARGE_PORTION_PEAK,
        &WORKOUT_BONUS,
        &POSTPRANDIAL_PROXIMITY,
        &POSTPRANDIAL_KCAL,
        &NEAT_BONUS,
        &STEPS_BONUS,
        &POST_WORKOUT_GAP,
        &POST_WORKOUT_KCAL,
        &PRE_WORKOUT_GAP,
        &STEPS_CONTEXT,
        &HOUSEHOLD_CONTEXT,
        &NDTE_BMI,
        &NDTE_DECAY,
        &FASTING_BONUS,
        &STRESS_BONUS,
        &SLEEP_BONUS,
        &SLEEP_QUALITY_BONUS,
        &HYDRATION_BONUS,
        &AGE_BONUS,
        &BMI_BONUS,
        &AUTOPHAGY_PHASES,
        &IR_BMI,
        &IR_SLEEP,
        &IR_STRESS,
        &IR_AGE,
    ];
    tables.into_iter().map(|t| (t.id, t)).collect()
});

/// Look up a tier table by factor.
pub fn tier_table_for(id: FactorId) -> Option<&'static TierTable> {
    TIER_TABLES.get(&id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_weights_sum_to_one() {
        let sum = SCORE_WEIGHT_PEAK
            + SCORE_WEIGHT_DURATION
            + SCORE_WEIGHT_SHAPE
            + SCORE_WEIGHT_AUC
            + SCORE_WEIGHT_CONTEXT;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_registry_keyed_by_own_id() {
        for (id, table) in TIER_TABLES.iter() {
            assert_eq!(*id, table.id);
        }
        assert!(tier_table_for(FactorId::SleepBonus).is_some());
    }

    #[test]
    fn test_tiers_listed_in_priority_order() {
        for table in TIER_TABLES.values() {
            for pair in table.tiers.windows(2) {
                match table.comparison {
                    Comparison::AtLeast => assert!(pair[0].threshold > pair[1].threshold),
                    Comparison::Below | Comparison::AtMost => {
                        assert!(pair[0].threshold < pair[1].threshold)
                    }
                }
            }
        }
    }

    #[test]
    fn test_gi_categories() {
        assert!((GI_CATEGORIES.lookup(35.0) - 0.85).abs() < 1e-9);
        assert!((GI_CATEGORIES.lookup(50.0) - 1.0).abs() < 1e-9);
        assert!((GI_CATEGORIES.lookup(70.0) - 1.1).abs() < 1e-9);
        assert!((GI_CATEGORIES.lookup(90.0) - 1.2).abs() < 1e-9);
    }
}
