use serde::Serialize;

use crate::engine::activity::{ActivityBonuses, ActivityContext, NextDayEffect};
use crate::engine::auc::AucAnalysis;
use crate::engine::day::{DayFactors, PersonalBaseline};
use crate::engine::food::{FoodBonuses, NutrientMultiplier};
use crate::engine::ir_score::IrScore;
use crate::engine::phases::{HypoglycemiaRisk, WavePhases};
use crate::engine::predictor::InsulinPrediction;
use crate::engine::scoring::{Recommendation, ScoreComponents, ScoreLevel};
use crate::engine::shape::{ComponentSet, WaveCurve, WaveShape};

/// Every factor that went into the wave length.
///
/// `wave_minutes ≈ base_minutes × nutrient.total × circadian × spicy ×
/// kinetics × bonus_factor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierBreakdown {
    pub baseline: PersonalBaseline,
    pub base_minutes: f64,
    pub nutrient: NutrientMultiplier,
    pub food: FoodBonuses,
    pub day: DayFactors,
    /// Wave bonus of the resolved activity context, or the fallback total.
    pub activity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_fallback: Option<ActivityBonuses>,
    /// Next-day training effect, already subtracted in `bonus_sum`.
    pub next_day_reduction: f64,
    /// Flat insulinogenic bonus, reported only; the insulin index replaces it.
    pub insulinogenic: f64,
    pub bonus_sum: f64,
    /// `max(0.3, 1 + bonus_sum)`.
    pub bonus_factor: f64,
    pub circadian: f64,
    pub spicy: f64,
    pub kinetics: f64,
    /// Everything except the base, as one factor.
    pub total: f64,
}

/// Output of one wave computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveResult {
    pub wave_minutes: u32,
    pub wave_hours: f64,
    /// Meal clock time.
    pub start_time: String,
    /// Clock time the wave ends, wrapping past midnight.
    pub end_time: String,
    /// Minutes after the meal at which the curve peaks.
    pub peak_time: f64,
    /// Relative peak insulin height, 1.0 for a reference high-GL meal.
    pub peak_value: f64,
    pub shape: WaveShape,
    pub fast_contribution: f64,
    pub auc: AucAnalysis,
    /// AUC scaled by peak and wave length, relative to the target wave.
    pub scored_auc: f64,
    pub score: u32,
    pub score_level: ScoreLevel,
    pub score_components: ScoreComponents,
    pub recommendations: Vec<Recommendation>,

    pub multipliers: MultiplierBreakdown,
    pub phases: WavePhases,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityContext>,
    pub ir: IrScore,
    pub next_day: NextDayEffect,
    pub prediction: InsulinPrediction,
    pub hypoglycemia: HypoglycemiaRisk,
    pub params: ComponentSet,
    #[serde(skip)]
    pub curve: WaveCurve,
}

impl WaveResult {
    /// Whether the meal was eaten close to a training.
    pub fn has_training_context(&self) -> bool {
        self.activity.as_ref().is_some_and(|a| a.kind.is_training())
    }
}
