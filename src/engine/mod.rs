pub mod activity;
pub mod auc;
pub mod cache;
pub mod classifier;
pub mod constants;
pub mod day;
pub mod food;
pub mod ir_score;
pub mod phases;
pub mod predictor;
pub mod scoring;
pub mod shape;
pub mod tiers;
pub mod wave;

pub use activity::{
    ActivityBonuses, ActivityContext, ContextKind, NextDayEffect, activity_fallback_bonus,
    next_day_effect, resolve_activity_context,
};
pub use auc::{AucAnalysis, AucPattern, analyze_auc, incremental_auc, trapezoidal_auc};
pub use cache::{WaveCache, context_signature};
pub use classifier::{FoodClassifier, FoodTraits, KeywordClassifier};
pub use day::{DayFactors, PersonalBaseline, day_factors, personal_baseline};
pub use food::{aggregate_meal, effective_gl, food_bonuses, nutrient_multiplier};
pub use ir_score::{IrBand, IrScore, ir_score};
pub use phases::{HypoglycemiaRisk, WavePhases, hypoglycemia_risk, lipolysis_status, wave_phases};
pub use predictor::{InsulinLevel, InsulinPrediction, ThresholdCrossings, level_at, predict};
pub use scoring::{ScoreContext, ScoreLevel, WaveScore, score_wave};
pub use shape::{ComponentSet, CurvePoint, WaveCurve, WaveShape, component_params, generate_curve};
pub use wave::{WaveConfig, compute_insulin_wave, compute_insulin_wave_with};
