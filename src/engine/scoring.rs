use serde::Serialize;

use crate::engine::constants::*;
use crate::engine::day::CircadianPeriod;
use crate::engine::shape::WaveShape;

/// Coarse time-of-day bucket used by the context sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScorePeriod {
    Morning,
    Day,
    Night,
    Neutral,
}

impl From<CircadianPeriod> for ScorePeriod {
    fn from(period: CircadianPeriod) -> Self {
        match period {
            CircadianPeriod::EarlyMorning | CircadianPeriod::PeakMorning => ScorePeriod::Morning,
            CircadianPeriod::Midday | CircadianPeriod::Afternoon => ScorePeriod::Day,
            CircadianPeriod::Night | CircadianPeriod::LateEvening => ScorePeriod::Night,
            CircadianPeriod::Evening => ScorePeriod::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreContext {
    pub has_training: bool,
    pub is_post_workout: bool,
    pub period: ScorePeriod,
    pub meal_gap_minutes: Option<f64>,
    /// Post-workout refuelling late in the day is not penalised.
    pub night_penalty_override: bool,
}

impl Default for ScoreContext {
    fn default() -> Self {
        Self {
            has_training: false,
            is_post_workout: false,
            period: ScorePeriod::Neutral,
            meal_gap_minutes: None,
            night_penalty_override: false,
        }
    }
}

/// Piecewise-linear score over four ascending bounds: 100 up to the first,
/// then 100→80, 80→50 and 50→0 across the following bands.
fn banded_score(value: f64, bands: &[f64; 4]) -> f64 {
    let [excellent, good, fair, poor] = *bands;
    if value <= excellent {
        100.0
    } else if value <= good {
        100.0 - (value - excellent) / (good - excellent) * 20.0
    } else if value <= fair {
        80.0 - (value - good) / (fair - good) * 30.0
    } else {
        (50.0 - (value - fair) / (poor - fair) * 50.0).max(0.0)
    }
}

pub fn score_peak_height(peak_value: f64) -> f64 {
    banded_score(peak_value, &SCORE_PEAK_BANDS)
}

pub fn score_duration(wave_minutes: f64) -> f64 {
    let deviation = (wave_minutes - SCORE_DURATION_TARGET).abs();
    if deviation <= SCORE_DURATION_TOLERANCE {
        return 100.0 - deviation / SCORE_DURATION_TOLERANCE * 15.0;
    }
    let penalty = ((deviation - SCORE_DURATION_TOLERANCE)
        / (SCORE_DURATION_MAX_PENALTY - SCORE_DURATION_TOLERANCE))
        .min(1.0);
    (85.0 - penalty * 85.0).max(0.0)
}

pub fn score_shape(shape: WaveShape) -> f64 {
    match shape {
        WaveShape::Prolonged => 95.0,
        WaveShape::Balanced => 80.0,
        WaveShape::Spike => 50.0,
    }
}

pub fn score_auc(normalized_auc: f64) -> f64 {
    if normalized_auc > SCORE_AUC_BANDS[3] {
        return 0.0;
    }
    banded_score(normalized_auc, &SCORE_AUC_BANDS)
}

pub fn score_context(context: &ScoreContext) -> f64 {
    let mut score = SCORE_CONTEXT_BASE;
    if context.has_training || context.is_post_workout {
        score += SCORE_CONTEXT_TRAINING;
    }
    match context.period {
        ScorePeriod::Morning | ScorePeriod::Day => score += SCORE_CONTEXT_GOOD_TIME,
        ScorePeriod::Night if !context.night_penalty_override => score += SCORE_CONTEXT_NIGHT,
        _ => {}
    }
    if context
        .meal_gap_minutes
        .is_some_and(|gap| gap >= SCORE_CONTEXT_MEAL_GAP_MIN)
    {
        score += SCORE_CONTEXT_MEAL_GAP;
    }
    score.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreLevel {
    pub fn of(score: u32) -> Self {
        if score >= LEVEL_EXCELLENT_MIN {
            ScoreLevel::Excellent
        } else if score >= LEVEL_GOOD_MIN {
            ScoreLevel::Good
        } else if score >= LEVEL_FAIR_MIN {
            ScoreLevel::Fair
        } else {
            ScoreLevel::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "Excellent",
            ScoreLevel::Good => "Good",
            ScoreLevel::Fair => "Fair",
            ScoreLevel::Poor => "Needs attention",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "🌟",
            ScoreLevel::Good => "✅",
            ScoreLevel::Fair => "➖",
            ScoreLevel::Poor => "⚠️",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "#22c55e",
            ScoreLevel::Good => "#84cc16",
            ScoreLevel::Fair => "#eab308",
            ScoreLevel::Poor => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendationKind {
    Peak,
    Shape,
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub text: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub value: f64,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub peak_height: ScoreComponent,
    pub duration: ScoreComponent,
    pub shape: ScoreComponent,
    pub auc: ScoreComponent,
    pub context: ScoreComponent,
}

impl ScoreComponents {
    fn weighted_sum(&self) -> f64 {
        [self.peak_height, self.duration, self.shape, self.auc, self.context]
            .iter()
            .map(|c| c.score * c.weight)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveScore {
    /// 0 to 100.
    pub score: u32,
    pub level: ScoreLevel,
    pub components: ScoreComponents,
    pub recommendations: Vec<Recommendation>,
}

/// Weighted quality score of a wave.
///
/// `scored_auc` is the AUC already scaled by peak height and duration
/// relative to the glucose reference.
pub fn score_wave(
    peak_value: f64,
    wave_minutes: f64,
    shape: WaveShape,
    fast_contribution: f64,
    scored_auc: f64,
    context: &ScoreContext,
) -> WaveScore {
    let components = ScoreComponents {
        peak_height: ScoreComponent {
            value: peak_value,
            score: score_peak_height(peak_value),
            weight: SCORE_WEIGHT_PEAK,
        },
        duration: ScoreComponent {
            value: wave_minutes,
            score: score_duration(wave_minutes),
            weight: SCORE_WEIGHT_DURATION,
        },
        shape: ScoreComponent {
            value: fast_contribution,
            score: score_shape(shape),
            weight: SCORE_WEIGHT_SHAPE,
        },
        auc: ScoreComponent {
            value: scored_auc,
            score: score_auc(scored_auc),
            weight: SCORE_WEIGHT_AUC,
        },
        context: ScoreComponent {
            value: context.meal_gap_minutes.unwrap_or_default(),
            score: score_context(context),
            weight: SCORE_WEIGHT_CONTEXT,
        },
    };

    let score = components.weighted_sum().round().clamp(0.0, 100.0) as u32;

    let mut recommendations = Vec::new();
    if components.peak_height.score < SCORE_RECOMMEND_BELOW {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Peak,
            text: "Add fiber to lower the peak",
            icon: "🥬",
        });
    }
    if components.shape.score < SCORE_RECOMMEND_BELOW {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Shape,
            text: "Complex carbs give a smoother wave",
            icon: "🍞",
        });
    }
    if components.context.score < SCORE_RECOMMEND_BELOW && !context.has_training {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Activity,
            text: "A light walk after eating improves glucose uptake",
            icon: "🚶",
        });
    }

    WaveScore {
        score,
        level: ScoreLevel::of(score),
        components,
        recommendations,
    }
}
