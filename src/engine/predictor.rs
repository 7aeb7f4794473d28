use serde::Serialize;

use crate::engine::constants::*;
use crate::engine::shape::CurvePoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InsulinLevel {
    Peak,
    High,
    Moderate,
    Low,
    Baseline,
}

impl InsulinLevel {
    pub fn of(value: f64) -> Self {
        if value >= LEVEL_PEAK {
            InsulinLevel::Peak
        } else if value >= LEVEL_HIGH {
            InsulinLevel::High
        } else if value >= LEVEL_MODERATE {
            InsulinLevel::Moderate
        } else if value >= LEVEL_LOW {
            InsulinLevel::Low
        } else {
            InsulinLevel::Baseline
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InsulinLevel::Peak => "peak level",
            InsulinLevel::High => "high level",
            InsulinLevel::Moderate => "moderate level",
            InsulinLevel::Low => "low level",
            InsulinLevel::Baseline => "baseline level",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReading {
    pub minutes: f64,
    pub t: f64,
    pub value: f64,
    pub level: InsulinLevel,
}

/// Interpolated curve value `minutes` after the meal.
///
/// Times past the end of the wave read the last sample. An empty curve reads
/// as baseline zero.
pub fn level_at(points: &[CurvePoint], minutes: f64) -> LevelReading {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return LevelReading {
                minutes,
                t: 0.0,
                value: 0.0,
                level: InsulinLevel::Baseline,
            };
        }
    };

    let t = if last.minutes > 0.0 && minutes.is_finite() {
        (minutes / last.minutes).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (prev, next) = points
        .windows(2)
        .find(|w| w[0].t <= t && w[1].t >= t)
        .map_or((first, last), |w| (&w[0], &w[1]));
    let span = next.t - prev.t;
    let ratio = if span > 0.0 { (t - prev.t) / span } else { 0.0 };
    let value = prev.value + ratio * (next.value - prev.value);

    LevelReading {
        minutes,
        t,
        value,
        level: InsulinLevel::of(value),
    }
}

/// First sample at or below each threshold, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdCrossings {
    pub safe_to_eat: Option<f64>,
    pub fat_burning: Option<f64>,
    pub optimal_window: Option<f64>,
}

fn first_at_or_below(points: &[CurvePoint], threshold: f64, after: usize) -> Option<f64> {
    points
        .iter()
        .skip(after)
        .find(|p| p.value <= threshold)
        .map(|p| p.minutes.round())
}

/// Crossings are searched from the peak onwards so the rising edge of the
/// wave does not count as "already low".
pub fn threshold_crossings(points: &[CurvePoint]) -> ThresholdCrossings {
    let peak = points
        .iter()
        .enumerate()
        .fold(0, |best, (i, p)| if p.value > points[best].value { i } else { best });
    ThresholdCrossings {
        safe_to_eat: first_at_or_below(points, THRESHOLD_SAFE_TO_EAT, peak),
        fat_burning: first_at_or_below(points, THRESHOLD_FAT_BURNING, peak),
        optimal_window: first_at_or_below(points, THRESHOLD_OPTIMAL_WINDOW, peak),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsulinPrediction {
    pub checkpoints: Vec<LevelReading>,
    pub crossings: ThresholdCrossings,
    pub summary: String,
}

/// Checkpoint readings at the standard minutes plus threshold crossings.
pub fn predict(points: &[CurvePoint]) -> InsulinPrediction {
    let checkpoints: Vec<LevelReading> = PREDICTION_TIME_POINTS
        .iter()
        .map(|&m| level_at(points, f64::from(m)))
        .collect();
    let crossings = threshold_crossings(points);
    let summary = summarize(&checkpoints, &crossings);
    InsulinPrediction {
        checkpoints,
        crossings,
        summary,
    }
}

fn summarize(checkpoints: &[LevelReading], crossings: &ThresholdCrossings) -> String {
    let mut parts = Vec::new();
    let at = |m: f64| checkpoints.iter().find(|c| c.minutes == m);
    if let Some(c) = at(30.0) {
        parts.push(format!("At 30 min: {}.", c.level.label()));
    }
    if let Some(c) = at(60.0) {
        parts.push(format!("At 1 h: {}.", c.level.label()));
    }
    if let Some(m) = crossings.fat_burning {
        parts.push(format!("Fat burning from {} min.", m));
    }
    parts.join(" ")
}
