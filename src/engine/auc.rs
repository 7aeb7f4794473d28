use serde::Serialize;

use crate::engine::constants::*;
use crate::engine::shape::CurvePoint;

#[inline]
fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn trapezoid(points: &[CurvePoint], start: f64, end: f64, value: impl Fn(&CurvePoint) -> f64) -> f64 {
    if points.len() < 2 || !(start < end) {
        return 0.0;
    }
    points
        .windows(2)
        .filter(|w| w[1].t > start && w[0].t < end)
        .map(|w| {
            let (prev, curr) = (&w[0], &w[1]);
            let (v_prev, v_curr) = (value(prev), value(curr));
            let span = curr.t - prev.t;
            let at = |t: f64| {
                if span > 0.0 {
                    v_prev + (t - prev.t) / span * (v_curr - v_prev)
                } else {
                    v_prev
                }
            };
            let t1 = prev.t.max(start);
            let t2 = curr.t.min(end);
            (at(t1) + at(t2)) * (t2 - t1) / 2.0
        })
        .sum()
}

/// Trapezoidal area over `[start, end]` of the normalized time axis.
///
/// Segments crossing a boundary are clipped with linear interpolation.
pub fn trapezoidal_auc(points: &[CurvePoint], start: f64, end: f64) -> f64 {
    trapezoid(points, start.max(0.0), end.min(1.0), |p| p.value)
}

/// Area above `baseline` only.
pub fn incremental_auc(points: &[CurvePoint], baseline: f64) -> f64 {
    trapezoid(points, 0.0, 1.0, |p| (p.value - baseline).max(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AucSegment {
    pub name: &'static str,
    pub start: f64,
    pub end: f64,
    pub auc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AucPattern {
    FrontLoaded,
    Normal,
    Prolonged,
}

impl AucPattern {
    pub fn classify(early_late_ratio: f64) -> Self {
        if early_late_ratio > AUC_FRONT_LOADED {
            AucPattern::FrontLoaded
        } else if early_late_ratio < AUC_PROLONGED {
            AucPattern::Prolonged
        } else {
            AucPattern::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AucPattern::FrontLoaded => "front-loaded",
            AucPattern::Normal => "normal",
            AucPattern::Prolonged => "prolonged",
        }
    }
}

/// Total AUC relative to reference foods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAuc {
    pub vs_glucose: f64,
    pub vs_white_rice: f64,
    pub vs_oatmeal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AucAnalysis {
    pub total: f64,
    pub incremental: f64,
    pub segments: Vec<AucSegment>,
    pub early_late_ratio: f64,
    pub pattern: AucPattern,
    pub normalized: NormalizedAuc,
}

impl AucAnalysis {
    pub fn segment(&self, name: &str) -> Option<&AucSegment> {
        self.segments.iter().find(|s| s.name == name)
    }
}

/// Total, incremental and segmented AUC of a sampled curve, rounded to
/// three decimals.
pub fn analyze_auc(points: &[CurvePoint], baseline: f64) -> AucAnalysis {
    let total = trapezoidal_auc(points, 0.0, 1.0);
    let segments: Vec<AucSegment> = AUC_SEGMENTS
        .iter()
        .map(|&(name, start, end)| AucSegment {
            name,
            start,
            end,
            auc: trapezoidal_auc(points, start, end),
        })
        .collect();

    let area = |name: &str| segments.iter().find(|s| s.name == name).map_or(0.0, |s| s.auc);
    let late = area("late");
    let early_late_ratio = if late > 0.0 { area("early") / late } else { 0.0 };

    AucAnalysis {
        total: round3(total),
        incremental: round3(incremental_auc(points, baseline)),
        segments: segments
            .iter()
            .map(|s| AucSegment {
                auc: round3(s.auc),
                ..*s
            })
            .collect(),
        early_late_ratio: round3(early_late_ratio),
        pattern: AucPattern::classify(early_late_ratio),
        normalized: NormalizedAuc {
            vs_glucose: round3(total / AUC_REF_GLUCOSE),
            vs_white_rice: round3(total / AUC_REF_WHITE_RICE),
            vs_oatmeal: round3(total / AUC_REF_OATMEAL),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::shape::ComponentValues;

    fn flat(value: f64, steps: usize) -> Vec<CurvePoint> {
        (0..=steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                CurvePoint {
                    t,
                    minutes: t * 180.0,
                    value,
                    components: ComponentValues {
                        fast: 0.0,
                        slow: 0.0,
                        hepatic: 0.0,
                    },
                }
            })
            .collect()
    }

    fn ramp(steps: usize) -> Vec<CurvePoint> {
        flat(0.0, steps)
            .into_iter()
            .map(|p| CurvePoint { value: p.t, ..p })
            .collect()
    }

    #[test]
    fn test_flat_curve_area() {
        let pts = flat(0.5, 10);
        assert!((trapezoidal_auc(&pts, 0.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((incremental_auc(&pts, 0.2) - 0.3).abs() < 1e-12);
        assert_eq!(incremental_auc(&pts, 0.8), 0.0);
    }

    #[test]
    fn test_boundaries_interpolated() {
        // Boundaries 0.15 and 0.55 fall inside sample intervals
        let pts = ramp(10);
        let expected = (0.55_f64.powi(2) - 0.15_f64.powi(2)) / 2.0;
        assert!((trapezoidal_auc(&pts, 0.15, 0.55) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_additive_split() {
        let pts = ramp(7);
        let whole = trapezoidal_auc(&pts, 0.0, 1.0);
        let halves = trapezoidal_auc(&pts, 0.0, 0.5) + trapezoidal_auc(&pts, 0.5, 1.0);
        assert!((whole - halves).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(trapezoidal_auc(&[], 0.0, 1.0), 0.0);
        assert_eq!(trapezoidal_auc(&flat(1.0, 1)[..1], 0.0, 1.0), 0.0);
        assert_eq!(trapezoidal_auc(&flat(1.0, 4), 0.6, 0.4), 0.0);
    }

    #[test]
    fn test_analysis_pattern() {
        // Rising ramp: the late segment dominates
        let a = analyze_auc(&ramp(100), 0.05);
        assert_eq!(a.pattern, AucPattern::Prolonged);
        assert!((a.total - 0.5).abs() < 1e-9);
        assert_eq!(a.segments.len(), 3);
        assert!((a.segment("late").map(|s| s.auc).unwrap_or_default() - 0.375).abs() < 1e-9);

        let flat_analysis = analyze_auc(&flat(1.0, 100), 0.05);
        // early 0.25 vs late 0.5
        assert_eq!(flat_analysis.pattern, AucPattern::Normal);
        assert!((flat_analysis.normalized.vs_oatmeal - 2.222).abs() < 1e-9);
    }
}
