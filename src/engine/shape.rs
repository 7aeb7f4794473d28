//! Three-component Gaussian model of the insulin wave.
//!
//! The fast component is the first-phase secretion driven by simple sugars,
//! the slow one follows protein, fat and starch digestion, and the small
//! hepatic tail reflects liver insulin clearance. Time is normalized to the
//! wave length, so `t = 1.0` is the end of the wave.

use serde::Serialize;

use crate::engine::constants::*;
use crate::models::MealNutrients;
use crate::models::nutrients::non_negative;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveComponentParams {
    pub amplitude: f64,
    pub sigma: f64,
    /// Peak position on the normalized time axis.
    pub peak: f64,
}

impl WaveComponentParams {
    #[inline]
    pub fn value_at(&self, t: f64) -> f64 {
        let d = t - self.peak;
        self.amplitude * (-(d * d) / (2.0 * self.sigma * self.sigma)).exp()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSet {
    pub fast: WaveComponentParams,
    pub slow: WaveComponentParams,
    pub hepatic: WaveComponentParams,
}

impl ComponentSet {
    /// Share of the fast amplitude in the total.
    pub fn fast_contribution(&self) -> f64 {
        let total = self.fast.amplitude + self.slow.amplitude + self.hepatic.amplitude;
        if total > 0.0 { self.fast.amplitude / total } else { 0.0 }
    }
}

impl Default for ComponentSet {
    fn default() -> Self {
        Self {
            fast: WaveComponentParams {
                amplitude: FAST_AMPLITUDE,
                sigma: FAST_SIGMA,
                peak: FAST_PEAK,
            },
            slow: WaveComponentParams {
                amplitude: SLOW_AMPLITUDE,
                sigma: SLOW_SIGMA,
                peak: SLOW_PEAK,
            },
            hepatic: WaveComponentParams {
                amplitude: HEPATIC_AMPLITUDE,
                sigma: HEPATIC_SIGMA,
                peak: HEPATIC_PEAK,
            },
        }
    }
}

/// Derive the component parameters for a meal.
///
/// `ir_excess` is the insulin-resistance score above 1.0.
pub fn component_params(nutrients: &MealNutrients, ir_excess: f64) -> ComponentSet {
    let mut set = ComponentSet::default();

    let fast = &mut set.fast;
    if nutrients.effective_gi() > FAST_HIGH_GI {
        fast.amplitude *= FAST_GI_MULT;
    }
    if nutrients.is_liquid {
        fast.amplitude *= FAST_LIQUID_BOOST;
        fast.sigma *= FAST_LIQUID_SIGMA;
        fast.peak *= FAST_LIQUID_PEAK;
    }
    if non_negative(nutrients.fiber) >= FAST_FIBER_MIN {
        fast.amplitude *= FAST_FIBER_DAMPING;
        fast.sigma *= FAST_FIBER_SIGMA;
    }
    let simple_ratio = nutrients.simple_ratio();
    if simple_ratio > FAST_SIMPLE_RATIO {
        fast.amplitude *= 1.0 + (simple_ratio - FAST_SIMPLE_RATIO);
    }

    let slow = &mut set.slow;
    if non_negative(nutrients.protein) >= SLOW_PROTEIN_MIN {
        slow.amplitude *= SLOW_PROTEIN_BOOST;
    }
    if non_negative(nutrients.fat) >= SLOW_FAT_MIN {
        slow.amplitude *= SLOW_FAT_BOOST;
    }
    if non_negative(nutrients.complex_carbs) > non_negative(nutrients.simple_carbs) {
        slow.amplitude *= SLOW_COMPLEX_BOOST;
    }

    let hepatic = &mut set.hepatic;
    let excess = if ir_excess.is_finite() { ir_excess.max(0.0) } else { 0.0 };
    if excess > HEPATIC_IR_THRESHOLD {
        hepatic.amplitude *= HEPATIC_IR_BOOST * (1.0 + excess);
    }
    if nutrients.alcohol.is_some() {
        hepatic.amplitude *= HEPATIC_ALCOHOL_BOOST;
    }

    set
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WaveShape {
    Spike,
    Balanced,
    Prolonged,
}

impl WaveShape {
    pub fn classify(fast_contribution: f64) -> Self {
        if fast_contribution >= SHAPE_SPIKE_MIN {
            WaveShape::Spike
        } else if fast_contribution <= SHAPE_PROLONGED_MAX {
            WaveShape::Prolonged
        } else {
            WaveShape::Balanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WaveShape::Spike => "spike",
            WaveShape::Balanced => "balanced",
            WaveShape::Prolonged => "prolonged",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentValues {
    pub fast: f64,
    pub slow: f64,
    pub hepatic: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub t: f64,
    pub minutes: f64,
    pub value: f64,
    pub components: ComponentValues,
}

/// Sampled wave curve. Built once by [`generate_curve`], never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveCurve {
    pub points: Vec<CurvePoint>,
    pub params: ComponentSet,
    pub peak_index: usize,
    /// Peak position in whole minutes.
    pub peak_time: f64,
    pub peak_value: f64,
    pub fast_contribution: f64,
    pub shape: WaveShape,
}

/// Sample the curve at `sample_points + 1` evenly spaced points over `[0, 1]`.
pub fn generate_curve(
    params: &ComponentSet,
    wave_minutes: f64,
    sample_points: usize,
    baseline: f64,
    normalize_to_one: bool,
) -> WaveCurve {
    let steps = sample_points.max(1);
    let baseline = if baseline.is_finite() { baseline.max(0.0) } else { 0.0 };

    let mut points: Vec<CurvePoint> = (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let components = ComponentValues {
                fast: params.fast.value_at(t),
                slow: params.slow.value_at(t),
                hepatic: params.hepatic.value_at(t),
            };
            CurvePoint {
                t,
                minutes: t * wave_minutes,
                value: components.fast + components.slow + components.hepatic + baseline,
                components,
            }
        })
        .collect();

    let max_value = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    if normalize_to_one && max_value > 0.0 {
        for p in &mut points {
            p.value /= max_value;
            p.components.fast /= max_value;
            p.components.slow /= max_value;
            p.components.hepatic /= max_value;
        }
    }

    // First maximum wins on ties
    let peak_index = points
        .iter()
        .enumerate()
        .fold(0, |best, (i, p)| if p.value > points[best].value { i } else { best });
    let peak = &points[peak_index];
    let peak_time = peak.minutes.round();
    let peak_value = peak.value;

    let fast_contribution = params.fast_contribution();
    WaveCurve {
        peak_index,
        peak_time,
        peak_value,
        fast_contribution,
        shape: WaveShape::classify(fast_contribution),
        params: *params,
        points,
    }
}

impl WaveCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
