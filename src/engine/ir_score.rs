use serde::Serialize;

use crate::engine::constants::*;
use crate::engine::tiers::TierTable;
use crate::models::{DayContext, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IrBand {
    Optimal,
    Moderate,
    Elevated,
    High,
}

impl IrBand {
    pub fn of(score: f64) -> Self {
        if score <= IR_BAND_OPTIMAL {
            IrBand::Optimal
        } else if score <= IR_BAND_MODERATE {
            IrBand::Moderate
        } else if score <= IR_BAND_ELEVATED {
            IrBand::Elevated
        } else {
            IrBand::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IrBand::Optimal => "Optimal",
            IrBand::Moderate => "Moderate",
            IrBand::Elevated => "Elevated",
            IrBand::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IrFactor {
    pub value: f64,
    pub factor: f64,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IrBreakdown {
    pub bmi: IrFactor,
    pub sleep: IrFactor,
    pub stress: IrFactor,
    pub age: IrFactor,
}

/// Multiplicative insulin-resistance index, 1.0 for a fully sensitive person.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IrScore {
    pub score: f64,
    pub breakdown: IrBreakdown,
    pub band: IrBand,
}

impl IrScore {
    /// Resistance above the sensitive baseline.
    pub fn excess(&self) -> f64 {
        (self.score - 1.0).max(0.0)
    }
}

fn factor(table: &TierTable, value: f64, fallback_label: &'static str) -> IrFactor {
    match table.find(value) {
        Some(tier) => IrFactor {
            value,
            factor: tier.value,
            label: tier.name,
        },
        None => IrFactor {
            value,
            factor: table.fallback,
            label: fallback_label,
        },
    }
}

fn usable(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}

pub fn ir_score(profile: &Profile, context: &DayContext) -> IrScore {
    let weight = usable(profile.weight, IR_DEFAULT_WEIGHT);
    let height = usable(profile.height, IR_DEFAULT_HEIGHT);
    let bmi = weight / (height / 100.0).powi(2);
    let age = usable(profile.age, IR_DEFAULT_AGE);
    let sleep = usable(context.sleep_hours, IR_DEFAULT_SLEEP);
    let stress = usable(context.stress_level, IR_DEFAULT_STRESS);

    let breakdown = IrBreakdown {
        bmi: factor(&IR_BMI, (bmi * 10.0).round() / 10.0, IR_BMI_TOP_LABEL),
        sleep: factor(&IR_SLEEP, sleep, IR_SLEEP_BOTTOM_LABEL),
        stress: factor(&IR_STRESS, stress, IR_STRESS_TOP_LABEL),
        age: factor(&IR_AGE, age, IR_AGE_TOP_LABEL),
    };
    let raw = breakdown.bmi.factor * breakdown.sleep.factor * breakdown.stress.factor * breakdown.age.factor;
    let score = (raw * 1000.0).round() / 1000.0;

    IrScore {
        score,
        breakdown,
        band: IrBand::of(score),
    }
}
