use serde::Serialize;

use crate::engine::constants::*;
use crate::models::MealNutrients;
use crate::models::nutrients::non_negative;

/// Rise, plateau and decline split of a wave, in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WavePhases {
    pub rise: f64,
    pub plateau: f64,
    pub decline: f64,
    /// Minute at which fat burning resumes.
    pub lipolysis_start: f64,
}

pub fn wave_phases(wave_minutes: f64, nutrients: &MealNutrients, has_activity: bool) -> WavePhases {
    let fiber = non_negative(nutrients.fiber);
    let mut rise = PHASE_RISE_BASE_MIN + (fiber / 5.0).floor() * PHASE_RISE_FIBER_MIN;
    if nutrients.is_liquid {
        rise = (rise * PHASE_RISE_LIQUID_MULT).round();
    }
    let rise = rise.clamp(PHASE_RISE_MIN, PHASE_RISE_MAX);

    let remaining = wave_minutes - rise;
    let plateau_pct = (PHASE_PLATEAU_BASE_PCT
        + (non_negative(nutrients.protein) / 20.0).floor() * PHASE_PLATEAU_PROTEIN_PCT
        + (non_negative(nutrients.fat) / 15.0).floor() * PHASE_PLATEAU_FAT_PCT)
        .min(PHASE_PLATEAU_MAX_PCT);
    let plateau = (remaining * plateau_pct).round();

    let mut decline = remaining - plateau;
    if has_activity {
        decline = (decline * (1.0 + PHASE_DECLINE_ACTIVITY)).round();
    }
    let decline = decline.max(PHASE_DECLINE_MIN);

    WavePhases {
        rise,
        plateau,
        decline,
        lipolysis_start: rise + plateau + decline,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LipolysisZone {
    Full,
    Partial,
    Suppressed,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LipolysisStatus {
    /// Estimated insulin in µU/ml.
    pub level: f64,
    pub zone: LipolysisZone,
    /// How much of normal fat burning is available, 0 to 100.
    pub lipolysis_pct: u8,
}

/// Insulin estimate from wave progress (0 to 100%): exponential decay from
/// about 80 µU/ml down to the fasting 5.
pub fn lipolysis_status(progress_pct: f64) -> LipolysisStatus {
    let progress = if progress_pct.is_finite() { progress_pct.max(0.0) } else { 0.0 };
    let level = (5.0 + 75.0 * (-progress / 25.0).exp()).round();
    let (zone, lipolysis_pct) = if level <= LIPOLYSIS_FULL {
        (LipolysisZone::Full, 100)
    } else if level <= LIPOLYSIS_PARTIAL {
        (LipolysisZone::Partial, 50)
    } else if level <= LIPOLYSIS_SUPPRESSED {
        (LipolysisZone::Suppressed, 10)
    } else {
        (LipolysisZone::Blocked, 0)
    };
    LipolysisStatus {
        level,
        zone,
        lipolysis_pct,
    }
}

/// Reactive hypoglycemia risk two to four hours after the meal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HypoglycemiaRisk {
    pub score: f64,
    pub has_risk: bool,
    pub window_start: f64,
    pub window_end: f64,
}

pub fn hypoglycemia_risk(nutrients: &MealNutrients, hours_since_last_meal: Option<f64>) -> HypoglycemiaRisk {
    let mut score = 0.0;
    if nutrients.effective_gi() >= HYPO_HIGH_GI {
        score += HYPO_WEIGHT_GI;
    }
    if non_negative(nutrients.protein) < HYPO_LOW_PROTEIN {
        score += HYPO_WEIGHT_PROTEIN;
    }
    if non_negative(nutrients.fat) < HYPO_LOW_FAT {
        score += HYPO_WEIGHT_FAT;
    }
    if hours_since_last_meal.is_some_and(|h| h >= HYPO_FASTED_HOURS) {
        score += HYPO_WEIGHT_FASTED;
    }
    let score = (score * 100.0_f64).round() / 100.0;
    HypoglycemiaRisk {
        score,
        has_risk: score >= HYPO_WARNING,
        window_start: HYPO_WINDOW_START,
        window_end: HYPO_WINDOW_END,
    }
}
