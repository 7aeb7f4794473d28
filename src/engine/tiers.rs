use serde::Serialize;

/// Every tiered factor the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FactorId {
    GiCategory,
    GlCategory,
    ProteinBonus,
    FiberBonus,
    FatBonus,
    TransFat,
    LargePortion,
    LargePortionPeak,
    WorkoutBonus,
    PostprandialProximity,
    PostprandialKcal,
    NeatBonus,
    StepsBonus,
    FastingBonus,
    StressBonus,
    SleepBonus,
    SleepQuality,
    HydrationBonus,
    AgeBonus,
    BmiBonus,
    PostWorkoutGap,
    PostWorkoutKcal,
    PreWorkoutGap,
    StepsContext,
    HouseholdContext,
    IrBmi,
    IrSleep,
    IrStress,
    IrAge,
    NdteBmi,
    NdteDecay,
    Autophagy,
}

impl FactorId {
    pub fn label(&self) -> &'static str {
        match self {
            FactorId::GiCategory => "GI category",
            FactorId::GlCategory => "GL category",
            FactorId::ProteinBonus => "protein",
            FactorId::FiberBonus => "fiber",
            FactorId::FatBonus => "fat",
            FactorId::TransFat => "trans fat",
            FactorId::LargePortion => "large portion",
            FactorId::LargePortionPeak => "large portion peak",
            FactorId::WorkoutBonus => "workout",
            FactorId::PostprandialProximity => "postprandial proximity",
            FactorId::PostprandialKcal => "postprandial kcal",
            FactorId::NeatBonus => "NEAT",
            FactorId::StepsBonus => "steps",
            FactorId::FastingBonus => "fasting",
            FactorId::StressBonus => "stress",
            FactorId::SleepBonus => "sleep",
            FactorId::SleepQuality => "sleep quality",
            FactorId::HydrationBonus => "hydration",
            FactorId::AgeBonus => "age",
            FactorId::BmiBonus => "BMI",
            FactorId::PostWorkoutGap => "post-workout gap",
            FactorId::PostWorkoutKcal => "post-workout kcal",
            FactorId::PreWorkoutGap => "pre-workout gap",
            FactorId::StepsContext => "steps context",
            FactorId::HouseholdContext => "household context",
            FactorId::IrBmi => "IR BMI",
            FactorId::IrSleep => "IR sleep",
            FactorId::IrStress => "IR stress",
            FactorId::IrAge => "IR age",
            FactorId::NdteBmi => "NDTE BMI",
            FactorId::NdteDecay => "NDTE decay",
            FactorId::Autophagy => "autophagy",
        }
    }
}

/// How a measurement is compared against a tier threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    /// `x >= threshold`; tiers listed highest threshold first.
    AtLeast,
    /// `x < threshold`; tiers listed lowest threshold first.
    Below,
    /// `x <= threshold`; tiers listed lowest threshold first.
    AtMost,
}

impl Comparison {
    #[inline]
    fn matches(&self, x: f64, threshold: f64) -> bool {
        match self {
            Comparison::AtLeast => x >= threshold,
            Comparison::Below => x < threshold,
            Comparison::AtMost => x <= threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tier {
    pub threshold: f64,
    pub value: f64,
    pub name: &'static str,
}

/// Build a `TierTable` whose tier slice is promoted to `'static`.
macro_rules! tier_table {
    ($id:expr, $cmp:expr, fallback: $fb:expr, [$(($t:expr, $v:expr, $n:expr)),* $(,)?]) => {
        $crate::engine::tiers::TierTable {
            id: $id,
            comparison: $cmp,
            tiers: &[$($crate::engine::tiers::Tier { threshold: $t, value: $v, name: $n }),*],
            fallback: $fb,
        }
    };
}
pub(crate) use tier_table;

/// Immutable tier table: the first matching tier in listed order wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierTable {
    pub id: FactorId,
    pub comparison: Comparison,
    pub tiers: &'static [Tier],
    /// Value when no tier matches.
    pub fallback: f64,
}

impl TierTable {
    /// First tier matching `x`, with no input guarding.
    pub fn find(&self, x: f64) -> Option<&'static Tier> {
        if x.is_nan() {
            return None;
        }
        self.tiers
            .iter()
            .find(|tier| self.comparison.matches(x, tier.threshold))
    }

    /// Raw lookup: matching tier value or the fallback.
    pub fn lookup(&self, x: f64) -> f64 {
        self.find(x).map(|t| t.value).unwrap_or(self.fallback)
    }

    /// Bonus lookup: missing, zero, negative or non-finite input is neutral.
    pub fn bonus(&self, x: f64) -> f64 {
        if !x.is_finite() || x <= 0.0 {
            return self.fallback;
        }
        self.lookup(x)
    }

    /// Like [`bonus`](Self::bonus) but also reports the matched tier name.
    pub fn bonus_tier(&self, x: f64) -> (f64, Option<&'static str>) {
        if !x.is_finite() || x <= 0.0 {
            return (self.fallback, None);
        }
        match self.find(x) {
            Some(tier) => (tier.value, Some(tier.name)),
            None => (self.fallback, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static AT_LEAST: TierTable = tier_table!(
        FactorId::FiberBonus,
        Comparison::AtLeast,
        fallback: 0.0,
        [(15.0, -0.20, "high"), (10.0, -0.15, "medium"), (5.0, -0.08, "low")]
    );

    static BELOW: TierTable = tier_table!(
        FactorId::SleepBonus,
        Comparison::Below,
        fallback: 0.0,
        [(4.0, 0.20, "severe"), (5.0, 0.15, "moderate"), (6.0, 0.08, "mild")]
    );

    #[test]
    fn test_first_match_not_cumulative() {
        assert!((AT_LEAST.bonus(12.0) - (-0.15)).abs() < 1e-9);
        assert!((AT_LEAST.bonus(100.0) - (-0.20)).abs() < 1e-9);
        assert_eq!(AT_LEAST.bonus(4.9), 0.0);
    }

    #[test]
    fn test_boundaries_inclusive() {
        assert!((AT_LEAST.bonus(5.0) - (-0.08)).abs() < 1e-9);
        assert!((BELOW.bonus(4.0) - 0.15).abs() < 1e-9);
        assert!((BELOW.bonus(3.99) - 0.20).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs_are_neutral() {
        assert_eq!(BELOW.bonus(0.0), 0.0);
        assert_eq!(BELOW.bonus(-2.0), 0.0);
        assert_eq!(AT_LEAST.bonus(f64::NAN), 0.0);
        assert_eq!(AT_LEAST.bonus(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_bonus_tier_name() {
        assert_eq!(BELOW.bonus_tier(4.5).1, Some("moderate"));
        assert_eq!(BELOW.bonus_tier(7.0), (0.0, None));
    }
}
