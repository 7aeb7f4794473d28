use serde::Serialize;
use tracing::trace;

use crate::engine::classifier::FoodClassifier;
use crate::engine::constants::*;
use crate::models::nutrients::non_negative;
use crate::models::{
    AlcoholStrength, FoodForm, FoodTemperature, InsulinogenicType, MealItem, MealNutrients,
    MealOrder, ProteinType, Supplement,
};

/// Continuous GL multiplier: `0.15 + 1.15·(gl/40)^0.6`, saturating at 1.30.
///
/// Non-finite input is treated as unknown and yields a neutral 1.0.
pub fn continuous_gl_multiplier(gl: f64) -> f64 {
    if gl.is_nan() {
        return 1.0;
    }
    if gl <= 0.0 {
        return GL_CONTINUOUS_MIN;
    }
    if gl >= GL_CONTINUOUS_MAX_GL {
        return GL_CONTINUOUS_MAX;
    }
    let curved = (gl / GL_CONTINUOUS_MAX_GL).powf(GL_CONTINUOUS_EXPONENT);
    GL_CONTINUOUS_MIN + (GL_CONTINUOUS_MAX - GL_CONTINUOUS_MIN) * curved
}

/// Stepped GL category and its name.
pub fn gl_category(gl: f64) -> (f64, &'static str) {
    match GL_CATEGORIES.find(gl.max(0.0)) {
        Some(tier) => (tier.value, tier.name),
        None => (GL_CATEGORIES.fallback, "veryHigh"),
    }
}

/// GI category multiplier and its name.
pub fn gi_category(gi: f64) -> (f64, &'static str) {
    match GI_CATEGORIES.find(gi) {
        Some(tier) => (tier.value, tier.name),
        None => (GI_CATEGORIES.fallback, GI_VERY_HIGH),
    }
}

/// Wave multiplier by carb grams: 0.25 under 5 g, full from 30 g, linear between.
pub fn carbs_multiplier(carbs: f64) -> f64 {
    let carbs = non_negative(carbs);
    if carbs < CARBS_MIN_THRESHOLD {
        return CARBS_MIN_MULTIPLIER;
    }
    if carbs >= CARBS_FULL_THRESHOLD {
        return 1.0;
    }
    let ratio = (carbs - CARBS_MIN_THRESHOLD) / (CARBS_FULL_THRESHOLD - CARBS_MIN_THRESHOLD);
    CARBS_MIN_MULTIPLIER + ratio * (1.0 - CARBS_MIN_MULTIPLIER)
}

/// Scale for secondary nutrient bonuses: they matter less at low GL.
pub fn gl_scale_factor(gl: f64) -> f64 {
    if gl >= GI_BLEND_FULL_GL {
        1.0
    } else {
        (GL_SCALE_MIN + non_negative(gl) / GI_BLEND_FULL_GL * (1.0 - GL_SCALE_MIN)).max(GL_SCALE_MIN)
    }
}

/// GI multiplier weighted by GL: no effect below GL 7, full from GL 20.
pub fn blended_gi_multiplier(gi: f64, gl: Option<f64>) -> f64 {
    let (category, _) = gi_category(gi);
    match gl {
        None => category,
        Some(gl) if gl >= GI_BLEND_FULL_GL => category,
        Some(gl) if gl >= GI_BLEND_MIN_GL => {
            let weight = (gl - GI_BLEND_MIN_GL) / (GI_BLEND_FULL_GL - GI_BLEND_MIN_GL);
            1.0 + (category - 1.0) * weight
        }
        Some(_) => 1.0,
    }
}

pub fn protein_type_multiplier(kind: ProteinType) -> f64 {
    match kind {
        ProteinType::Animal => PROTEIN_MULT_ANIMAL,
        ProteinType::Plant => PROTEIN_MULT_PLANT,
        ProteinType::Whey => PROTEIN_MULT_WHEY,
        ProteinType::Mixed => PROTEIN_MULT_MIXED,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinBonus {
    pub bonus: f64,
    pub base_bonus: f64,
    pub multiplier: f64,
    pub kind: ProteinType,
    pub tier: Option<&'static str>,
}

/// Protein bonus: tiered base bonus scaled by how insulinogenic the source is.
pub fn protein_bonus(protein: f64, kind: ProteinType) -> ProteinBonus {
    let (base_bonus, tier) = PROTEIN_BONUS.bonus_tier(protein);
    let multiplier = protein_type_multiplier(kind);
    ProteinBonus {
        bonus: base_bonus * multiplier,
        base_bonus,
        multiplier,
        kind,
        tier,
    }
}

pub fn fiber_bonus(fiber: f64) -> f64 {
    FIBER_BONUS.bonus(fiber)
}

pub fn fat_bonus(fat: f64) -> f64 {
    FAT_BONUS.bonus(fat)
}

pub fn trans_fat_bonus(trans_fat: f64) -> f64 {
    TRANS_FAT_BONUS.bonus(trans_fat)
}

/// Insulin-index factors for a product type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsulinIndex {
    pub gl_boost: f64,
    pub peak_multiplier: f64,
    pub wave_multiplier: f64,
}

impl Default for InsulinIndex {
    fn default() -> Self {
        Self {
            gl_boost: 1.0,
            peak_multiplier: 1.0,
            wave_multiplier: 1.0,
        }
    }
}

pub fn insulin_index(kind: Option<InsulinogenicType>) -> InsulinIndex {
    let (gl_boost, peak_multiplier, wave_multiplier) = match kind {
        Some(InsulinogenicType::LiquidDairy) => II_LIQUID_DAIRY,
        Some(InsulinogenicType::SoftDairy) => II_SOFT_DAIRY,
        Some(InsulinogenicType::HardDairy) => II_HARD_DAIRY,
        Some(InsulinogenicType::PureProtein) => II_PURE_PROTEIN,
        Some(InsulinogenicType::HighFiber) => II_HIGH_FIBER,
        None => return InsulinIndex::default(),
    };
    InsulinIndex {
        gl_boost,
        peak_multiplier,
        wave_multiplier,
    }
}

/// GL raised by the insulin index, with the boost capped.
pub fn apply_insulin_index(base_gl: f64, kind: Option<InsulinogenicType>) -> f64 {
    let base_gl = non_negative(base_gl);
    if kind.is_none() || base_gl == 0.0 {
        return base_gl;
    }
    let boost = insulin_index(kind).gl_boost;
    if base_gl < II_LOW_GL {
        return base_gl * boost.min(II_LOW_GL_BOOST_CAP);
    }
    (base_gl * boost).min(base_gl + base_gl * II_MAX_GL_BOOST)
}

/// Legacy flat bonus per insulinogenic type, reported but not applied.
pub fn insulinogenic_bonus(kind: Option<InsulinogenicType>) -> f64 {
    match kind {
        Some(InsulinogenicType::LiquidDairy) => INSULINOGENIC_LIQUID_DAIRY,
        Some(InsulinogenicType::SoftDairy) => INSULINOGENIC_SOFT_DAIRY,
        Some(InsulinogenicType::HardDairy) => INSULINOGENIC_HARD_DAIRY,
        Some(InsulinogenicType::PureProtein) => INSULINOGENIC_PROTEIN,
        Some(InsulinogenicType::HighFiber) | None => 0.0,
    }
}

pub fn food_form_multiplier(form: Option<FoodForm>) -> f64 {
    match form {
        Some(FoodForm::Liquid) => FOOD_FORM_LIQUID,
        Some(FoodForm::Processed) => FOOD_FORM_PROCESSED,
        Some(FoodForm::Whole) => FOOD_FORM_WHOLE,
        None => 1.0,
    }
}

/// (wave bonus, peak multiplier) for the meal temperature.
pub fn temperature_effect(temperature: Option<FoodTemperature>) -> (f64, f64) {
    match temperature {
        Some(FoodTemperature::Hot) => TEMPERATURE_HOT,
        Some(FoodTemperature::Cold) => TEMPERATURE_COLD,
        Some(FoodTemperature::Room) | None => TEMPERATURE_ROOM,
    }
}

pub fn meal_order_bonus(order: Option<MealOrder>) -> f64 {
    match order {
        Some(MealOrder::CarbsLast) => MEAL_ORDER_CARBS_LAST,
        Some(MealOrder::CarbsFirst) => MEAL_ORDER_CARBS_FIRST,
        Some(MealOrder::Mixed) | None => 0.0,
    }
}

/// (wave bonus, peak multiplier) for a large meal.
pub fn large_portion(kcal: f64) -> (f64, f64) {
    let bonus = LARGE_PORTION_BONUS.bonus(kcal).min(LARGE_PORTION_MAX_BONUS);
    let peak = if kcal.is_finite() && kcal > 0.0 {
        LARGE_PORTION_PEAK.lookup(kcal)
    } else {
        1.0
    };
    (bonus, peak)
}

pub fn alcohol_bonus(alcohol: Option<AlcoholStrength>) -> f64 {
    match alcohol {
        Some(AlcoholStrength::Strong) => ALCOHOL_STRONG,
        Some(AlcoholStrength::Medium) => ALCOHOL_MEDIUM,
        Some(AlcoholStrength::Weak) => ALCOHOL_WEAK,
        None => 0.0,
    }
}

pub fn caffeine_bonus(has_caffeine: bool) -> f64 {
    if has_caffeine { CAFFEINE_BONUS } else { 0.0 }
}

pub fn spicy_multiplier(is_spicy: bool) -> f64 {
    if is_spicy { SPICY_MULTIPLIER } else { 1.0 }
}

pub fn resistant_starch_bonus(has_resistant_starch: bool) -> f64 {
    if has_resistant_starch {
        RESISTANT_STARCH_BONUS
    } else {
        0.0
    }
}

/// Supplement effects add up; each supplement counts once.
pub fn supplements_bonus(supplements: &[Supplement]) -> f64 {
    let mut seen = Vec::with_capacity(supplements.len());
    let mut total = 0.0;
    for s in supplements {
        if seen.contains(s) {
            continue;
        }
        seen.push(*s);
        total += match s {
            Supplement::Vinegar => SUPPLEMENT_VINEGAR,
            Supplement::Cinnamon => SUPPLEMENT_CINNAMON,
            Supplement::Berberine => SUPPLEMENT_BERBERINE,
        };
    }
    total
}

/// Nutrient part of the wave-length multiplier, with every term exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientMultiplier {
    pub total: f64,
    pub gl: f64,
    pub gi: f64,
    pub gi_category: &'static str,
    pub protein: ProteinBonus,
    pub fiber: f64,
    pub fat: f64,
    pub gl_multiplier: f64,
    pub gl_category: &'static str,
    pub gl_scale: f64,
    pub liquid: f64,
    pub food_form: f64,
    pub insulin_index: InsulinIndex,
}

/// GL the engine works with: the caller's override, else GI × carbs boosted
/// by the meal's insulin index.
pub fn effective_gl(nutrients: &MealNutrients) -> f64 {
    match nutrients.gl {
        Some(gl) if gl.is_finite() && gl >= 0.0 => gl,
        _ => apply_insulin_index(nutrients.base_glycemic_load(), nutrients.insulinogenic),
    }
}

/// Wave-length multiplier from meal composition.
///
/// Formula: (gi + protein + fiber + fat) × glMult × liquid × foodForm × insulinIndex.wave,
/// with the three nutrient bonuses scaled down at low GL.
pub fn nutrient_multiplier(nutrients: &MealNutrients) -> NutrientMultiplier {
    let gl = effective_gl(nutrients);
    let gl_multiplier = continuous_gl_multiplier(gl);
    let gl_scale = gl_scale_factor(gl);
    let (_, gi_category_name) = gi_category(nutrients.effective_gi());
    let gi = blended_gi_multiplier(nutrients.effective_gi(), Some(gl));

    let mut protein = protein_bonus(nutrients.protein, nutrients.protein_type);
    protein.bonus *= gl_scale;
    let fiber = fiber_bonus(nutrients.fiber) * gl_scale;
    let fat = fat_bonus(nutrients.fat) * gl_scale;

    let liquid = if nutrients.is_liquid { LIQUID_WAVE_MULT } else { 1.0 };
    let food_form = food_form_multiplier(nutrients.food_form);
    let ii = insulin_index(nutrients.insulinogenic);

    let base = gi + protein.bonus + fiber + fat;
    let total = base * gl_multiplier * liquid * food_form * ii.wave_multiplier;
    trace!(gl, gi, base, total, "nutrient multiplier");

    NutrientMultiplier {
        total,
        gl,
        gi,
        gi_category: gi_category_name,
        protein,
        fiber,
        fat,
        gl_multiplier,
        gl_category: gl_category(gl).1,
        gl_scale,
        liquid,
        food_form,
        insulin_index: ii,
    }
}

/// Additive food-side wave bonuses and peak multipliers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodBonuses {
    pub trans_fat: f64,
    pub alcohol: f64,
    pub caffeine: f64,
    pub temperature: f64,
    pub large_portion: f64,
    pub meal_order: f64,
    pub resistant_starch: f64,
    pub supplements: f64,
    pub spicy_multiplier: f64,
    pub temperature_peak: f64,
    pub large_portion_peak: f64,
}

impl FoodBonuses {
    pub fn sum(&self) -> f64 {
        self.trans_fat
            + self.alcohol
            + self.caffeine
            + self.temperature
            + self.large_portion
            + self.meal_order
            + self.resistant_starch
            + self.supplements
    }
}

pub fn food_bonuses(nutrients: &MealNutrients) -> FoodBonuses {
    let (temperature, temperature_peak) = temperature_effect(nutrients.temperature);
    let (large_portion, large_portion_peak) = large_portion(nutrients.kcal);
    FoodBonuses {
        trans_fat: trans_fat_bonus(nutrients.trans_fat),
        alcohol: alcohol_bonus(nutrients.alcohol),
        caffeine: caffeine_bonus(nutrients.has_caffeine),
        temperature,
        large_portion,
        meal_order: meal_order_bonus(nutrients.meal_order),
        resistant_starch: resistant_starch_bonus(nutrients.has_resistant_starch),
        supplements: supplements_bonus(&nutrients.supplements),
        spicy_multiplier: spicy_multiplier(nutrients.is_spicy),
        temperature_peak,
        large_portion_peak,
    }
}

/// Resolve a list of product portions into meal totals.
///
/// GI is weighted by carbs, GL is summed per item after each item's
/// insulin-index boost, and classifier traits are merged across items.
pub fn aggregate_meal(items: &[MealItem], classifier: &dyn FoodClassifier) -> MealNutrients {
    let mut totals = MealNutrients::default();
    if items.is_empty() {
        return totals;
    }

    let mut total_grams = 0.0;
    let mut liquid_grams = 0.0;
    let mut weighted_gi = 0.0;
    let mut adjusted_gl = 0.0;
    let mut protein_by_type: Vec<(ProteinType, f64)> = Vec::new();
    let mut hot = false;
    let mut cold = false;

    for item in items {
        let grams = item.portion_grams();
        let scale = grams / 100.0;
        let traits = classifier.classify(&item.name, item.category.as_deref());
        let gi = item
            .gi
            .filter(|g| g.is_finite() && *g > 0.0)
            .unwrap_or(crate::models::nutrients::DEFAULT_GI);

        let carbs = item.carbs_per_100() * scale;
        let protein = non_negative(item.protein100) * scale;

        total_grams += grams;
        totals.carbs += carbs;
        totals.simple_carbs += non_negative(item.simple100) * scale;
        totals.complex_carbs += non_negative(item.complex100) * scale;
        totals.protein += protein;
        totals.fat += non_negative(item.fat100) * scale;
        totals.fiber += non_negative(item.fiber100) * scale;
        totals.trans_fat += non_negative(item.trans100) * scale;
        totals.kcal += non_negative(item.kcal100) * scale;

        weighted_gi += gi * carbs;
        adjusted_gl += apply_insulin_index(gi * carbs / 100.0, traits.insulinogenic);

        if traits.is_liquid {
            liquid_grams += grams;
        }
        if traits.insulinogenic > totals.insulinogenic {
            totals.insulinogenic = traits.insulinogenic;
        }
        if traits.alcohol > totals.alcohol {
            totals.alcohol = traits.alcohol;
        }
        totals.is_spicy |= traits.is_spicy;
        totals.has_caffeine |= traits.has_caffeine;
        totals.has_resistant_starch |= traits.has_resistant_starch;
        match traits.temperature {
            Some(FoodTemperature::Hot) => hot = true,
            Some(FoodTemperature::Cold) => cold = true,
            _ => {}
        }
        if protein > 0.0 {
            match protein_by_type.iter_mut().find(|(k, _)| *k == traits.protein_type) {
                Some((_, grams)) => *grams += protein,
                None => protein_by_type.push((traits.protein_type, protein)),
            }
        }
    }

    totals.gi = if totals.carbs > 0.0 {
        (weighted_gi / totals.carbs).round()
    } else {
        crate::models::nutrients::DEFAULT_GI
    };
    totals.gl = Some((adjusted_gl * 10.0).round() / 10.0);
    totals.is_liquid = total_grams > 0.0 && liquid_grams / total_grams > LIQUID_RATIO_THRESHOLD;
    totals.temperature = match (hot, cold) {
        (true, false) => Some(FoodTemperature::Hot),
        (false, true) => Some(FoodTemperature::Cold),
        _ => Some(FoodTemperature::Room),
    };
    totals.protein_type = dominant_protein_type(&protein_by_type);
    totals
}

/// Protein type contributing most grams; mixed when nothing dominates.
fn dominant_protein_type(by_type: &[(ProteinType, f64)]) -> ProteinType {
    let total: f64 = by_type.iter().map(|(_, g)| g).sum();
    by_type
        .iter()
        .filter(|(kind, grams)| *kind != ProteinType::Mixed && *grams > total * 0.5)
        .map(|(kind, _)| *kind)
        .next()
        .unwrap_or(ProteinType::Mixed)
}
