use serde::{Deserialize, Serialize};

/// Glycemic index assumed when a product carries none.
pub const DEFAULT_GI: f64 = 50.0;

/// Dominant protein source of a meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProteinType {
    Animal,
    Plant,
    Whey,
    #[default]
    Mixed,
}

/// Products whose insulin index runs well above what their GI predicts.
///
/// Variants are ordered weakest to strongest insulinogenic effect so that the
/// strongest item of a meal wins with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsulinogenicType {
    HighFiber,
    HardDairy,
    PureProtein,
    SoftDairy,
    LiquidDairy,
}

/// Alcohol class, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlcoholStrength {
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FoodForm {
    Liquid,
    Processed,
    Whole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FoodTemperature {
    Hot,
    Cold,
    Room,
}

/// Order in which carbohydrates were eaten relative to the rest of the meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MealOrder {
    CarbsLast,
    CarbsFirst,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Supplement {
    Vinegar,
    Cinnamon,
    Berberine,
}

/// Resolved nutrient totals for one meal.
///
/// Grams for every macro, kcal for energy. Everything past `kcal` is optional
/// meal-level evidence; leaving it at the default is always neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealNutrients {
    pub carbs: f64,
    pub simple_carbs: f64,
    pub complex_carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub trans_fat: f64,
    pub gi: f64,
    pub kcal: f64,

    /// Glycemic load already adjusted by the caller (e.g. insulin index).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gl: Option<f64>,
    pub is_liquid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_form: Option<FoodForm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<FoodTemperature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_order: Option<MealOrder>,
    pub protein_type: ProteinType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulinogenic: Option<InsulinogenicType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<AlcoholStrength>,
    pub has_caffeine: bool,
    pub is_spicy: bool,
    pub has_resistant_starch: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supplements: Vec<Supplement>,
}

impl Default for MealNutrients {
    fn default() -> Self {
        Self {
            carbs: 0.0,
            simple_carbs: 0.0,
            complex_carbs: 0.0,
            protein: 0.0,
            fat: 0.0,
            fiber: 0.0,
            trans_fat: 0.0,
            gi: DEFAULT_GI,
            kcal: 0.0,
            gl: None,
            is_liquid: false,
            food_form: None,
            temperature: None,
            meal_order: None,
            protein_type: ProteinType::Mixed,
            insulinogenic: None,
            alcohol: None,
            has_caffeine: false,
            is_spicy: false,
            has_resistant_starch: false,
            supplements: Vec::new(),
        }
    }
}

impl MealNutrients {
    /// GI with the neutral default substituted for missing or nonsensical values.
    #[inline]
    pub fn effective_gi(&self) -> f64 {
        if self.gi.is_finite() && self.gi > 0.0 {
            self.gi.min(150.0)
        } else {
            DEFAULT_GI
        }
    }

    /// Plain glycemic load `GI × carbs / 100`, ignoring any override.
    #[inline]
    pub fn base_glycemic_load(&self) -> f64 {
        self.effective_gi() * non_negative(self.carbs) / 100.0
    }

    /// Share of simple sugars in total carbs (0 when there are no carbs).
    pub fn simple_ratio(&self) -> f64 {
        let carbs = non_negative(self.carbs);
        if carbs > 0.0 {
            (non_negative(self.simple_carbs) / carbs).min(1.0)
        } else {
            0.0
        }
    }

    /// Basic validation: finite, non-negative macros.
    pub fn is_valid(&self) -> bool {
        [
            self.carbs,
            self.simple_carbs,
            self.complex_carbs,
            self.protein,
            self.fat,
            self.fiber,
            self.trans_fat,
            self.kcal,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "C:{} (S:{} X:{}) P:{} F:{} Fi:{} GI:{} kcal:{}",
            self.carbs,
            self.simple_carbs,
            self.complex_carbs,
            self.protein,
            self.fat,
            self.fiber,
            self.gi,
            self.kcal
        )
    }
}

/// One product portion inside a meal, with per-100 g nutrient data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Portion size; 100 g when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grams: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gi: Option<f64>,
    pub kcal100: f64,
    pub carbs100: f64,
    pub simple100: f64,
    pub complex100: f64,
    pub protein100: f64,
    pub fat100: f64,
    pub fiber100: f64,
    pub trans100: f64,
}

impl MealItem {
    pub fn portion_grams(&self) -> f64 {
        match self.grams {
            Some(g) if g.is_finite() && g > 0.0 => g,
            _ => 100.0,
        }
    }

    /// Carbs per 100 g, preferring the simple/complex breakdown when present.
    pub fn carbs_per_100(&self) -> f64 {
        let breakdown = non_negative(self.simple100) + non_negative(self.complex100);
        if breakdown > 0.0 {
            breakdown
        } else {
            non_negative(self.carbs100)
        }
    }
}

#[inline]
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nutrients() -> MealNutrients {
        MealNutrients {
            carbs: 40.0,
            simple_carbs: 10.0,
            complex_carbs: 30.0,
            protein: 25.0,
            fat: 12.0,
            fiber: 6.0,
            gi: 60.0,
            kcal: 480.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_base_glycemic_load() {
        let n = sample_nutrients();
        assert!((n.base_glycemic_load() - 24.0).abs() < 0.001);
    }

    #[test]
    fn test_missing_gi_uses_default() {
        let n = MealNutrients {
            carbs: 20.0,
            gi: 0.0,
            ..Default::default()
        };
        assert!((n.effective_gi() - DEFAULT_GI).abs() < 0.001);
        assert!((n.base_glycemic_load() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_simple_ratio() {
        let n = sample_nutrients();
        assert!((n.simple_ratio() - 0.25).abs() < 0.001);
        assert_eq!(MealNutrients::default().simple_ratio(), 0.0);
    }

    #[test]
    fn test_is_valid() {
        assert!(sample_nutrients().is_valid());
        let mut bad = sample_nutrients();
        bad.fat = -1.0;
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{"carbs": 60, "simpleCarbs": 55, "complexCarbs": 5, "isLiquid": true}"#;
        let n: MealNutrients = serde_json::from_str(json).unwrap();
        assert!((n.simple_carbs - 55.0).abs() < 0.001);
        assert!(n.is_liquid);
        assert!((n.gi - DEFAULT_GI).abs() < 0.001);
        assert_eq!(n.protein_type, ProteinType::Mixed);
    }

    #[test]
    fn test_item_carbs_prefer_breakdown() {
        let item = MealItem {
            name: "Rice".to_string(),
            carbs100: 30.0,
            simple100: 1.0,
            complex100: 27.0,
            ..Default::default()
        };
        assert!((item.carbs_per_100() - 28.0).abs() < 0.001);
        assert!((item.portion_grams() - 100.0).abs() < 0.001);
    }
}
