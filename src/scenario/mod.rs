mod persistence;

use serde::{Deserialize, Serialize};

use crate::engine::aggregate_meal;
use crate::engine::classifier::FoodClassifier;
use crate::error::{Result, WaveError};
use crate::models::{DayContext, MealItem, MealNutrients, Profile};

pub use persistence::{load_catalog, load_scenario, load_scenarios, save_scenario};

/// One meal with its day context and the eater's profile.
///
/// The meal is given either as ready totals (`nutrients`) or as product
/// portions (`items`) that are aggregated on load. Totals win when both
/// are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    /// Meal id, used as the cache key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<MealNutrients>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MealItem>,
    pub context: DayContext,
    pub profile: Profile,
}

impl Scenario {
    pub fn id_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.id.as_deref().unwrap_or(fallback)
    }

    /// Meal totals, aggregating `items` through the classifier when needed.
    pub fn resolve_nutrients(&self, classifier: &dyn FoodClassifier) -> Result<MealNutrients> {
        match &self.nutrients {
            Some(n) => Ok(n.clone()),
            None if !self.items.is_empty() => Ok(aggregate_meal(&self.items, classifier)),
            None => Err(WaveError::InvalidInput(
                "scenario has neither nutrients nor items".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::KeywordClassifier;

    #[test]
    fn test_nutrients_win_over_items() {
        let scenario = Scenario {
            nutrients: Some(MealNutrients {
                carbs: 12.0,
                ..Default::default()
            }),
            items: vec![MealItem {
                name: "Rice".to_string(),
                carbs100: 80.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let n = scenario.resolve_nutrients(&KeywordClassifier::default()).unwrap();
        assert_eq!(n.carbs, 12.0);
    }

    #[test]
    fn test_items_aggregated() {
        let scenario = Scenario {
            items: vec![MealItem {
                name: "Kefir".to_string(),
                grams: Some(250.0),
                carbs100: 4.0,
                protein100: 3.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let n = scenario.resolve_nutrients(&KeywordClassifier::default()).unwrap();
        assert!((n.carbs - 10.0).abs() < 1e-9);
        assert!(n.is_liquid);
    }

    #[test]
    fn test_empty_meal_rejected() {
        let err = Scenario::default()
            .resolve_nutrients(&KeywordClassifier::default())
            .unwrap_err();
        assert!(matches!(err, WaveError::InvalidInput(_)));
    }
}
