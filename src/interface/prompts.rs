use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{Result, WaveError};
use crate::models::{
    DayContext, Gender, MealItem, Profile, Training, TrainingType, parse_hhmm,
};
use crate::scenario::Scenario;

/// Minimum similarity for a catalog product to be offered as a match.
const FUZZY_MATCH_MIN: f64 = 0.7;

/// Prompt for a number with a default.
pub fn prompt_number(prompt: &str, default: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| WaveError::InvalidInput(format!("Invalid number: {}", input)))
}

/// Prompt for a number that may be skipped with an empty answer.
pub fn prompt_optional_number(prompt: &str) -> Result<Option<f64>> {
    let input: String = Input::new()
        .with_prompt(format!("{} (Enter to skip)", prompt))
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| WaveError::InvalidInput(format!("Invalid number: {}", input)))
}

/// Prompt for an "HH:MM" clock time.
pub fn prompt_time(prompt: &str, default: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    let input = input.trim().to_string();
    parse_hhmm(&input)?;
    Ok(input)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Catalog products ranked by name similarity, best first.
pub fn match_products<'a>(catalog: &'a [MealItem], query: &str) -> Vec<(&'a MealItem, f64)> {
    let query = query.trim().to_lowercase();
    if let Some(item) = catalog.iter().find(|i| i.name.to_lowercase() == query) {
        return vec![(item, 1.0)];
    }

    let mut candidates: Vec<(&MealItem, f64)> = catalog
        .iter()
        .map(|i| (i, jaro_winkler(&i.name.to_lowercase(), &query)))
        .filter(|(_, score)| *score > FUZZY_MATCH_MIN)
        .collect();
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Resolve a typed product name against the catalog, asking when unsure.
fn pick_product<'a>(catalog: &'a [MealItem], query: &str) -> Result<Option<&'a MealItem>> {
    let candidates = match_products(catalog, query);

    match candidates.as_slice() {
        [] => {
            println!("No matching product found for '{}'", query);
            Ok(None)
        }
        [(item, score)] if *score >= 1.0 => Ok(Some(*item)),
        [(item, _)] => {
            let confirm = prompt_yes_no(&format!("Did you mean '{}'?", item.name), true)?;
            Ok(confirm.then_some(*item))
        }
        _ => {
            let options: Vec<String> = candidates
                .iter()
                .take(5)
                .map(|(i, _)| i.name.clone())
                .collect();
            let mut selection_options = options.clone();
            selection_options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&selection_options)
                .default(0)
                .interact()?;

            if selection < options.len() {
                Ok(Some(candidates[selection].0))
            } else {
                Ok(None)
            }
        }
    }
}

/// Prompt for meal products until an empty name is entered.
pub fn prompt_meal_items(catalog: &[MealItem]) -> Result<Vec<MealItem>> {
    let mut items = Vec::new();

    loop {
        let input: String = Input::new()
            .with_prompt("Add a product (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            break;
        }

        let Some(product) = pick_product(catalog, input)? else {
            continue;
        };
        let grams = prompt_number(&format!("Grams of {}", product.name), 100.0)?;
        items.push(MealItem {
            grams: Some(grams),
            ..product.clone()
        });
        println!("Added: {} {}g", product.name, grams);
    }

    Ok(items)
}

/// Prompt for the trainings of the day.
pub fn prompt_trainings() -> Result<Vec<Training>> {
    let kinds = [TrainingType::Cardio, TrainingType::Strength, TrainingType::Hobby];
    let labels: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
    let mut trainings = Vec::new();

    while prompt_yes_no("Add a training?", trainings.is_empty())? {
        let time = prompt_time("Training start (HH:MM)", "18:00")?;
        let kind = Select::new()
            .with_prompt("Training type")
            .items(&labels)
            .default(0)
            .interact()?;
        let mut zones = [0.0; 4];
        for (i, zone) in zones.iter_mut().enumerate() {
            *zone = prompt_number(&format!("Minutes in zone {}", i + 1), 0.0)?;
        }
        trainings.push(Training::new(&time, zones, kinds[kind]));
    }

    Ok(trainings)
}

/// Prompt for the eater's profile.
pub fn prompt_profile() -> Result<Profile> {
    let genders = [Gender::Male, Gender::Female, Gender::Other];
    let gender = Select::new()
        .with_prompt("Gender")
        .items(&["male", "female", "other"])
        .default(2)
        .interact()?;

    Ok(Profile {
        age: prompt_optional_number("Age")?,
        weight: prompt_optional_number("Weight (kg)")?,
        height: prompt_optional_number("Height (cm)")?,
        gender: genders[gender],
    })
}

/// Prompt for the day context around the meal.
pub fn prompt_day_context() -> Result<DayContext> {
    let meal_time = prompt_time("Meal time (HH:MM)", "12:00")?;
    let trainings = prompt_trainings()?;

    Ok(DayContext {
        meal_time: Some(meal_time),
        trainings,
        steps: prompt_number("Steps so far today", 0.0)?,
        household_minutes: prompt_number("Minutes of household activity", 0.0)?,
        sleep_hours: prompt_optional_number("Hours slept")?,
        stress_level: prompt_optional_number("Stress level 1-10")?,
        hours_since_last_meal: prompt_optional_number("Hours since the last meal")?,
        ..Default::default()
    })
}

/// Collect a full scenario interactively.
pub fn collect_scenario(catalog: &[MealItem]) -> Result<Scenario> {
    let items = prompt_meal_items(catalog)?;
    if items.is_empty() {
        return Err(WaveError::InvalidInput("No products entered".to_string()));
    }
    let context = prompt_day_context()?;
    let profile = prompt_profile()?;

    Ok(Scenario {
        id: Some("entered".to_string()),
        items,
        context,
        profile,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<MealItem> {
        ["Buckwheat", "Banana", "Bread", "Kefir"]
            .iter()
            .map(|n| MealItem {
                name: n.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let c = catalog();
        let m = match_products(&c, "  kefir ");
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].0.name, "Kefir");
        assert_eq!(m[0].1, 1.0);
    }

    #[test]
    fn test_fuzzy_match_ranked() {
        let c = catalog();
        let m = match_products(&c, "buckweat");
        assert!(!m.is_empty());
        assert_eq!(m[0].0.name, "Buckwheat");
        assert!(m.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_no_match() {
        assert!(match_products(&catalog(), "zzzz").is_empty());
    }
}
