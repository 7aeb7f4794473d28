use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, WaveError};
use crate::models::MealItem;
use crate::scenario::Scenario;

/// A scenario file holds one scenario object or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    Many(Vec<Scenario>),
    One(Box<Scenario>),
}

/// Load every scenario from a JSON file.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(WaveError::ScenarioNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let scenarios = match serde_json::from_str(&content)? {
        ScenarioFile::Many(list) => list,
        ScenarioFile::One(one) => vec![*one],
    };
    Ok(scenarios)
}

/// Load the first scenario of a JSON file.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario> {
    let path = path.as_ref();
    load_scenarios(path)?
        .into_iter()
        .next()
        .ok_or_else(|| WaveError::ScenarioNotFound(format!("{} (empty)", path.display())))
}

/// Save a scenario as pretty-printed JSON.
pub fn save_scenario<P: AsRef<Path>>(path: P, scenario: &Scenario) -> Result<()> {
    let json = serde_json::to_string_pretty(scenario)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a product catalog: a JSON array of per-100 g product entries.
///
/// Deduplicates by lowercase name (last occurrence wins) and keeps file order.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<MealItem>> {
    let content = fs::read_to_string(path)?;
    let items: Vec<MealItem> = serde_json::from_str(&content)?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut catalog: Vec<MealItem> = Vec::with_capacity(items.len());
    for item in items {
        let key = item.name.trim().to_lowercase();
        match index.get(&key) {
            Some(&i) => catalog[i] = item,
            None => {
                index.insert(key, catalog.len());
                catalog.push(item);
            }
        }
    }
    Ok(catalog)
}
