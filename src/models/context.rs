use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveError};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Number of heart-rate zones a training records minutes for.
pub const ZONE_COUNT: usize = 4;

/// Parse an "HH:MM" clock time into minutes since midnight.
///
/// Hours past 23 wrap around (a "25:30" late-night entry is 01:30).
pub fn parse_hhmm(value: &str) -> Result<u32> {
    let invalid = || WaveError::InvalidTime(value.to_string());
    let (h, m) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = h.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = m.trim().parse().map_err(|_| invalid())?;
    if minutes >= 60 || hours >= 48 {
        return Err(invalid());
    }
    Ok((hours % 24) * 60 + minutes)
}

/// Format minutes since midnight as "HH:MM", wrapping past midnight.
pub fn format_hhmm(minutes: u32) -> String {
    let m = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", m / 60, m % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrainingType {
    #[default]
    Cardio,
    Strength,
    Hobby,
}

impl TrainingType {
    pub fn label(&self) -> &'static str {
        match self {
            TrainingType::Cardio => "cardio",
            TrainingType::Strength => "strength",
            TrainingType::Hobby => "hobby",
        }
    }
}

/// One logged training session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Training {
    /// Start time as "HH:MM".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Minutes spent in each heart-rate zone, lowest zone first.
    pub zones: Vec<f64>,

    #[serde(rename = "type")]
    pub kind: TrainingType,
}

impl Training {
    pub fn new(time: &str, zones: [f64; ZONE_COUNT], kind: TrainingType) -> Self {
        Self {
            time: Some(time.to_string()),
            zones: zones.to_vec(),
            kind,
        }
    }

    /// Minutes in zone `i`; missing, negative or non-finite entries read as 0.
    pub fn zone(&self, i: usize) -> f64 {
        self.zones
            .get(i)
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(0.0)
    }

    pub fn total_zone_minutes(&self) -> f64 {
        (0..ZONE_COUNT).map(|i| self.zone(i)).sum()
    }

    /// Minutes in zones 3 and 4.
    pub fn high_zone_minutes(&self) -> f64 {
        self.zone(2) + self.zone(3)
    }

    /// Minutes in zones 1 and 2.
    pub fn low_zone_minutes(&self) -> f64 {
        self.zone(0) + self.zone(1)
    }

    /// Parsed start time, if present and well formed.
    pub fn start_minutes(&self) -> Option<u32> {
        self.time
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .and_then(|t| parse_hhmm(t).ok())
    }

    /// A training counts only if it has a time or at least one nonzero zone.
    pub fn is_valid(&self) -> bool {
        self.start_minutes().is_some() || self.total_zone_minutes() > 0.0
    }

    /// Zone layout differs from the expected four entries.
    pub fn is_malformed(&self) -> bool {
        self.zones.len() > ZONE_COUNT
            || self.zones.iter().any(|v| !v.is_finite() || *v < 0.0)
            || self
                .time
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty() && parse_hhmm(t).is_err())
    }
}

/// The meal eaten before the one being evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousMeal {
    /// Clock time at which the previous wave ends, "HH:MM".
    pub wave_end: String,
    /// Glycemic load of the previous meal.
    #[serde(default = "default_previous_gl")]
    pub gl: f64,
}

fn default_previous_gl() -> f64 {
    15.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColdExposureKind {
    Shower,
    Bath,
    Swim,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColdExposure {
    pub kind: ColdExposureKind,
    /// Hours between the exposure and the meal.
    pub hours_ago: f64,
}

/// A training from the previous 48 hours, for next-day effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTraining {
    pub hours_ago: f64,
    pub kcal: f64,
    #[serde(rename = "type", default)]
    pub kind: TrainingType,
}

/// Day-level signals surrounding a meal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayContext {
    /// Meal clock time as "HH:MM"; noon when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_time: Option<String>,
    pub trainings: Vec<Training>,
    pub steps: f64,
    pub household_minutes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    /// Subjective sleep quality, 1 to 10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<f64>,
    /// Stress level, 1 to 10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydration_ml: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_since_last_meal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_meal: Option<PreviousMeal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cold_exposure: Option<ColdExposure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recent_trainings: Vec<RecentTraining>,
    /// Calibrated MET values per heart-rate zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub met_override: Option<[f64; ZONE_COUNT]>,
}

/// Noon, used when a meal carries no time.
pub const DEFAULT_MEAL_MINUTES: u32 = 12 * 60;

impl DayContext {
    /// Meal time in minutes since midnight, noon when absent or malformed.
    pub fn meal_minutes(&self) -> u32 {
        self.meal_time
            .as_deref()
            .and_then(|t| parse_hhmm(t).ok())
            .unwrap_or(DEFAULT_MEAL_MINUTES)
    }

    pub fn meal_hour(&self) -> u32 {
        self.meal_minutes() / 60
    }

    /// Trainings that pass the validity filter, in input order.
    pub fn valid_trainings(&self) -> impl Iterator<Item = &Training> {
        self.trainings.iter().filter(|t| t.is_valid())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    #[serde(alias = "мужской", alias = "m")]
    Male,
    #[serde(alias = "женский", alias = "f")]
    Female,
    #[default]
    #[serde(other)]
    Other,
}

/// Long-lived user profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Body weight in kg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in cm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub gender: Gender,
}

impl Profile {
    /// Body-mass index, when both weight and height are known.
    pub fn bmi(&self) -> Option<f64> {
        match (self.weight, self.height) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some(w / (h / 100.0).powi(2)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("14:30").unwrap(), 870);
        assert_eq!(parse_hhmm("00:05").unwrap(), 5);
        assert_eq!(parse_hhmm("25:00").unwrap(), 60);
        assert!(parse_hhmm("14").is_err());
        assert!(parse_hhmm("12:75").is_err());
        assert!(parse_hhmm("ab:cd").is_err());
    }

    #[test]
    fn test_format_hhmm_wraps() {
        assert_eq!(format_hhmm(870), "14:30");
        assert_eq!(format_hhmm(1500), "01:00");
    }

    #[test]
    fn test_training_validity() {
        let timed = Training::new("08:00", [0.0; 4], TrainingType::Cardio);
        assert!(timed.is_valid());

        let zones_only = Training {
            time: None,
            zones: vec![0.0, 10.0, 0.0, 0.0],
            kind: TrainingType::Hobby,
        };
        assert!(zones_only.is_valid());

        let empty = Training::default();
        assert!(!empty.is_valid());
    }

    #[test]
    fn test_training_zone_sanitizing() {
        let t = Training {
            time: Some("10:00".to_string()),
            zones: vec![5.0, -3.0, f64::NAN],
            kind: TrainingType::Strength,
        };
        assert!((t.total_zone_minutes() - 5.0).abs() < 0.001);
        assert!(t.is_malformed());
    }

    #[test]
    fn test_meal_minutes_default_noon() {
        let ctx = DayContext::default();
        assert_eq!(ctx.meal_minutes(), DEFAULT_MEAL_MINUTES);

        let ctx = DayContext {
            meal_time: Some("not a time".to_string()),
            ..Default::default()
        };
        assert_eq!(ctx.meal_minutes(), DEFAULT_MEAL_MINUTES);
    }

    #[test]
    fn test_bmi() {
        let p = Profile {
            weight: Some(95.0),
            height: Some(170.0),
            ..Default::default()
        };
        assert!((p.bmi().unwrap() - 32.87).abs() < 0.01);
        assert!(Profile::default().bmi().is_none());
    }

    #[test]
    fn test_gender_aliases() {
        let g: Gender = serde_json::from_str("\"женский\"").unwrap();
        assert_eq!(g, Gender::Female);
        let g: Gender = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(g, Gender::Other);
    }
}
