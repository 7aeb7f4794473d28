pub mod cli;
pub mod engine;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod scenario;
pub mod sweep;

pub use engine::{WaveCache, WaveConfig, compute_insulin_wave, compute_insulin_wave_with};
pub use error::{Result, WaveError};
pub use models::{DayContext, MealItem, MealNutrients, Profile, WaveResult};
