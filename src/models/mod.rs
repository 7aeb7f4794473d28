pub mod context;
pub mod nutrients;
pub mod wave;

pub use context::{
    ColdExposure, ColdExposureKind, DayContext, Gender, PreviousMeal, Profile, RecentTraining,
    Training, TrainingType, format_hhmm, parse_hhmm,
};
pub use nutrients::{
    AlcoholStrength, FoodForm, FoodTemperature, InsulinogenicType, MealItem, MealNutrients,
    MealOrder, ProteinType, Supplement,
};
pub use wave::{MultiplierBreakdown, WaveResult};
