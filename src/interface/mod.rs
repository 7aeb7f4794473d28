pub mod export;
pub mod prompts;
pub mod render;

pub use export::write_curve_csv;
pub use prompts::{
    collect_scenario, match_products, prompt_day_context, prompt_meal_items, prompt_number,
    prompt_optional_number, prompt_profile, prompt_time, prompt_trainings, prompt_yes_no,
};
pub use render::{display_prediction, display_wave_result};
