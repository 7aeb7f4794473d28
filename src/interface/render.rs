use crate::engine::predictor::{LevelReading, ThresholdCrossings};
use crate::engine::scoring::ScoreComponent;
use crate::models::WaveResult;

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn minutes_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |m| format!("{:.0} min", m))
}

/// Display a wave result as a formatted report.
pub fn display_wave_result(result: &WaveResult, verbose: bool) {
    println!();
    println!("=== Insulin Wave ===");
    println!();
    println!(
        "Wave: {} min ({:.2} h), {} -> {}",
        result.wave_minutes, result.wave_hours, result.start_time, result.end_time
    );
    println!(
        "Peak: {:.2} at {:.0} min | shape: {} (fast {:.0}%)",
        result.peak_value,
        result.peak_time,
        result.shape.label(),
        result.fast_contribution * 100.0
    );
    println!(
        "AUC: {:.3} (incremental {:.3}, {}) | scored {:.3}",
        result.auc.total,
        result.auc.incremental,
        result.auc.pattern.label(),
        result.scored_auc
    );
    println!(
        "Score: {} {} {}",
        result.score_level.icon(),
        result.score,
        result.score_level.label()
    );

    if let Some(activity) = &result.activity {
        println!("Context: {} - {}", activity.badge, activity.desc);
    }
    println!(
        "IR score: {:.2} ({})",
        result.ir.score,
        result.ir.band.label()
    );
    println!(
        "Phases: rise {:.0} min, plateau {:.0} min, decline {:.0} min; lipolysis from {:.0} min",
        result.phases.rise,
        result.phases.plateau,
        result.phases.decline,
        result.phases.lipolysis_start
    );
    if result.hypoglycemia.has_risk {
        println!(
            "Warning: reactive hypoglycemia risk {:.0}% between {:.0} and {:.0} min",
            result.hypoglycemia.score * 100.0,
            result.hypoglycemia.window_start,
            result.hypoglycemia.window_end
        );
    }
    if result.next_day.active {
        println!(
            "Yesterday's training: wave -{:.0}%, peak -{:.0}%",
            result.next_day.wave_reduction * 100.0,
            result.next_day.peak_reduction * 100.0
        );
    }

    if !result.recommendations.is_empty() {
        println!();
        println!("--- Recommendations ---");
        for rec in &result.recommendations {
            println!("  {} {}", rec.icon, rec.text);
        }
    }

    if verbose {
        display_score_components(result);
        display_multipliers(result);
    }
    println!();
}

fn display_score_components(result: &WaveResult) {
    let c = &result.score_components;
    let rows: [(&str, &ScoreComponent); 5] = [
        ("peak height", &c.peak_height),
        ("duration", &c.duration),
        ("shape", &c.shape),
        ("auc", &c.auc),
        ("context", &c.context),
    ];

    println!();
    println!("--- Score components ---");
    for (name, component) in rows {
        println!(
            "  {:<12} value {:>8.3}  score {:>5.1}  weight {:.2}",
            name, component.value, component.score, component.weight
        );
    }
}

fn display_multipliers(result: &WaveResult) {
    let m = &result.multipliers;

    println!();
    println!("--- Multipliers ---");
    println!(
        "  base          {:.0} min ({:.2} h personal baseline)",
        m.base_minutes, m.baseline.base_hours
    );
    println!(
        "  nutrient      x{:.3} (GL {:.1} {}, GI x{:.2})",
        m.nutrient.total, m.nutrient.gl, m.nutrient.gl_category, m.nutrient.gi
    );
    println!("  circadian     x{:.3}", m.circadian);
    println!("  spicy         x{:.2}", m.spicy);
    println!("  kinetics      x{:.3}", m.kinetics);
    println!(
        "  bonus sum     {} -> x{:.3}",
        signed(m.bonus_sum),
        m.bonus_factor
    );
    println!("    day         {}", signed(m.day.personal_sum()));
    println!("    food        {}", signed(m.food.sum()));
    println!("    activity    {}", signed(m.activity));
    println!("    fasting     {}", signed(m.day.fasting));
    println!("    cold        {}", signed(m.day.cold_exposure));
    println!("    stacking    {}", signed(m.day.stacking.bonus));
    println!("    next day    {}", signed(-m.next_day_reduction));
    if let Some(autophagy) = &m.day.autophagy {
        println!(
            "  autophagy     {} (sensitivity +{:.0}%)",
            autophagy.phase,
            autophagy.sensitivity_gain * 100.0
        );
    }
    println!("  total         x{:.3}", m.total);
}

/// Display insulin level readings and threshold crossings.
pub fn display_prediction(readings: &[LevelReading], crossings: &ThresholdCrossings) {
    println!();
    println!("=== Insulin Level ===");
    println!();
    for r in readings {
        println!(
            "  {:>4.0} min  {:>5.2}  {}",
            r.minutes,
            r.value,
            r.level.label()
        );
    }
    println!();
    println!("Safe to eat:    {}", minutes_or_dash(crossings.safe_to_eat));
    println!("Optimal window: {}", minutes_or_dash(crossings.optimal_window));
    println!("Fat burning:    {}", minutes_or_dash(crossings.fat_burning));
    println!();
}
