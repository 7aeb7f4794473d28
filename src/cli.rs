use clap::{Parser, Subcommand};

/// insulin_wave: estimate the insulin wave a meal triggers, from its nutrients, the day around it and the eater's profile.
#[derive(Parser, Debug)]
#[command(name = "insulin_wave")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the scenario JSON file.
    #[arg(short, long, default_value = "scenario.json", global = true)]
    pub file: String,

    /// Debug logging and the full multiplier breakdown.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the wave for a scenario and print the report.
    Compute {
        /// Print the full result as JSON instead of the report.
        #[arg(long)]
        json: bool,
    },

    /// Export the sampled wave curve to CSV.
    Curve {
        /// Output CSV path.
        #[arg(short, long, default_value = "curve.csv")]
        output: String,

        /// Curve resolution (number of intervals).
        #[arg(long, default_value = "100")]
        points: usize,
    },

    /// Print the insulin level at given minutes after the meal.
    Predict {
        /// Minutes after the meal (comma-separated).
        #[arg(long, value_delimiter = ',', default_value = "15,30,60,90,120")]
        minutes: Vec<f64>,
    },

    /// Enter a meal interactively and compute its wave.
    Enter {
        /// Product catalog JSON with per-100 g nutrients.
        #[arg(long, default_value = "products.json")]
        catalog: String,

        /// Save the entered scenario to the scenario file.
        #[arg(long)]
        save: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Compute { json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["insulin_wave"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.file, "scenario.json");
        assert!(matches!(Command::default(), Command::Compute { json: false }));
    }

    #[test]
    fn test_predict_minutes_list() {
        let cli = Cli::parse_from(["insulin_wave", "predict", "--minutes", "10,45,200", "-f", "lunch.json"]);
        match cli.command {
            Some(Command::Predict { minutes }) => assert_eq!(minutes, vec![10.0, 45.0, 200.0]),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.file, "lunch.json");
    }
}
