//! Command implementations for the PWQ CLI.
//!
//! Provides subcommands for station predictions, river interpolation and
//! monthly trend series over the embedded (or overridden) fixtures.

use clap::Subcommand;
use pwq_utils::dates::parse_month;

pub mod fixtures;
pub mod interpolate;
pub mod predict;
pub mod trends;

pub use fixtures::FixtureArgs;

#[derive(Subcommand)]
pub enum Command {
    /// Predict water quality for one station and month
    Predict {
        /// River the station is on, e.g. Mutha
        #[arg(short = 'r', long)]
        river: String,

        /// Station name, e.g. "Deccan Bridge"
        #[arg(short = 's', long)]
        station: String,

        /// Month as a number or name (6, June, Jun)
        #[arg(short = 'm', long, value_parser = parse_month)]
        month: u32,

        #[arg(short = 'y', long)]
        year: i32,
    },

    /// Predict water quality for every known station
    PredictAll {
        /// Month as a number or name
        #[arg(short = 'm', long, value_parser = parse_month)]
        month: u32,

        #[arg(short = 'y', long)]
        year: i32,
    },

    /// Interpolate predictions along a river from a JSON request
    Interpolate {
        /// Path to the request JSON, or "-" for stdin
        #[arg(short = 'i', long, default_value = "-")]
        request: String,

        /// Largest number of samples a request may ask for
        #[arg(long, default_value_t = pwq_data::interpolation::DEFAULT_MAX_SAMPLES)]
        max_samples: usize,
    },

    /// Monthly predictions for a range of years
    Trends {
        #[arg(short = 'r', long)]
        river: String,

        #[arg(short = 's', long)]
        station: String,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        /// Output path for the trends CSV (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Print a summary report after the series
        #[arg(long)]
        report: bool,
    },

    /// Predictions for the months leading up to a date
    History {
        #[arg(short = 'r', long)]
        river: String,

        #[arg(short = 's', long)]
        station: String,

        /// Number of months, ending with the month of --end
        #[arg(long, default_value_t = 12)]
        months: u32,

        /// Last date of the window as YYYY-MM-DD (today when omitted)
        #[arg(short = 'e', long)]
        end: Option<String>,
    },

    /// List the rivers, locations and seasons the model knows
    Encoders,
}

pub fn run(command: Command, fixtures: &FixtureArgs) -> anyhow::Result<()> {
    match command {
        Command::Predict {
            river,
            station,
            month,
            year,
        } => predict::run_predict(fixtures, &river, &station, month, year),
        Command::PredictAll { month, year } => predict::run_predict_all(fixtures, month, year),
        Command::Interpolate {
            request,
            max_samples,
        } => interpolate::run_interpolate(fixtures, &request, max_samples),
        Command::Trends {
            river,
            station,
            start_year,
            end_year,
            output,
            report,
        } => trends::run_trends(
            fixtures,
            &river,
            &station,
            start_year,
            end_year,
            output.as_deref(),
            report,
        ),
        Command::History {
            river,
            station,
            months,
            end,
        } => trends::run_history(fixtures, &river, &station, months, end.as_deref()),
        Command::Encoders => predict::run_encoders(fixtures),
    }
}
