//! Loading the coefficient table, station list and river paths, either from
//! the copies embedded in `pwq-core` or from files given on the command line.

use anyhow::Context;
use clap::Args;
use log::info;
use pwq_core::{
    coefficients::CoefficientTable, predictor::Predictor, river::RiverNetwork, station::Station,
};

#[derive(Args, Debug, Clone, Default)]
pub struct FixtureArgs {
    /// Coefficient table JSON to use instead of the embedded one
    #[arg(long, global = true)]
    pub coefficients: Option<String>,

    /// Stations CSV to use instead of the embedded one
    #[arg(long, global = true)]
    pub stations: Option<String>,

    /// River paths CSV to use instead of the embedded one
    #[arg(long, global = true)]
    pub rivers: Option<String>,
}

fn read_override(path: &str, what: &str) -> anyhow::Result<String> {
    info!("Reading {} from {}", what, path);
    std::fs::read_to_string(path).with_context(|| format!("failed to read {} from {}", what, path))
}

impl FixtureArgs {
    pub fn load_predictor(&self) -> anyhow::Result<Predictor> {
        let table = match &self.coefficients {
            Some(path) => CoefficientTable::parse_json(&read_override(path, "coefficients")?)
                .with_context(|| format!("invalid coefficient table in {}", path))?,
            None => CoefficientTable::get_coefficient_table()
                .context("invalid embedded coefficient table")?,
        };
        let stations = match &self.stations {
            Some(path) => Station::parse_station_csv(&read_override(path, "stations")?)
                .with_context(|| format!("invalid stations in {}", path))?,
            None => Station::get_station_vector().context("invalid embedded stations")?,
        };
        Ok(Predictor::new(table, stations))
    }

    pub fn load_river_network(&self) -> anyhow::Result<RiverNetwork> {
        match &self.rivers {
            Some(path) => RiverNetwork::parse_river_csv(&read_override(path, "river paths")?)
                .with_context(|| format!("invalid river paths in {}", path)),
            None => RiverNetwork::get_river_network().context("invalid embedded river paths"),
        }
    }
}
