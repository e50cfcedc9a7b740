//! Single-station and all-station predictions.

use crate::fixtures::FixtureArgs;
use log::{debug, info};
use pwq_core::{
    encoder::Season,
    prediction::Parameter,
    predictor::{Predictor, StationPrediction},
    river::river_color,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RiverListing<'a> {
    name: &'a str,
    color: &'static str,
}

/// Everything the model can encode, ordered by code.
#[derive(Debug, Serialize)]
struct EncoderListing<'a> {
    rivers: Vec<RiverListing<'a>>,
    locations: Vec<&'a str>,
    seasons: Vec<Season>,
}

fn predict_json(
    predictor: &Predictor,
    river: &str,
    station: &str,
    month: u32,
    year: i32,
) -> anyhow::Result<String> {
    let prediction = predictor.predict(river, station, month, year)?;
    for parameter in Parameter::ALL {
        debug!(
            "{}: {} ({:?})",
            parameter,
            prediction.get(parameter),
            prediction.status(parameter)
        );
    }
    let tagged = StationPrediction {
        location: String::from(station),
        river: String::from(river),
        month,
        year,
        prediction,
    };
    Ok(serde_json::to_string_pretty(&tagged)?)
}

fn encoders_json(predictor: &Predictor) -> anyhow::Result<String> {
    let encoder = predictor.table().encoder();
    let listing = EncoderListing {
        rivers: encoder
            .rivers()
            .into_iter()
            .map(|name| RiverListing {
                name,
                color: river_color(name),
            })
            .collect(),
        locations: encoder.locations(),
        seasons: encoder.seasons(),
    };
    Ok(serde_json::to_string_pretty(&listing)?)
}

/// Print the prediction for one station as JSON.
pub fn run_predict(
    fixtures: &FixtureArgs,
    river: &str,
    station: &str,
    month: u32,
    year: i32,
) -> anyhow::Result<()> {
    let predictor = fixtures.load_predictor()?;
    println!("{}", predict_json(&predictor, river, station, month, year)?);
    Ok(())
}

/// Print predictions for every known station as JSON.
pub fn run_predict_all(fixtures: &FixtureArgs, month: u32, year: i32) -> anyhow::Result<()> {
    let predictor = fixtures.load_predictor()?;
    let response = predictor.predict_all(month, year)?;
    info!(
        "Predicted {} stations for {}/{}",
        response.predictions.len(),
        month,
        year
    );
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub fn run_encoders(fixtures: &FixtureArgs) -> anyhow::Result<()> {
    let predictor = fixtures.load_predictor()?;
    println!("{}", encoders_json(&predictor)?);
    Ok(())
}
