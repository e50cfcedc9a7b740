//! Interpolation requests read as JSON from a file or stdin.

use crate::fixtures::FixtureArgs;
use anyhow::Context;
use log::info;
use pwq_data::{
    interpolation::Interpolator,
    request::{InterpolateRequest, InterpolateResponse},
};
use std::io::Read;

fn read_request(source: &str) -> anyhow::Result<InterpolateRequest> {
    let text = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read request from {}", source))?
    };
    parse_request(&text)
}

fn parse_request(text: &str) -> anyhow::Result<InterpolateRequest> {
    serde_json::from_str(text).context("malformed interpolation request")
}

fn answer(interpolator: &Interpolator, request: &InterpolateRequest) -> InterpolateResponse {
    info!(
        "Interpolating {} samples for {}/{}",
        request.points, request.month, request.year
    );
    interpolator.interpolate_predict(request)
}

/// Answer one interpolation request and print the response as JSON.
///
/// Request errors (mismatched rivers, bad sample counts) are part of the
/// response, not a command failure.
pub fn run_interpolate(
    fixtures: &FixtureArgs,
    source: &str,
    max_samples: usize,
) -> anyhow::Result<()> {
    let predictor = fixtures.load_predictor()?;
    let network = fixtures.load_river_network()?;
    let interpolator = Interpolator::new(&predictor, &network).with_max_samples(max_samples);
    let request = read_request(source)?;
    let response = answer(&interpolator, &request);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
