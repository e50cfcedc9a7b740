//! Monthly prediction series: future trends written as CSV and a historical
//! window printed as JSON.

use crate::fixtures::FixtureArgs;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use csv::Writer;
use log::info;
use pwq_core::{
    prediction::Parameter,
    predictor::StationPrediction,
    report::TrendReport,
};
use pwq_utils::dates::short_month_name;
use serde::Serialize;

/// A history entry with a display label such as "Jun 2024".
#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    label: String,
    #[serde(flatten)]
    prediction: &'a StationPrediction,
}

/// Render a prediction series as CSV with a header row.
fn trends_csv(series: &[StationPrediction]) -> anyhow::Result<String> {
    let mut writer = Writer::from_writer(vec![]);
    let mut header = vec!["location", "river", "month", "year"];
    header.extend(Parameter::ALL.iter().map(|p| p.name()));
    header.push("Water Quality");
    writer.write_record(&header)?;
    for entry in series {
        let mut record = vec![
            entry.location.clone(),
            entry.river.clone(),
            entry.month.to_string(),
            entry.year.to_string(),
        ];
        record.extend(
            Parameter::ALL
                .iter()
                .map(|&p| entry.prediction.get(p).to_string()),
        );
        record.push(entry.prediction.water_quality.to_string());
        writer.write_record(&record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush trends CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn history_json(series: &[StationPrediction]) -> anyhow::Result<String> {
    let entries: Vec<HistoryEntry> = series
        .iter()
        .map(|p| HistoryEntry {
            label: format!(
                "{} {}",
                short_month_name(p.month).unwrap_or("???"),
                p.year
            ),
            prediction: p,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

fn parse_end_date(end: Option<&str>) -> anyhow::Result<NaiveDate> {
    match end {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid end date '{}', expected YYYY-MM-DD", s)),
        None => Ok(Local::now().naive_local().date()),
    }
}

/// Predict every month of `start_year..=end_year` and write the series as CSV.
pub fn run_trends(
    fixtures: &FixtureArgs,
    river: &str,
    station: &str,
    start_year: i32,
    end_year: i32,
    output: Option<&str>,
    report: bool,
) -> anyhow::Result<()> {
    if start_year > end_year {
        anyhow::bail!("start year {} is after end year {}", start_year, end_year);
    }
    let predictor = fixtures.load_predictor()?;
    let series = predictor.predict_trends(river, station, start_year, end_year)?;
    info!(
        "Predicted {} months for {} ({}) from {} to {}",
        series.len(),
        station,
        river,
        start_year,
        end_year
    );
    let csv_text = trends_csv(&series)?;
    match output {
        Some(path) => {
            std::fs::write(path, &csv_text)
                .with_context(|| format!("failed to write trends to {}", path))?;
            info!("Trends written to {}", path);
        }
        None => print!("{}", csv_text),
    }
    if report {
        if let Some(summary) = TrendReport::from_predictions(&series) {
            println!("{}", summary);
        }
    }
    Ok(())
}

/// Print predictions for the `months` months ending at `end` (today by default).
pub fn run_history(
    fixtures: &FixtureArgs,
    river: &str,
    station: &str,
    months: u32,
    end: Option<&str>,
) -> anyhow::Result<()> {
    let end = parse_end_date(end)?;
    let predictor = fixtures.load_predictor()?;
    let series = predictor.predict_history(river, station, &end, months)?;
    println!("{}", history_json(&series)?);
    Ok(())
}
