use crate::{
    prediction::{Parameter, WaterQuality},
    predictor::StationPrediction,
};
use serde::Serialize;
use std::fmt;

/// Direction of a parameter across a prediction series.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Trend {
    Improving,
    Declining,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ParameterSummary {
    pub parameter: Parameter,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Improving when the last value is above the first.
    pub trend: Trend,
}

/// Summary of a prediction series, e.g. the output of
/// [`Predictor::predict_trends`](crate::predictor::Predictor::predict_trends).
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct TrendReport {
    pub samples: usize,
    pub parameters: Vec<ParameterSummary>,
    pub complying: usize,
    pub non_complying: usize,
}

impl TrendReport {
    /// `None` for an empty series.
    pub fn from_predictions(predictions: &[StationPrediction]) -> Option<TrendReport> {
        let first = predictions.first()?;
        let last = predictions.last()?;
        let n = predictions.len() as f64;
        let parameters = Parameter::ALL
            .iter()
            .map(|&parameter| {
                let values = predictions.iter().map(|p| p.prediction.get(parameter));
                let (min, max, sum) = values.fold(
                    (f64::INFINITY, f64::NEG_INFINITY, 0.0),
                    |(min, max, sum), v| (min.min(v), max.max(v), sum + v),
                );
                let trend = if last.prediction.get(parameter) > first.prediction.get(parameter) {
                    Trend::Improving
                } else {
                    Trend::Declining
                };
                ParameterSummary {
                    parameter,
                    average: sum / n,
                    min,
                    max,
                    trend,
                }
            })
            .collect();
        let complying = predictions
            .iter()
            .filter(|p| p.prediction.water_quality == WaterQuality::Complying)
            .count();
        Some(TrendReport {
            samples: predictions.len(),
            parameters,
            complying,
            non_complying: predictions.len() - complying,
        })
    }
}

impl fmt::Display for TrendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "WATER QUALITY PREDICTION REPORT")?;
        writeln!(f, "{}", "=".repeat(60))?;
        for summary in &self.parameters {
            writeln!(f)?;
            writeln!(f, "{}:", summary.parameter)?;
            writeln!(f, "  Average: {:.2}", summary.average)?;
            writeln!(f, "  Range: {:.2} - {:.2}", summary.min, summary.max)?;
            writeln!(f, "  Trend: {:?}", summary.trend)?;
        }
        writeln!(f)?;
        writeln!(f, "Water Quality Distribution:")?;
        for (label, count) in [
            (WaterQuality::Complying, self.complying),
            (WaterQuality::NonComplying, self.non_complying),
        ] {
            if count == 0 {
                continue;
            }
            let percentage = count as f64 / self.samples as f64 * 100.0;
            writeln!(f, "  {}: {} months ({:.1}%)", label, count, percentage)?;
        }
        Ok(())
    }
}
