use pwq_utils::numeric::round2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A predicted water quality parameter.
///
/// Serialized names match the column headers of the monitoring data and the
/// keys of the coefficient table.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Parameter {
    #[serde(rename = "pH")]
    Ph,
    #[serde(rename = "DO (mg/L)")]
    DissolvedOxygen,
    #[serde(rename = "BOD (mg/L)")]
    Bod,
    #[serde(rename = "FC MPN/100ml")]
    FecalColiform,
    #[serde(rename = "TC MPN/100ml")]
    TotalColiform,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Parameter::Ph,
        Parameter::DissolvedOxygen,
        Parameter::Bod,
        Parameter::FecalColiform,
        Parameter::TotalColiform,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::DissolvedOxygen => "DO (mg/L)",
            Parameter::Bod => "BOD (mg/L)",
            Parameter::FecalColiform => "FC MPN/100ml",
            Parameter::TotalColiform => "TC MPN/100ml",
        }
    }

    /// Bacterial counts are reported as most-probable-number (MPN).
    pub fn is_bacterial_count(&self) -> bool {
        self.name().contains("MPN")
    }

    /// Physically plausible range for the parameter.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Parameter::Ph => (6.0, 9.0),
            Parameter::DissolvedOxygen => (0.0, 15.0),
            Parameter::Bod => (0.0, 30.0),
            _ if self.is_bacterial_count() => (0.0, f64::INFINITY),
            _ => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    pub fn clamp_value(&self, value: f64) -> f64 {
        let (lo, hi) = self.bounds();
        value.max(lo).min(hi)
    }

    /// Display-only rating of a value. Independent of [`WaterQuality`].
    pub fn status(&self, value: f64) -> ParameterStatus {
        if !value.is_finite() {
            return ParameterStatus::Unknown;
        }
        match self {
            Parameter::Ph => {
                if (6.5..=8.5).contains(&value) {
                    ParameterStatus::Good
                } else if (6.0..6.5).contains(&value) {
                    ParameterStatus::Moderate
                } else {
                    ParameterStatus::Poor
                }
            }
            Parameter::DissolvedOxygen => {
                if value >= 5.0 {
                    ParameterStatus::Good
                } else if value >= 3.0 {
                    ParameterStatus::Moderate
                } else {
                    ParameterStatus::Poor
                }
            }
            Parameter::Bod => {
                if value <= 3.0 {
                    ParameterStatus::Good
                } else if value <= 6.0 {
                    ParameterStatus::Moderate
                } else {
                    ParameterStatus::Poor
                }
            }
            Parameter::FecalColiform => at_most(value, 500.0, 1000.0),
            Parameter::TotalColiform => at_most(value, 1000.0, 2000.0),
        }
    }
}

/// Good up to `good`, Moderate up to `moderate`, Poor above.
fn at_most(value: f64, good: f64, moderate: f64) -> ParameterStatus {
    if value <= good {
        ParameterStatus::Good
    } else if value <= moderate {
        ParameterStatus::Moderate
    } else {
        ParameterStatus::Poor
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-parameter rating used for colouring values in a UI.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ParameterStatus {
    Good,
    Moderate,
    Poor,
    Unknown,
}

/// Overall compliance of a sample.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum WaterQuality {
    Complying,
    #[serde(rename = "Non Complying")]
    NonComplying,
}

impl WaterQuality {
    /// Complying iff pH in [6.5, 8.5], DO >= 5.0 and BOD <= 3.0.
    pub fn classify(ph: f64, dissolved_oxygen: f64, bod: f64) -> WaterQuality {
        if (6.5..=8.5).contains(&ph) && dissolved_oxygen >= 5.0 && bod <= 3.0 {
            WaterQuality::Complying
        } else {
            WaterQuality::NonComplying
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            WaterQuality::Complying => "#4CAF50",
            WaterQuality::NonComplying => "#f44336",
        }
    }
}

impl fmt::Display for WaterQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterQuality::Complying => write!(f, "Complying"),
            WaterQuality::NonComplying => write!(f, "Non Complying"),
        }
    }
}

/// Predicted parameter values for one place and month.
///
/// Values are clamped to [`Parameter::bounds`] and rounded to hundredths;
/// `water_quality` is derived from pH, DO and BOD.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "pH")]
    pub ph: f64,
    #[serde(rename = "DO (mg/L)")]
    pub dissolved_oxygen: f64,
    #[serde(rename = "BOD (mg/L)")]
    pub bod: f64,
    #[serde(rename = "FC MPN/100ml")]
    pub fecal_coliform: f64,
    #[serde(rename = "TC MPN/100ml")]
    pub total_coliform: f64,
    #[serde(rename = "Water Quality")]
    pub water_quality: WaterQuality,
}

impl Prediction {
    /// Build a prediction from unclamped values, clamping, rounding and
    /// classifying each one.
    pub fn from_raw<F>(raw: F) -> Prediction
    where
        F: Fn(Parameter) -> f64,
    {
        let finish = |p: Parameter| round2(p.clamp_value(raw(p)));
        let ph = finish(Parameter::Ph);
        let dissolved_oxygen = finish(Parameter::DissolvedOxygen);
        let bod = finish(Parameter::Bod);
        Prediction {
            ph,
            dissolved_oxygen,
            bod,
            fecal_coliform: finish(Parameter::FecalColiform),
            total_coliform: finish(Parameter::TotalColiform),
            water_quality: WaterQuality::classify(ph, dissolved_oxygen, bod),
        }
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::DissolvedOxygen => self.dissolved_oxygen,
            Parameter::Bod => self.bod,
            Parameter::FecalColiform => self.fecal_coliform,
            Parameter::TotalColiform => self.total_coliform,
        }
    }

    pub fn status(&self, parameter: Parameter) -> ParameterStatus {
        parameter.status(self.get(parameter))
    }

    pub fn is_complying(&self) -> bool {
        self.water_quality == WaterQuality::Complying
    }
}
