//! The pre-computed linear model exported alongside the label encoders.
//!
//! The table is loaded and validated once; every prediction reads from the
//! same immutable value.

use crate::{
    encoder::FeatureEncoder,
    error::{PwqError, Result},
    prediction::Parameter,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded coefficient table.
pub static JSON_OBJECT: &str = include_str!("../../fixtures/model_export.json");

/// Reference month and year the slopes are centred on.
pub const REFERENCE_MONTH: f64 = 6.0;
pub const REFERENCE_YEAR: f64 = 2020.0;

/// Linear model terms for one parameter.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CoefficientEntry {
    pub base: f64,
    #[serde(default)]
    pub river_effect: Vec<f64>,
    #[serde(default)]
    pub location_effect: Vec<f64>,
    #[serde(default)]
    pub seasonal_effect: Vec<f64>,
    #[serde(default)]
    pub month_coefficient: f64,
    #[serde(default)]
    pub year_coefficient: f64,
}

fn effect(table: &[f64], code: usize) -> f64 {
    table.get(code).copied().unwrap_or(0.0)
}

impl CoefficientEntry {
    /// Evaluate the model before clamping. Effect codes past the end of a table contribute 0.
    pub fn evaluate(&self, river: usize, location: usize, season: usize, month: u32, year: i32) -> f64 {
        self.base
            + effect(&self.river_effect, river)
            + effect(&self.location_effect, location)
            + effect(&self.seasonal_effect, season)
            + self.month_coefficient * (month as f64 - REFERENCE_MONTH)
            + self.year_coefficient * (year as f64 - REFERENCE_YEAR)
    }
}

#[derive(Debug, Deserialize)]
struct ModelExport {
    encoders: FeatureEncoder,
    simplified_coefficients: HashMap<Parameter, CoefficientEntry>,
}

/// Validated coefficient table: encoders plus one entry per parameter.
#[derive(Debug, Clone)]
pub struct CoefficientTable {
    encoder: FeatureEncoder,
    entries: HashMap<Parameter, CoefficientEntry>,
}

impl CoefficientTable {
    pub fn new(encoder: FeatureEncoder, entries: HashMap<Parameter, CoefficientEntry>) -> Result<Self> {
        encoder.validate()?;
        for parameter in Parameter::ALL {
            if !entries.contains_key(&parameter) {
                return Err(PwqError::Configuration(format!(
                    "coefficient table has no entry for {}",
                    parameter
                )));
            }
        }
        Ok(CoefficientTable { encoder, entries })
    }

    /// Parse and validate a coefficient table in the model export layout:
    ///
    /// ```text
    /// {
    ///   "encoders": {"rivers": {..}, "locations": {..}, "seasons": {..}},
    ///   "simplified_coefficients": {"pH": {"base": 7.5, ..}, ..}
    /// }
    /// ```
    pub fn parse_json(json: &str) -> Result<Self> {
        let export: ModelExport = serde_json::from_str(json)?;
        let table = CoefficientTable::new(export.encoders, export.simplified_coefficients)?;
        info!(
            "Loaded coefficient table: {} rivers, {} locations, {} parameters",
            table.encoder.rivers().len(),
            table.encoder.locations().len(),
            table.entries.len()
        );
        Ok(table)
    }

    /// Coefficient table from the embedded JSON.
    pub fn get_coefficient_table() -> Result<Self> {
        CoefficientTable::parse_json(JSON_OBJECT)
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn entry(&self, parameter: Parameter) -> Option<&CoefficientEntry> {
        self.entries.get(&parameter)
    }
}
