use crate::{
    coefficients::CoefficientTable,
    coordinate::Coordinate,
    error::{PwqError, Result},
    prediction::Prediction,
    station::{self, Station},
};
use chrono::{Datelike, NaiveDate};
use log::info;
use pwq_utils::dates::month_window;
use serde::{Deserialize, Serialize};

/// A prediction tagged with the place and month it was made for.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StationPrediction {
    pub location: String,
    pub river: String,
    pub month: u32,
    pub year: i32,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// Response shape of [`Predictor::predict_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictAllResponse {
    pub month: u32,
    pub year: i32,
    pub predictions: Vec<StationPrediction>,
}

/// Evaluates the coefficient table for stations and months.
///
/// Holds only immutable data, so one instance can serve concurrent callers
/// by shared reference.
#[derive(Debug, Clone)]
pub struct Predictor {
    table: CoefficientTable,
    stations: Vec<Station>,
}

impl Predictor {
    pub fn new(table: CoefficientTable, stations: Vec<Station>) -> Self {
        Predictor { table, stations }
    }

    /// Predictor over the embedded coefficient table and station list.
    pub fn from_embedded() -> Result<Self> {
        let table = CoefficientTable::get_coefficient_table()?;
        let stations = Station::get_station_vector()?;
        info!("Loaded {} monitoring stations", stations.len());
        Ok(Predictor::new(table, stations))
    }

    pub fn table(&self) -> &CoefficientTable {
        &self.table
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn find_station(&self, name: &str) -> Option<&Station> {
        station::find_station(&self.stations, name)
    }

    pub fn nearest_station(&self, point: &Coordinate) -> Result<&Station> {
        station::nearest_station(&self.stations, point).ok_or(PwqError::NoStations)
    }

    /// Predict every parameter for a river/station in a given month.
    ///
    /// Unknown river or station names fall back to code 0. Only a month
    /// outside 1-12 is an error.
    pub fn predict(&self, river: &str, station: &str, month: u32, year: i32) -> Result<Prediction> {
        let encoder = self.table.encoder();
        let season = encoder.encode_season(month)?;
        let river_code = encoder.encode_river(river);
        let station_code = encoder.encode_station(station);
        Ok(Prediction::from_raw(|parameter| {
            self.table
                .entry(parameter)
                .map(|entry| entry.evaluate(river_code, station_code, season, month, year))
                .unwrap_or(0.0)
        }))
    }

    pub fn predict_station(&self, station: &Station, month: u32, year: i32) -> Result<Prediction> {
        self.predict(&station.river, &station.name, month, year)
    }

    /// One prediction per known station, in station-list order.
    pub fn predict_all(&self, month: u32, year: i32) -> Result<PredictAllResponse> {
        let predictions = self
            .stations
            .iter()
            .map(|s| {
                Ok(StationPrediction {
                    location: s.name.clone(),
                    river: s.river.clone(),
                    month,
                    year,
                    prediction: self.predict_station(s, month, year)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PredictAllResponse {
            month,
            year,
            predictions,
        })
    }

    /// Predictions for every month of every year in `start_year..=end_year`.
    pub fn predict_trends(
        &self,
        river: &str,
        station: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<StationPrediction>> {
        let mut results = Vec::new();
        for year in start_year..=end_year {
            for month in 1..=12 {
                results.push(self.tagged(river, station, month, year)?);
            }
        }
        Ok(results)
    }

    /// Predictions for the `months` calendar months ending with the month of
    /// `end`, oldest first.
    pub fn predict_history(
        &self,
        river: &str,
        station: &str,
        end: &NaiveDate,
        months: u32,
    ) -> Result<Vec<StationPrediction>> {
        month_window(end, months)
            .iter()
            .map(|d| self.tagged(river, station, d.month(), d.year()))
            .collect()
    }

    fn tagged(&self, river: &str, station: &str, month: u32, year: i32) -> Result<StationPrediction> {
        Ok(StationPrediction {
            location: String::from(station),
            river: String::from(river),
            month,
            year,
            prediction: self.predict(river, station, month, year)?,
        })
    }
}
