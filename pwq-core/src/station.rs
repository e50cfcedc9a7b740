use crate::{
    coordinate::Coordinate,
    error::{PwqError, Result},
};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Embedded CSV data for the Pune river monitoring stations.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/stations.csv");

/// A fixed river-monitoring point.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: u32,
    /// Human-readable name, also the key into the location encoder
    pub name: String,
    /// River the station samples (e.g. "Mula", "Mutha", "Mula-Mutha")
    pub river: String,
    pub coordinate: Coordinate,
    pub description: String,
}

fn parse_field<T: std::str::FromStr>(raw: Option<&str>, field: &str, row: usize) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = raw.unwrap_or("").trim();
    raw.parse::<T>().map_err(|e| {
        PwqError::Configuration(format!(
            "station row {}: invalid {} '{}': {}",
            row, field, raw, e
        ))
    })
}

impl Station {
    /// Parse a CSV string of station data into a vector of Stations.
    ///
    /// Expected format (with headers): `ID,NAME,RIVER,LATITUDE,LONGITUDE,DESCRIPTION`
    ///
    /// # Example CSV
    /// ```text
    /// ID,NAME,RIVER,LATITUDE,LONGITUDE,DESCRIPTION
    /// 8,Khadakvasla Dam,Mutha,18.445044,73.764876,Mutha River source at Khadakvasla Dam
    /// ```
    pub fn parse_station_csv(csv_object: &str) -> Result<Vec<Station>> {
        let mut station_list: Vec<Station> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            let name = record.get(1).unwrap_or("").trim();
            let river = record.get(2).unwrap_or("").trim();
            if name.is_empty() || river.is_empty() {
                return Err(PwqError::Configuration(format!(
                    "station row {}: name and river are required",
                    row
                )));
            }
            let station = Station {
                id: parse_field(record.get(0), "id", row)?,
                name: String::from(name),
                river: String::from(river),
                coordinate: Coordinate::new(
                    parse_field(record.get(3), "latitude", row)?,
                    parse_field(record.get(4), "longitude", row)?,
                ),
                description: String::from(record.get(5).unwrap_or("").trim()),
            };
            station_list.push(station);
        }
        Ok(station_list)
    }

    /// Get the station vector from the embedded CSV.
    pub fn get_station_vector() -> Result<Vec<Station>> {
        Station::parse_station_csv(CSV_OBJECT)
    }
}

/// Find a station by exact name.
pub fn find_station<'a>(stations: &'a [Station], name: &str) -> Option<&'a Station> {
    stations.iter().find(|s| s.name == name)
}

/// The station closest to `point` by planar distance. Ties go to the earlier station.
pub fn nearest_station<'a>(stations: &'a [Station], point: &Coordinate) -> Option<&'a Station> {
    let mut best: Option<(&Station, f64)> = None;
    for station in stations {
        let d = station.coordinate.squared_distance(point);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((station, d)),
        }
    }
    best.map(|(station, _)| station)
}
