//! River paths used to route interpolation between stations.
//!
//! Each river is an ordered polyline of sampled points running downstream.
//! In the embedded fixture (`RIVER,LATITUDE,LONGITUDE`) the rows for one
//! river appear in path order.

use crate::{
    coordinate::Coordinate,
    error::{PwqError, Result},
};
use csv::ReaderBuilder;
use log::info;
use std::collections::BTreeMap;

/// Embedded CSV data for the river polylines.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/river_paths.csv");

/// Ordered path of one river. Never empty and never holds two identical
/// adjacent points.
#[derive(Debug, PartialEq, Clone)]
pub struct RiverPolyline {
    name: String,
    points: Vec<Coordinate>,
}

impl RiverPolyline {
    pub fn new(name: &str, points: Vec<Coordinate>) -> Result<Self> {
        if points.is_empty() {
            return Err(PwqError::Configuration(format!(
                "river path {} has no points",
                name
            )));
        }
        if let Some(i) = points.windows(2).position(|w| w[0] == w[1]) {
            return Err(PwqError::Configuration(format!(
                "river path {} repeats a point at indices {} and {}",
                name,
                i,
                i + 1
            )));
        }
        Ok(RiverPolyline {
            name: String::from(name),
            points,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the vertex nearest to `point`. See [`nearest_index`].
    pub fn nearest_index(&self, point: &Coordinate) -> usize {
        nearest_index(&self.points, point)
    }
}

/// Index of the vertex minimising planar squared distance to `point`.
/// Ties go to the lowest index; an empty slice yields 0.
pub fn nearest_index(polyline: &[Coordinate], point: &Coordinate) -> usize {
    let mut best_i = 0;
    let mut best_d = f64::INFINITY;
    for (i, q) in polyline.iter().enumerate() {
        let d = q.squared_distance(point);
        if d < best_d {
            best_d = d;
            best_i = i;
        }
    }
    best_i
}

/// Display colour for a river's path.
pub fn river_color(river: &str) -> &'static str {
    match river {
        "Mula" => "#2196F3",
        "Mutha" => "#4CAF50",
        "Mula-Mutha" => "#FF9800",
        _ => "#9E9E9E",
    }
}

/// All river polylines, keyed by river name.
#[derive(Debug, Clone, Default)]
pub struct RiverNetwork {
    rivers: BTreeMap<String, RiverPolyline>,
}

impl RiverNetwork {
    pub fn from_polylines(polylines: Vec<RiverPolyline>) -> Self {
        let rivers = polylines
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();
        RiverNetwork { rivers }
    }

    /// Parse river paths from CSV.
    ///
    /// Expected format (with headers): `RIVER,LATITUDE,LONGITUDE`
    ///
    /// # Example CSV
    /// ```text
    /// RIVER,LATITUDE,LONGITUDE
    /// Mutha,18.4462,73.7700
    /// Mutha,18.4523,73.7756
    /// ```
    pub fn parse_river_csv(csv_object: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());

        let mut grouped: BTreeMap<String, Vec<Coordinate>> = BTreeMap::new();
        for (row, result) in rdr.records().enumerate() {
            let r = result?;
            let river = r.get(0).unwrap_or("").trim();
            if river.is_empty() {
                return Err(PwqError::Configuration(format!(
                    "river path row {} has no river name",
                    row
                )));
            }
            let parse = |idx: usize, field: &str| -> Result<f64> {
                let raw = r.get(idx).unwrap_or("").trim();
                raw.parse::<f64>().map_err(|e| {
                    PwqError::Configuration(format!(
                        "river path row {}: invalid {} '{}': {}",
                        row, field, raw, e
                    ))
                })
            };
            let point = Coordinate::new(parse(1, "latitude")?, parse(2, "longitude")?);
            grouped.entry(String::from(river)).or_default().push(point);
        }

        let polylines = grouped
            .into_iter()
            .map(|(name, points)| RiverPolyline::new(&name, points))
            .collect::<Result<Vec<_>>>()?;
        let network = RiverNetwork::from_polylines(polylines);
        info!(
            "Loaded {} river paths ({} points)",
            network.rivers.len(),
            network.rivers.values().map(RiverPolyline::len).sum::<usize>()
        );
        Ok(network)
    }

    /// River network from the embedded CSV.
    pub fn get_river_network() -> Result<Self> {
        RiverNetwork::parse_river_csv(CSV_OBJECT)
    }

    pub fn get(&self, river: &str) -> Option<&RiverPolyline> {
        self.rivers.get(river)
    }

    pub fn rivers(&self) -> impl Iterator<Item = &RiverPolyline> {
        self.rivers.values()
    }

    pub fn len(&self) -> usize {
        self.rivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rivers.is_empty()
    }
}
