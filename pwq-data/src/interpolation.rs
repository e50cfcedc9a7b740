//! Predicted water quality along a river between two stations.
//!
//! The endpoints of a route resolve to monitoring stations, the route is
//! sampled index-evenly, and each sample blends the two endpoint predictions
//! by its position. Compliance is reclassified per sample from the blended
//! pH, DO and BOD.

use crate::sampling::{sample_route, Route, SamplePoint};
use log::{debug, warn};
use pwq_core::{
    coordinate::Coordinate,
    error::{PwqError, Result},
    prediction::{Parameter, Prediction},
    predictor::Predictor,
    river::{RiverNetwork, RiverPolyline},
    station::Station,
};
use pwq_utils::numeric::{lerp, median};
use serde::{Deserialize, Serialize};

/// Upper bound on samples per request unless configured otherwise.
pub const DEFAULT_MAX_SAMPLES: usize = 100;

/// How endpoint predictions are chosen for the blend.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum BlendMode {
    /// Blend the predictions of the stations nearest each endpoint.
    #[default]
    Distance,
    /// Blend the median prediction of every station at or beyond each end of
    /// the route. The named stations fix the river and stand in for an end
    /// with no other station beyond it.
    IndexMedians {
        start_station: String,
        end_station: String,
    },
}

impl BlendMode {
    /// Override mode when both names are given, distance mode otherwise.
    pub fn from_station_names(start: Option<&str>, end: Option<&str>) -> BlendMode {
        match (start, end) {
            (Some(start), Some(end)) => BlendMode::IndexMedians {
                start_station: String::from(start),
                end_station: String::from(end),
            },
            _ => BlendMode::Distance,
        }
    }
}

/// One predicted point along a route.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InterpolationSample {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// 0 at the start point, 1 at the end point
    pub t_frac: f64,
    /// Endpoint station on the nearer half of the route
    pub nearest_location: String,
    pub nearest_river: String,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// Endpoint stations and the predictions blended between them.
struct Endpoints<'s> {
    start: &'s Station,
    end: &'s Station,
    start_prediction: Prediction,
    end_prediction: Prediction,
}

/// Interpolates predictions over the river network.
///
/// Borrows the immutable predictor and network, so it is cheap to build per
/// request and safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    predictor: &'a Predictor,
    network: &'a RiverNetwork,
    max_samples: usize,
}

impl<'a> Interpolator<'a> {
    pub fn new(predictor: &'a Predictor, network: &'a RiverNetwork) -> Self {
        Interpolator {
            predictor,
            network,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Interpolate `k` samples along the river between `start` and `end`.
    ///
    /// Both points snap to their nearest polyline vertex. The stretch between
    /// those vertices keeps the polyline's direction, but samples run from
    /// `start` to `end` either way.
    pub fn interpolate(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        k: usize,
        month: u32,
        year: i32,
        mode: &BlendMode,
    ) -> Result<Vec<InterpolationSample>> {
        self.check_sample_count(k)?;
        let (start_station, end_station) = self.resolve_stations(start, end, mode)?;
        let polyline = self.polyline_for(&start_station.river)?;

        let si = polyline.nearest_index(start);
        let ei = polyline.nearest_index(end);
        let (a, b) = (si.min(ei), si.max(ei));
        if a == b && k > 1 {
            debug!("Start and end both snap to vertex {}, returning one sample", a);
        }
        let route = Route::new(&polyline.points()[a..=b], si > ei);
        let samples = sample_route(&route, k, false);

        let endpoints =
            self.endpoints(start_station, end_station, polyline, si, ei, month, year, mode)?;
        Ok(blend(&samples, &endpoints))
    }

    /// Interpolate `k` samples along a caller-supplied stretch of river.
    ///
    /// The path is used as given: its first point is the start and its last
    /// the end. With `pick_vertices` the samples are chosen from the path's own
    /// points where there are enough of them.
    pub fn interpolate_path(
        &self,
        path: &[Coordinate],
        k: usize,
        month: u32,
        year: i32,
        mode: &BlendMode,
        pick_vertices: bool,
    ) -> Result<Vec<InterpolationSample>> {
        self.check_sample_count(k)?;
        let (Some(start), Some(end)) = (path.first(), path.last()) else {
            return Err(PwqError::MissingEndpoints);
        };
        let (start_station, end_station) = self.resolve_stations(start, end, mode)?;
        let polyline = self.polyline_for(&start_station.river)?;
        let si = polyline.nearest_index(start);
        let ei = polyline.nearest_index(end);

        let samples = sample_route(&Route::new(path, false), k, pick_vertices);
        let endpoints =
            self.endpoints(start_station, end_station, polyline, si, ei, month, year, mode)?;
        Ok(blend(&samples, &endpoints))
    }

    fn check_sample_count(&self, k: usize) -> Result<()> {
        if k < 1 || k > self.max_samples {
            return Err(PwqError::InvalidSampleCount {
                count: k,
                max: self.max_samples,
            });
        }
        Ok(())
    }

    fn polyline_for(&self, river: &str) -> Result<&'a RiverPolyline> {
        self.network
            .get(river)
            .ok_or_else(|| PwqError::MissingRiverPath(String::from(river)))
    }

    /// Endpoint stations for a route, which must share a river.
    fn resolve_stations(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        mode: &BlendMode,
    ) -> Result<(&'a Station, &'a Station)> {
        let (start_station, end_station) = match mode {
            BlendMode::Distance => (
                self.predictor.nearest_station(start)?,
                self.predictor.nearest_station(end)?,
            ),
            BlendMode::IndexMedians {
                start_station,
                end_station,
            } => (
                self.named_or_nearest(start_station, start)?,
                self.named_or_nearest(end_station, end)?,
            ),
        };
        if start_station.river != end_station.river {
            return Err(PwqError::RiverMismatch {
                start: start_station.name.clone(),
                start_river: start_station.river.clone(),
                end: end_station.name.clone(),
                end_river: end_station.river.clone(),
            });
        }
        Ok((start_station, end_station))
    }

    fn named_or_nearest(&self, name: &str, point: &Coordinate) -> Result<&'a Station> {
        match self.predictor.find_station(name) {
            Some(station) => Ok(station),
            None => {
                warn!("Unknown override station '{}', using nearest station", name);
                self.predictor.nearest_station(point)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn endpoints<'s>(
        &self,
        start: &'s Station,
        end: &'s Station,
        polyline: &RiverPolyline,
        si: usize,
        ei: usize,
        month: u32,
        year: i32,
        mode: &BlendMode,
    ) -> Result<Endpoints<'s>> {
        let start_prediction = self.predictor.predict_station(start, month, year)?;
        let end_prediction = self.predictor.predict_station(end, month, year)?;
        let (start_prediction, end_prediction) = match mode {
            BlendMode::Distance => (start_prediction, end_prediction),
            BlendMode::IndexMedians { .. } => {
                let (a, b) = (si.min(ei), si.max(ei));
                // the start group lies beyond whichever end of the stretch the start point snapped to
                let forward = si <= ei;
                let start_group = |idx: usize| if forward { idx <= a } else { idx >= b };
                let end_group = |idx: usize| if forward { idx >= b } else { idx <= a };
                (
                    self.median_prediction(&start.river, polyline, start_group, month, year)?
                        .unwrap_or(start_prediction),
                    self.median_prediction(&end.river, polyline, end_group, month, year)?
                        .unwrap_or(end_prediction),
                )
            }
        };
        Ok(Endpoints {
            start,
            end,
            start_prediction,
            end_prediction,
        })
    }

    /// Per-parameter median over the river's stations whose nearest vertex
    /// satisfies `select`. `None` when no station qualifies.
    fn median_prediction(
        &self,
        river: &str,
        polyline: &RiverPolyline,
        select: impl Fn(usize) -> bool,
        month: u32,
        year: i32,
    ) -> Result<Option<Prediction>> {
        let mut group = Vec::new();
        for station in self.predictor.stations().iter().filter(|s| s.river == river) {
            if select(polyline.nearest_index(&station.coordinate)) {
                group.push(self.predictor.predict_station(station, month, year)?);
            }
        }
        if group.is_empty() {
            return Ok(None);
        }
        debug!("Median over {} stations on {}", group.len(), river);
        Ok(Some(Prediction::from_raw(|parameter: Parameter| {
            let values: Vec<f64> = group.iter().map(|p| p.get(parameter)).collect();
            median(&values).unwrap_or(0.0)
        })))
    }
}

fn blend(samples: &[SamplePoint], endpoints: &Endpoints) -> Vec<InterpolationSample> {
    samples
        .iter()
        .map(|sample| {
            let t = sample.t_frac;
            let prediction = Prediction::from_raw(|parameter| {
                lerp(
                    endpoints.start_prediction.get(parameter),
                    endpoints.end_prediction.get(parameter),
                    t,
                )
            });
            let nearest = if t <= 0.5 { endpoints.start } else { endpoints.end };
            InterpolationSample {
                coordinate: sample.coordinate,
                t_frac: t,
                nearest_location: nearest.name.clone(),
                nearest_river: nearest.river.clone(),
                prediction,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwq_core::prediction::WaterQuality;

    const KHADAKVASLA: Coordinate = Coordinate {
        latitude: 18.445044,
        longitude: 73.764876,
    };
    const DECCAN: Coordinate = Coordinate {
        latitude: 18.513323,
        longitude: 73.842613,
    };
    const AUNDH: Coordinate = Coordinate {
        latitude: 18.568465,
        longitude: 73.807117,
    };

    fn fixtures() -> (Predictor, RiverNetwork) {
        (
            Predictor::from_embedded().unwrap(),
            RiverNetwork::get_river_network().unwrap(),
        )
    }

    #[test]
    fn test_endpoint_consistency() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let samples = interpolator
            .interpolate(&KHADAKVASLA, &DECCAN, 5, 6, 2020, &BlendMode::Distance)
            .unwrap();
        assert_eq!(samples.len(), 5);

        let start = predictor.predict("Mutha", "Khadakvasla Dam", 6, 2020).unwrap();
        let end = predictor.predict("Mutha", "Deccan Bridge", 6, 2020).unwrap();
        assert_eq!(samples[0].t_frac, 0.0);
        assert_eq!(samples[0].prediction, start);
        assert_eq!(samples[0].nearest_location, "Khadakvasla Dam");
        assert_eq!(samples[4].t_frac, 1.0);
        assert_eq!(samples[4].prediction, end);
        assert_eq!(samples[4].nearest_location, "Deccan Bridge");
    }

    #[test]
    fn test_monotonic_t_frac() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let samples = interpolator
            .interpolate(&KHADAKVASLA, &DECCAN, 9, 3, 2023, &BlendMode::Distance)
            .unwrap();
        assert_eq!(samples.first().unwrap().t_frac, 0.0);
        assert_eq!(samples.last().unwrap().t_frac, 1.0);
        for pair in samples.windows(2) {
            assert!(pair[0].t_frac <= pair[1].t_frac);
        }
    }

    #[test]
    fn test_single_sample_midpoint() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let samples = interpolator
            .interpolate(&KHADAKVASLA, &DECCAN, 1, 6, 2020, &BlendMode::Distance)
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].t_frac, 0.5);
    }

    #[test]
    fn test_reversed_route_runs_from_start() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let mutha = network.get("Mutha").unwrap();
        let samples = interpolator
            .interpolate(&DECCAN, &KHADAKVASLA, 6, 6, 2020, &BlendMode::Distance)
            .unwrap();
        assert_eq!(samples[0].coordinate, mutha.points()[13]);
        assert_eq!(samples[5].coordinate, mutha.points()[0]);
        assert_eq!(samples[0].nearest_location, "Deccan Bridge");
        let deccan = predictor.predict("Mutha", "Deccan Bridge", 6, 2020).unwrap();
        assert_eq!(samples[0].prediction, deccan);
    }

    #[test]
    fn test_blend_is_linear_and_reclassified() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let samples = interpolator
            .interpolate(&KHADAKVASLA, &DECCAN, 3, 6, 2020, &BlendMode::Distance)
            .unwrap();
        // Khadakvasla pH 7.6, Deccan pH 7.05
        assert!((samples[1].prediction.ph - 7.33).abs() < 0.011);
        for s in &samples {
            let expected = WaterQuality::classify(
                s.prediction.ph,
                s.prediction.dissolved_oxygen,
                s.prediction.bod,
            );
            assert_eq!(s.prediction.water_quality, expected);
        }
    }

    #[test]
    fn test_river_mismatch() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let err = interpolator
            .interpolate(&AUNDH, &DECCAN, 5, 6, 2020, &BlendMode::Distance)
            .unwrap_err();
        match err {
            PwqError::RiverMismatch {
                start_river,
                end_river,
                ..
            } => {
                assert_eq!(start_river, "Mula");
                assert_eq!(end_river, "Mutha");
            }
            other => panic!("expected RiverMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_sample_count() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network).with_max_samples(10);
        assert!(matches!(
            interpolator.interpolate(&KHADAKVASLA, &DECCAN, 0, 6, 2020, &BlendMode::Distance),
            Err(PwqError::InvalidSampleCount { count: 0, max: 10 })
        ));
        assert!(matches!(
            interpolator.interpolate(&KHADAKVASLA, &DECCAN, 11, 6, 2020, &BlendMode::Distance),
            Err(PwqError::InvalidSampleCount { count: 11, max: 10 })
        ));
        assert!(interpolator
            .interpolate(&KHADAKVASLA, &DECCAN, 10, 6, 2020, &BlendMode::Distance)
            .is_ok());
    }

    #[test]
    fn test_degenerate_route_returns_single_sample() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let near_dam = Coordinate::new(18.4452, 73.7650);
        let samples = interpolator
            .interpolate(&KHADAKVASLA, &near_dam, 5, 6, 2020, &BlendMode::Distance)
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].t_frac, 0.5);
    }

    #[test]
    fn test_invalid_month_propagates() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        assert!(matches!(
            interpolator.interpolate(&KHADAKVASLA, &DECCAN, 5, 13, 2020, &BlendMode::Distance),
            Err(PwqError::InvalidMonth(13))
        ));
    }

    /// Straight five-vertex Mutha stretch with stations placed on given vertices.
    fn toy_network_with(placements: &[(&str, usize)]) -> (Predictor, RiverNetwork, Vec<Coordinate>) {
        let points: Vec<Coordinate> = (0..5)
            .map(|i| Coordinate::new(18.40 + 0.01 * i as f64, 73.70 + 0.01 * i as f64))
            .collect();
        let stations = placements
            .iter()
            .enumerate()
            .map(|(i, (name, at))| Station {
                id: i as u32 + 1,
                name: String::from(*name),
                river: String::from("Mutha"),
                coordinate: points[*at],
                description: String::new(),
            })
            .collect();
        let table = Predictor::from_embedded().unwrap().table().clone();
        let network =
            RiverNetwork::from_polylines(vec![RiverPolyline::new("Mutha", points.clone()).unwrap()]);
        (Predictor::new(table, stations), network, points)
    }

    fn toy_network() -> (Predictor, RiverNetwork, Vec<Coordinate>) {
        toy_network_with(&[
            ("Khadakvasla Dam", 0),
            ("Deccan Bridge", 1),
            ("Veer Savarkar Bhavan", 3),
            ("Sangam Bridge", 4),
        ])
    }

    #[test]
    fn test_mode_selected_by_names() {
        assert_eq!(BlendMode::from_station_names(None, None), BlendMode::Distance);
        assert_eq!(
            BlendMode::from_station_names(Some("Deccan Bridge"), None),
            BlendMode::Distance
        );
        assert!(matches!(
            BlendMode::from_station_names(Some("Deccan Bridge"), Some("Sangam Bridge")),
            BlendMode::IndexMedians { .. }
        ));
    }

    #[test]
    fn test_index_medians_blend_station_groups() {
        let (predictor, network, points) = toy_network();
        let interpolator = Interpolator::new(&predictor, &network);
        let mode = BlendMode::from_station_names(Some("Deccan Bridge"), Some("Veer Savarkar Bhavan"));
        let samples = interpolator
            .interpolate(&points[1], &points[3], 3, 6, 2020, &mode)
            .unwrap();

        // start group: Khadakvasla 7.6 and Deccan 7.05; end group: VSB 7.1 and Sangam 7.15
        assert!((samples[0].prediction.ph - 7.325).abs() <= 0.006);
        assert!((samples[2].prediction.ph - 7.125).abs() <= 0.006);

        let distance = interpolator
            .interpolate(&points[1], &points[3], 3, 6, 2020, &BlendMode::Distance)
            .unwrap();
        assert_eq!(distance[0].prediction.ph, 7.05);
        assert_ne!(distance[0].prediction, samples[0].prediction);
    }

    #[test]
    fn test_index_medians_reversed_groups() {
        let (predictor, network, points) = toy_network();
        let interpolator = Interpolator::new(&predictor, &network);
        let mode = BlendMode::from_station_names(Some("Veer Savarkar Bhavan"), Some("Deccan Bridge"));
        let samples = interpolator
            .interpolate(&points[3], &points[1], 3, 6, 2020, &mode)
            .unwrap();
        assert!((samples[0].prediction.ph - 7.125).abs() <= 0.006);
        assert!((samples[2].prediction.ph - 7.325).abs() <= 0.006);
        assert_eq!(samples[0].nearest_location, "Veer Savarkar Bhavan");
    }

    #[test]
    fn test_index_medians_unknown_name_uses_nearest() {
        let (predictor, network, points) = toy_network();
        let interpolator = Interpolator::new(&predictor, &network);
        let mode = BlendMode::from_station_names(Some("Nowhere"), Some("Sangam Bridge"));
        let samples = interpolator
            .interpolate(&points[0], &points[4], 2, 6, 2020, &mode)
            .unwrap();
        assert_eq!(samples[0].nearest_location, "Khadakvasla Dam");
        assert_eq!(samples[0].prediction.ph, 7.6);
    }

    #[test]
    fn test_index_medians_empty_group_uses_named_station() {
        let (predictor, network, points) = toy_network_with(&[
            ("Deccan Bridge", 1),
            ("Veer Savarkar Bhavan", 3),
            ("Sangam Bridge", 4),
        ]);
        let interpolator = Interpolator::new(&predictor, &network);
        let mode = BlendMode::from_station_names(Some("Deccan Bridge"), Some("Veer Savarkar Bhavan"));
        // no station at or before vertex 0
        let samples = interpolator
            .interpolate(&points[0], &points[3], 2, 6, 2020, &mode)
            .unwrap();
        assert_eq!(samples[0].prediction.ph, 7.05);
        assert_eq!(samples[0].nearest_location, "Deccan Bridge");
        // VSB 7.1 and Sangam 7.15
        assert!((samples[1].prediction.ph - 7.125).abs() <= 0.006);
    }

    #[test]
    fn test_interpolate_path_uses_given_points() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let mutha = network.get("Mutha").unwrap();
        let path = &mutha.points()[0..=13];
        let samples = interpolator
            .interpolate_path(path, 5, 6, 2020, &BlendMode::Distance, true)
            .unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].coordinate, path[0]);
        assert_eq!(samples[4].coordinate, path[13]);
        // snapped to input vertices
        for s in &samples {
            assert!(path.contains(&s.coordinate));
        }
        assert!(matches!(
            interpolator.interpolate_path(&[], 5, 6, 2020, &BlendMode::Distance, true),
            Err(PwqError::MissingEndpoints)
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let expected = interpolator
            .interpolate(&KHADAKVASLA, &DECCAN, 7, 6, 2021, &BlendMode::Distance)
            .unwrap();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        interpolator
                            .interpolate(&KHADAKVASLA, &DECCAN, 7, 6, 2021, &BlendMode::Distance)
                            .unwrap()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
