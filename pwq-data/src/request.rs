use crate::interpolation::{BlendMode, InterpolationSample, Interpolator};
use log::warn;
use pwq_core::{
    coordinate::Coordinate,
    error::{PwqError, Result},
};
use serde::{Deserialize, Serialize};

/// How samples are blended between stations. Only blending along the river
/// is supported.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendStrategy {
    #[default]
    River,
}

fn default_points() -> usize {
    5
}

fn default_month() -> u32 {
    6
}

fn default_year() -> i32 {
    2023
}

/// Interpolation request as sent by a map client.
///
/// Either `locations` (an already sliced stretch of river, start first, at
/// least two points) or both `start` and `end` must be given.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InterpolateRequest {
    #[serde(default)]
    pub locations: Vec<Coordinate>,
    #[serde(default)]
    pub start: Option<Coordinate>,
    #[serde(default)]
    pub end: Option<Coordinate>,
    #[serde(default = "default_points")]
    pub points: usize,
    #[serde(default = "default_month")]
    pub month: u32,
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default)]
    pub pick_from_input: bool,
    #[serde(default)]
    pub blend: BlendStrategy,
    #[serde(default)]
    pub start_station_name: Option<String>,
    #[serde(default)]
    pub end_station_name: Option<String>,
}

impl InterpolateRequest {
    pub fn blend_mode(&self) -> BlendMode {
        BlendMode::from_station_names(
            self.start_station_name.as_deref(),
            self.end_station_name.as_deref(),
        )
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InterpolateResponse {
    pub month: u32,
    pub year: i32,
    pub points: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub predictions: Vec<InterpolationSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> Interpolator<'a> {
    /// Answer an interpolation request. Failures are reported in the
    /// response's `error` field rather than returned.
    pub fn interpolate_predict(&self, request: &InterpolateRequest) -> InterpolateResponse {
        let (predictions, error) = match self.run_request(request) {
            Ok(predictions) => (predictions, None),
            Err(e) => {
                warn!("Interpolation request failed: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        };
        InterpolateResponse {
            month: request.month,
            year: request.year,
            points: request.points,
            predictions,
            error,
        }
    }

    fn run_request(&self, request: &InterpolateRequest) -> Result<Vec<InterpolationSample>> {
        let mode = request.blend_mode();
        if request.locations.len() >= 2 {
            return self.interpolate_path(
                &request.locations,
                request.points,
                request.month,
                request.year,
                &mode,
                request.pick_from_input,
            );
        }
        match (&request.start, &request.end) {
            (Some(start), Some(end)) => self.interpolate(
                start,
                end,
                request.points,
                request.month,
                request.year,
                &mode,
            ),
            _ => Err(PwqError::MissingEndpoints),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwq_core::{predictor::Predictor, river::RiverNetwork};
    use serde_json::json;

    fn fixtures() -> (Predictor, RiverNetwork) {
        (
            Predictor::from_embedded().unwrap(),
            RiverNetwork::get_river_network().unwrap(),
        )
    }

    #[test]
    fn test_request_defaults() {
        let request: InterpolateRequest = serde_json::from_value(json!({
            "start": {"latitude": 18.445044, "longitude": 73.764876},
            "end": {"latitude": 18.513323, "longitude": 73.842613}
        }))
        .unwrap();
        assert_eq!(request.points, 5);
        assert_eq!(request.month, 6);
        assert_eq!(request.year, 2023);
        assert!(!request.pick_from_input);
        assert_eq!(request.blend, BlendStrategy::River);
        assert_eq!(request.blend_mode(), BlendMode::Distance);
    }

    #[test]
    fn test_start_end_request() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let request: InterpolateRequest = serde_json::from_value(json!({
            "start": {"latitude": 18.445044, "longitude": 73.764876},
            "end": {"latitude": 18.513323, "longitude": 73.842613},
            "points": 4,
            "month": 6,
            "year": 2020,
            "blend": "river"
        }))
        .unwrap();
        let response = interpolator.interpolate_predict(&request);
        assert!(response.error.is_none());
        assert_eq!(response.predictions.len(), 4);

        let json = serde_json::to_value(&response).unwrap();
        let first = &json["predictions"][0];
        assert_eq!(first["t_frac"], 0.0);
        assert_eq!(first["nearest_location"], "Khadakvasla Dam");
        assert_eq!(first["nearest_river"], "Mutha");
        assert_eq!(first["pH"], 7.6);
        assert_eq!(first["Water Quality"], "Non Complying");
        assert!(first["latitude"].is_number());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_locations_request_with_overrides() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);
        let sub_path = &network.get("Mutha").unwrap().points()[0..=13];
        let request = InterpolateRequest {
            locations: sub_path.to_vec(),
            start: None,
            end: None,
            points: 5,
            month: 6,
            year: 2020,
            pick_from_input: true,
            blend: BlendStrategy::River,
            start_station_name: Some(String::from("Khadakvasla Dam")),
            end_station_name: Some(String::from("Deccan Bridge")),
        };
        assert!(matches!(request.blend_mode(), BlendMode::IndexMedians { .. }));
        let response = interpolator.interpolate_predict(&request);
        assert!(response.error.is_none());
        assert_eq!(response.predictions.len(), 5);
        assert_eq!(response.predictions[0].coordinate, sub_path[0]);
        assert_eq!(response.predictions[4].coordinate, sub_path[13]);
    }

    #[test]
    fn test_errors_reported_in_response() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);

        let missing: InterpolateRequest = serde_json::from_value(json!({"points": 3})).unwrap();
        let response = interpolator.interpolate_predict(&missing);
        assert!(response.predictions.is_empty());
        assert!(response.error.is_some());

        let mismatch: InterpolateRequest = serde_json::from_value(json!({
            "start": {"latitude": 18.568465, "longitude": 73.807117},
            "end": {"latitude": 18.513323, "longitude": 73.842613}
        }))
        .unwrap();
        let response = interpolator.interpolate_predict(&mismatch);
        assert!(response.predictions.is_empty());
        assert!(response.error.unwrap().contains("Mula"));

        let json = serde_json::to_value(interpolator.interpolate_predict(&missing)).unwrap();
        assert!(json.get("predictions").is_none());
        assert!(json["error"].is_string());
    }

    #[test]
    fn test_single_location_is_not_a_path() {
        let (predictor, network) = fixtures();
        let interpolator = Interpolator::new(&predictor, &network);

        let alone: InterpolateRequest = serde_json::from_value(json!({
            "locations": [{"latitude": 18.445044, "longitude": 73.764876}]
        }))
        .unwrap();
        let response = interpolator.interpolate_predict(&alone);
        assert!(response.predictions.is_empty());
        assert_eq!(
            response.error.unwrap(),
            PwqError::MissingEndpoints.to_string()
        );

        let with_endpoints: InterpolateRequest = serde_json::from_value(json!({
            "locations": [{"latitude": 18.445044, "longitude": 73.764876}],
            "start": {"latitude": 18.445044, "longitude": 73.764876},
            "end": {"latitude": 18.513323, "longitude": 73.842613},
            "points": 3
        }))
        .unwrap();
        let response = interpolator.interpolate_predict(&with_endpoints);
        assert!(response.error.is_none());
        assert_eq!(response.predictions.len(), 3);
    }

    #[test]
    fn test_unknown_blend_rejected() {
        let parsed: std::result::Result<InterpolateRequest, _> =
            serde_json::from_value(json!({"blend": "idw"}));
        assert!(parsed.is_err());
    }
}
