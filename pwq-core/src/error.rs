/// Error types for the water quality predictor
use thiserror::Error;

/// Main error type for prediction and interpolation
#[derive(Error, Debug)]
pub enum PwqError {
    /// Missing or malformed static configuration (coefficients, stations, river paths)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Coefficient table is not valid JSON for the expected layout
    #[error("Failed to parse coefficient table: {0}")]
    CoefficientParse(#[from] serde_json::Error),

    /// Station or river path CSV could not be read
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A configuration file could not be read from disk
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Month outside 1-12
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// Interpolation endpoints resolve to stations on different rivers
    #[error("Start station '{start}' is on {start_river} but end station '{end}' is on {end_river}")]
    RiverMismatch {
        start: String,
        start_river: String,
        end: String,
        end_river: String,
    },

    /// Requested number of interpolation samples is out of range
    #[error("Invalid sample count: {count} (expected 1 to {max})")]
    InvalidSampleCount { count: usize, max: usize },

    /// Neither a locations path nor both start and end points were given
    #[error("start and end coordinates OR a locations array required")]
    MissingEndpoints,

    /// A station's river has no polyline in the river network
    #[error("No river path loaded for {0}")]
    MissingRiverPath(String),

    /// The station list is empty, so no point can be resolved to a station
    #[error("No monitoring stations loaded")]
    NoStations,
}

/// Type alias for Results using PwqError
pub type Result<T> = std::result::Result<T, PwqError>;
