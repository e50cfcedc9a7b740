pub mod coefficients;
pub mod coordinate;
pub mod encoder;
pub mod error;
pub mod prediction;
pub mod predictor;
pub mod report;
pub mod river;
pub mod station;
