//! Interpolation of water quality predictions along river paths.
//!
//! Turns two points on a river (or a caller-sliced stretch of it) into an
//! ordered series of predicted samples between the stations at either end.

pub mod interpolation;
pub mod request;
pub mod sampling;
