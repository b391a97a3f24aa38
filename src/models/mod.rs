//! Dispersion model implementations.
//!
//! Evaluation is a pure function of the model and its inputs so that
//! persistence and calibration code can share one immutable value.

pub mod model;

pub use model::*;
