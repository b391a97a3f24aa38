//! `grism-dispersion` library crate.
//!
//! A bivariate polynomial dispersion model for slitless grism calibration,
//! plus the glue that stores it in tagged YAML documents:
//!
//! - `models`: the DISPXY model and its forward/inverse evaluation
//! - `persist`: converter, extension identity, schema registration
//! - `io`: document and JSON file helpers
//! - `config`: where schema resources are read from
//!
//! ```no_run
//! use grism_dispersion::config::ResourceConfig;
//! use grism_dispersion::models::{CoefficientMatrix, DispersionModel};
//!
//! let persistence = grism_dispersion::persist::initialize(&ResourceConfig::from_env())?;
//! let matrix = CoefficientMatrix::from_row_slice(&[
//!     1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
//!     0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
//! ]);
//! let model = DispersionModel::forward(matrix, 0.0);
//! assert_eq!(model.evaluate(2.0, 3.0, 5.0), 46.0);
//! grism_dispersion::io::write_document("dispx.yaml".as_ref(), &model, persistence)?;
//! # Ok::<(), grism_dispersion::error::DispersionError>(())
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod persist;

pub use error::{DispersionError, Result};
pub use models::DispersionModel;
