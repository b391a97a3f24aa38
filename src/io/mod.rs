//! Input/output helpers.
//!
//! - tagged YAML model documents (`document`)
//! - bare record JSON read/write (`json`)

pub mod document;
pub mod json;

pub use document::*;
pub use json::*;
