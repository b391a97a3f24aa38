//! Domain types shared by the codec and the file I/O helpers.
//!
//! This module defines the persisted record (`DispersionRecord`) and the
//! field names that make up its external contract.

pub mod types;

pub use types::*;
