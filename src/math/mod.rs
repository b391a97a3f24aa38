//! Mathematical utilities: the monomial basis shared by both coefficient rows.

pub mod basis;

pub use basis::*;
