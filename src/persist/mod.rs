//! Persistence glue: converters, extension identity, schema registration.
//!
//! - tag pattern matching (`tag`)
//! - model <-> tree conversion (`converter`)
//! - extension declaration (`extension`)
//! - schema resources and the persistence configuration (`registry`)
//! - schema validation seam (`validate`)

pub mod converter;
pub mod extension;
pub mod registry;
pub mod tag;
pub mod validate;

pub use converter::*;
pub use extension::*;
pub use registry::*;
pub use tag::*;
pub use validate::*;
