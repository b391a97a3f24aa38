//! Persisted record types.
//!
//! [`DispersionRecord`] is the plain intermediate form the codec hands to the
//! persistence layer. Its field names and nesting are an external contract:
//!
//! ```text
//! ematrix: [[a0, a1, a2, a3, a4, a5], [b0, b1, b2, b3, b4, b5]]
//! inverse_flag: <bool>
//! offset: <real>
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{DispersionError, Result};
use crate::models::DispersionModel;

/// Field names of the persisted record.
pub const FIELD_EMATRIX: &str = "ematrix";
pub const FIELD_INVERSE_FLAG: &str = "inverse_flag";
pub const FIELD_OFFSET: &str = "offset";

/// The three-field record a [`DispersionModel`] is stored as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionRecord {
    pub ematrix: Vec<Vec<f64>>,
    pub inverse_flag: bool,
    pub offset: f64,
}

impl From<&DispersionModel> for DispersionRecord {
    fn from(model: &DispersionModel) -> Self {
        Self {
            ematrix: model.rows(),
            inverse_flag: model.is_inverse(),
            offset: model.offset(),
        }
    }
}

impl TryFrom<DispersionRecord> for DispersionModel {
    type Error = DispersionError;

    fn try_from(record: DispersionRecord) -> Result<Self> {
        DispersionModel::from_rows(&record.ematrix, record.offset, record.inverse_flag)
    }
}
