//! Converters between in-memory objects and YAML trees.
//!
//! A converter owns one object type and a set of tag patterns (see
//! [`super::tag`]). The dispersion converter maps a [`DispersionModel`] to the
//! three-field record described in [`crate::domain`] and back.

use serde_yaml::{Mapping, Value};

use crate::domain::{DispersionRecord, FIELD_EMATRIX, FIELD_INVERSE_FLAG, FIELD_OFFSET};
use crate::error::{DispersionError, Result};
use crate::models::DispersionModel;
use crate::persist::tag::tag_matches;

/// Generic YAML tree handed to and received from the persistence layer.
pub type Tree = Value;

/// Tag written for dispersion models.
pub const DISPXY_TAG: &str = "tag:stsci.edu:grismstuff/dispxy_model-1.0.0";

/// Pattern the dispersion converter answers to.
pub const DISPXY_TAG_PATTERN: &str = "tag:stsci.edu:grismstuff/dispxy_model-*";

/// Type binding name of [`DispersionConverter`].
pub const DISPXY_TYPE_NAME: &str = "DispersionModel";

/// Bidirectional mapping between one object type and tagged trees.
pub trait Converter {
    type Object;

    /// Tag patterns this converter handles.
    fn tags(&self) -> &[&'static str];

    /// Name of the type this converter binds.
    fn type_name(&self) -> &'static str;

    fn to_tree(&self, object: &Self::Object) -> Result<Tree>;

    /// Rebuild an object from `node`, which was stored under `tag`.
    fn from_tree(&self, node: &Tree, tag: &str) -> Result<Self::Object>;

    fn matches(&self, tag: &str) -> bool {
        self.tags().iter().any(|pattern| tag_matches(pattern, tag))
    }
}

/// Codec for [`DispersionModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DispersionConverter;

impl DispersionConverter {
    pub fn encode(&self, model: &DispersionModel) -> DispersionRecord {
        DispersionRecord::from(model)
    }

    /// Decode a record tree. Every field is required; an absent or null field
    /// fails with [`DispersionError::MissingField`].
    pub fn decode(&self, node: &Tree) -> Result<DispersionModel> {
        let map = node
            .as_mapping()
            .ok_or_else(|| DispersionError::Format("dispersion model node is not a mapping".into()))?;

        let ematrix = parse_ematrix(required(map, FIELD_EMATRIX)?)?;
        let inverse_flag = required(map, FIELD_INVERSE_FLAG)?
            .as_bool()
            .ok_or(DispersionError::InvalidField {
                field: FIELD_INVERSE_FLAG,
                expected: "a boolean",
            })?;
        let offset = required(map, FIELD_OFFSET)?
            .as_f64()
            .ok_or(DispersionError::InvalidField {
                field: FIELD_OFFSET,
                expected: "a number",
            })?;

        DispersionModel::try_from(DispersionRecord {
            ematrix,
            inverse_flag,
            offset,
        })
    }
}

impl Converter for DispersionConverter {
    type Object = DispersionModel;

    fn tags(&self) -> &[&'static str] {
        &[DISPXY_TAG_PATTERN]
    }

    fn type_name(&self) -> &'static str {
        DISPXY_TYPE_NAME
    }

    fn to_tree(&self, model: &DispersionModel) -> Result<Tree> {
        Ok(serde_yaml::to_value(self.encode(model))?)
    }

    fn from_tree(&self, node: &Tree, tag: &str) -> Result<DispersionModel> {
        if !self.matches(tag) {
            return Err(DispersionError::UnsupportedTag { tag: tag.to_string() });
        }
        self.decode(node)
    }
}

fn required<'a>(map: &'a Mapping, field: &'static str) -> Result<&'a Value> {
    match map.get(field) {
        None | Some(Value::Null) => Err(DispersionError::MissingField { field }),
        Some(value) => Ok(value),
    }
}

fn parse_ematrix(value: &Value) -> Result<Vec<Vec<f64>>> {
    let invalid = DispersionError::InvalidField {
        field: FIELD_EMATRIX,
        expected: "a nested sequence of numbers",
    };
    let Some(rows) = value.as_sequence() else {
        return Err(invalid);
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(row) = row.as_sequence() else {
            return Err(invalid);
        };
        let parsed: Option<Vec<f64>> = row.iter().map(Value::as_f64).collect();
        match parsed {
            Some(parsed) => out.push(parsed),
            None => return Err(invalid),
        }
    }
    Ok(out)
}
