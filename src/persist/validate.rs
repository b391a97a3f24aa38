//! Schema validation seam.
//!
//! Full JSON-schema validation is an external concern. The persistence code
//! only needs something implementing [`SchemaValidator`]; the default
//! [`RequiredProperties`] covers the top level of a schema: the `required`
//! list and the primitive `type` of each declared property.

use std::fmt::Debug;

use serde_yaml::Value;

use crate::error::{DispersionError, Result};
use crate::persist::converter::Tree;

pub trait SchemaValidator: Debug + Send + Sync {
    /// Check `node` against the schema document `schema_text`.
    fn validate(&self, schema_uri: &str, schema_text: &str, node: &Tree) -> Result<()>;
}

/// Checks required top-level properties and their primitive types.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredProperties;

impl SchemaValidator for RequiredProperties {
    fn validate(&self, schema_uri: &str, schema_text: &str, node: &Tree) -> Result<()> {
        let schema: Value = serde_yaml::from_str(schema_text)?;
        let fail = |message: String| DispersionError::Validation {
            schema_uri: schema_uri.to_string(),
            message,
        };

        if let Some(expected) = schema.get("type").and_then(Value::as_str) {
            if !has_type(node, expected) {
                return Err(fail(format!("expected {expected} at the top level")));
            }
        }

        let required = schema
            .get("required")
            .and_then(Value::as_sequence)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str);
        for name in required {
            if node.get(name).is_none() {
                return Err(fail(format!("missing required property `{name}`")));
            }
        }

        let Some(properties) = schema.get("properties").and_then(Value::as_mapping) else {
            return Ok(());
        };
        for (name, definition) in properties {
            let (Some(name), Some(expected)) = (
                name.as_str(),
                definition.get("type").and_then(Value::as_str),
            ) else {
                continue;
            };
            if let Some(value) = node.get(name) {
                if !has_type(value, expected) {
                    return Err(fail(format!("property `{name}` is not of type {expected}")));
                }
            }
        }

        Ok(())
    }
}

fn has_type(value: &Value, expected: &str) -> bool {
    match expected {
        "object" => value.is_mapping(),
        "array" => value.is_sequence(),
        "string" => value.is_string(),
        "boolean" => value.is_bool(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "null" => value.is_null(),
        // Anything else is left to a full validator.
        _ => true,
    }
}
