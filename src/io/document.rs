//! Read/write tagged model documents.
//!
//! A document is a small YAML file naming the extension and tag its tree was
//! written with:
//!
//! ```yaml
//! extension_uri: asdf://stsci.edu/grismstuff/extensions/extension-1.0
//! tag: tag:stsci.edu:grismstuff/dispxy_model-1.0.0
//! tree:
//!   ematrix: [[...], [...]]
//!   inverse_flag: false
//!   offset: 0.0
//! ```
//!
//! Reading dispatches on the tag through the configured extensions and
//! validates the tree against the tag's registered schema before decoding.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{DispersionError, Result};
use crate::models::DispersionModel;
use crate::persist::{Converter, DISPXY_TYPE_NAME, DispersionConverter, PersistenceConfig, Tree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub extension_uri: String,
    pub tag: String,
    pub tree: Tree,
}

/// Encode `model` into a document using the first extension that can tag it.
pub fn to_document(model: &DispersionModel, config: &PersistenceConfig) -> Result<ModelDocument> {
    let (extension, tag) = config
        .extensions
        .iter()
        .find_map(|ext| ext.tag_for_type(DISPXY_TYPE_NAME).map(|tag| (ext, tag)))
        .ok_or_else(|| {
            DispersionError::Format(format!("no extension declares a tag for {DISPXY_TYPE_NAME}"))
        })?;

    let tree = DispersionConverter.to_tree(model)?;
    config.validate(tag, &tree)?;

    Ok(ModelDocument {
        extension_uri: extension.extension_uri.clone(),
        tag: tag.to_string(),
        tree,
    })
}

/// Decode a document back into a model.
pub fn from_document(document: &ModelDocument, config: &PersistenceConfig) -> Result<DispersionModel> {
    let tag = document.tag.as_str();
    let unsupported = || DispersionError::UnsupportedTag { tag: tag.to_string() };

    let extension = config.extension_for_tag(tag).ok_or_else(unsupported)?;
    if extension.extension_uri != document.extension_uri {
        warn!(
            "document names extension {} but tag {tag} resolved through {}",
            document.extension_uri, extension.extension_uri
        );
    }
    match extension.converter_for(tag) {
        Some(binding) if binding.type_name == DISPXY_TYPE_NAME => {}
        _ => return Err(unsupported()),
    }

    config.validate(tag, &document.tree)?;
    DispersionConverter.from_tree(&document.tree, tag)
}

pub fn to_document_string(model: &DispersionModel, config: &PersistenceConfig) -> Result<String> {
    Ok(serde_yaml::to_string(&to_document(model, config)?)?)
}

pub fn from_document_str(text: &str, config: &PersistenceConfig) -> Result<DispersionModel> {
    let document: ModelDocument = serde_yaml::from_str(text)?;
    from_document(&document, config)
}

/// Write a model document to `path`.
pub fn write_document(path: &Path, model: &DispersionModel, config: &PersistenceConfig) -> Result<()> {
    let text = to_document_string(model, config)?;
    fs::write(path, text).map_err(|e| DispersionError::io("write", path, e))?;
    debug!("wrote dispersion model document to {}", path.display());
    Ok(())
}

/// Read a model document from `path`.
pub fn read_document(path: &Path, config: &PersistenceConfig) -> Result<DispersionModel> {
    let text = fs::read_to_string(path).map_err(|e| DispersionError::io("read", path, e))?;
    debug!("read dispersion model document from {}", path.display());
    from_document_str(&text, config)
}
