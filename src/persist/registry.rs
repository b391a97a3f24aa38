//! Schema resources and the persistence configuration they are registered in.
//!
//! [`add_schemas`] is the startup step that makes the two grism schemas known:
//! each document is read from the configured resource directory, parsed as
//! YAML, re-emitted and stored under its URI. Both documents are loaded
//! before either is inserted, so a failure leaves the registry untouched.
//!
//! Callers that want one shared configuration use [`initialize`], which
//! builds it exactly once per process.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use log::{debug, info};

use crate::config::ResourceConfig;
use crate::error::{DispersionError, Result};
use crate::persist::converter::Tree;
use crate::persist::extension::{DISPXY_SCHEMA_URI, Extension};
use crate::persist::validate::{RequiredProperties, SchemaValidator};

pub const SPECWCS_SCHEMA_URI: &str = "asdf://stsci.edu/grismstuff/specwcs_wfc3ir_grism.schema";

pub const SPECWCS_SCHEMA_FILE: &str = "specwcs_wfc3ir_grism.schema.yaml";
pub const DISPXY_SCHEMA_FILE: &str = "dispxy-1.0.schema.yaml";

/// Schema files and the URIs they are registered under, in registration order.
pub const SCHEMA_RESOURCES: [(&str, &str); 2] = [
    (SPECWCS_SCHEMA_URI, SPECWCS_SCHEMA_FILE),
    (DISPXY_SCHEMA_URI, DISPXY_SCHEMA_FILE),
];

/// URI -> document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, String>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `text` under `uri`, replacing any previous mapping.
    pub fn add_resource_mapping(&mut self, uri: impl Into<String>, text: impl Into<String>) {
        let uri = uri.into();
        let text = text.into();
        debug!("registering resource {uri} ({} bytes)", text.len());
        self.resources.insert(uri, text);
    }

    pub fn get(&self, uri: &str) -> Option<&str> {
        self.resources.get(uri).map(String::as_str)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.resources.contains_key(uri)
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Read a YAML resource and return its normalized text.
pub fn load_schema_document(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| DispersionError::resource_load(path, e))?;
    let parsed: serde_yaml::Value =
        serde_yaml::from_str(&text).map_err(|e| DispersionError::resource_load(path, e))?;
    if parsed.is_null() {
        return Err(DispersionError::resource_load(path, "document is empty"));
    }
    serde_yaml::to_string(&parsed).map_err(|e| DispersionError::resource_load(path, e))
}

/// Register the WFC3 IR specwcs and the dispersion model schemas.
pub fn add_schemas(registry: &mut ResourceRegistry, config: &ResourceConfig) -> Result<()> {
    let loaded = SCHEMA_RESOURCES
        .iter()
        .map(|&(uri, file)| -> Result<(&str, String)> {
            Ok((uri, load_schema_document(&config.schema_path(file))?))
        })
        .collect::<Result<Vec<_>>>()?;

    for (uri, text) in loaded {
        registry.add_resource_mapping(uri, text);
    }
    Ok(())
}

/// Everything the persistence layer needs to read and write tagged trees.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub resources: ResourceRegistry,
    pub extensions: Vec<Extension>,
    pub validator: Arc<dyn SchemaValidator>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            resources: ResourceRegistry::new(),
            extensions: Vec::new(),
            validator: Arc::new(RequiredProperties),
        }
    }
}

impl PersistenceConfig {
    /// Empty configuration plus the dispersion extension and its schemas.
    pub fn with_dispersion(config: &ResourceConfig) -> Result<Self> {
        let mut out = Self::default();
        add_schemas(&mut out.resources, config)?;
        out.add_extension(Extension::dispersion());
        Ok(out)
    }

    pub fn add_extension(&mut self, extension: Extension) {
        debug!("registering extension {}", extension.extension_uri);
        self.extensions.push(extension);
    }

    pub fn extension(&self, extension_uri: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.extension_uri == extension_uri)
    }

    /// First extension with a converter for `tag`.
    pub fn extension_for_tag(&self, tag: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.converter_for(tag).is_some())
    }

    /// Validate `node` against the schema bound to `tag`, if one is
    /// registered. A tag with a declared schema that is missing from the
    /// registry is an error.
    pub fn validate(&self, tag: &str, node: &Tree) -> Result<()> {
        let Some(schema_uri) = self.extension_for_tag(tag).and_then(|e| e.schema_for(tag)) else {
            return Ok(());
        };
        let schema = self.resources.get(schema_uri).ok_or_else(|| DispersionError::UnknownSchema {
            uri: schema_uri.to_string(),
        })?;
        self.validator.validate(schema_uri, schema, node)
    }
}

static GLOBAL: OnceLock<PersistenceConfig> = OnceLock::new();

/// Build the process-wide configuration on first call; later calls return it
/// unchanged and ignore `config`.
pub fn initialize(config: &ResourceConfig) -> Result<&'static PersistenceConfig> {
    if let Some(existing) = GLOBAL.get() {
        return Ok(existing);
    }
    let built = PersistenceConfig::with_dispersion(config)?;
    // A racing caller may have stored its own value first; only the winner logs.
    let mut stored = false;
    let global = GLOBAL.get_or_init(|| {
        stored = true;
        built
    });
    if stored {
        info!(
            "persistence configured: {} extension(s), {} schema(s)",
            global.extensions.len(),
            global.resources.len()
        );
    }
    Ok(global)
}

/// The process-wide configuration, if [`initialize`] has succeeded.
pub fn global() -> Option<&'static PersistenceConfig> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn resource_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("schemas")).unwrap();
        for (name, text) in files {
            fs::write(dir.path().join("schemas").join(name), text).unwrap();
        }
        dir
    }

    #[test]
    fn registers_both_schemas() {
        let dir = resource_dir(&[
            (SPECWCS_SCHEMA_FILE, "title: specwcs\ntype: object\n"),
            (DISPXY_SCHEMA_FILE, "title: dispxy\ntype: object\n"),
        ]);
        let mut registry = ResourceRegistry::new();
        add_schemas(&mut registry, &ResourceConfig::new(dir.path())).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get(SPECWCS_SCHEMA_URI).unwrap().contains("specwcs"));
        assert!(registry.get(DISPXY_SCHEMA_URI).unwrap().contains("dispxy"));
        assert_eq!(
            registry.uris().collect::<Vec<_>>(),
            [DISPXY_SCHEMA_URI, SPECWCS_SCHEMA_URI]
        );
    }

    #[test]
    fn registered_text_is_normalized_yaml() {
        let dir = resource_dir(&[
            (SPECWCS_SCHEMA_FILE, "{title: specwcs,   type: object}"),
            (DISPXY_SCHEMA_FILE, "required: [a, b]\n"),
        ]);
        let mut registry = ResourceRegistry::new();
        add_schemas(&mut registry, &ResourceConfig::new(dir.path())).unwrap();

        let text = registry.get(SPECWCS_SCHEMA_URI).unwrap();
        let reparsed: serde_yaml::Value = serde_yaml::from_str(text).unwrap();
        assert_eq!(reparsed["title"].as_str(), Some("specwcs"));
        assert_eq!(reparsed["type"].as_str(), Some("object"));
    }

    #[test]
    fn missing_file_registers_nothing() {
        let dir = resource_dir(&[(SPECWCS_SCHEMA_FILE, "title: specwcs\n")]);
        let mut registry = ResourceRegistry::new();
        let err = add_schemas(&mut registry, &ResourceConfig::new(dir.path())).unwrap_err();

        match err {
            DispersionError::ResourceLoad { path, .. } => assert!(path.ends_with(DISPXY_SCHEMA_FILE)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn unparsable_file_is_a_load_error() {
        let dir = resource_dir(&[
            (SPECWCS_SCHEMA_FILE, "title: [unclosed\n"),
            (DISPXY_SCHEMA_FILE, "title: dispxy\n"),
        ]);
        let mut registry = ResourceRegistry::new();
        assert!(matches!(
            add_schemas(&mut registry, &ResourceConfig::new(dir.path())),
            Err(DispersionError::ResourceLoad { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn bundled_schemas_register_and_validate() {
        let config = PersistenceConfig::with_dispersion(&ResourceConfig::bundled()).unwrap();
        assert!(config.resources.contains(SPECWCS_SCHEMA_URI));
        assert!(config.resources.contains(DISPXY_SCHEMA_URI));
        assert!(config.extension("asdf://stsci.edu/grismstuff/extensions/extension-1.0").is_some());

        let good: Tree = serde_yaml::from_str(
            "ematrix: [[1, 0, 0, 0, 0, 0], [0, 0, 0, 0, 0, 1]]\ninverse_flag: false\noffset: 0.0\n",
        )
        .unwrap();
        config
            .validate("tag:stsci.edu:grismstuff/dispxy_model-1.0.0", &good)
            .unwrap();

        let bad: Tree = serde_yaml::from_str("ematrix: [[1]]\noffset: 0.0\n").unwrap();
        assert!(matches!(
            config.validate("tag:stsci.edu:grismstuff/dispxy_model-1.0.0", &bad),
            Err(DispersionError::Validation { .. })
        ));
    }

    #[test]
    fn declared_schema_must_be_registered() {
        let mut config = PersistenceConfig::default();
        config.add_extension(Extension::dispersion());
        let node: Tree = serde_yaml::from_str("offset: 1.0").unwrap();
        assert!(matches!(
            config.validate("tag:stsci.edu:grismstuff/dispxy_model-1.0.0", &node),
            Err(DispersionError::UnknownSchema { .. })
        ));

        // Tags nobody declared are not validated.
        config.validate("tag:example.org:unknown-1.0.0", &node).unwrap();
    }

    #[test]
    fn initialize_runs_once() {
        let first = initialize(&ResourceConfig::bundled()).unwrap();
        let second = initialize(&ResourceConfig::new("/does/not/exist")).unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(global().unwrap(), first));
        assert_eq!(first.resources.len(), 2);
    }

    #[test]
    fn concurrent_initialize_shares_one_config() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    initialize(&ResourceConfig::bundled()).unwrap() as *const PersistenceConfig as usize
                })
            })
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(addrs[0], global().unwrap() as *const PersistenceConfig as usize);
    }
}
