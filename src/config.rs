//! Resource location configuration.
//!
//! Schema documents live under `<resource_dir>/schemas/`. The directory comes
//! from `GRISMSTUFF_RESOURCE_DIR` (a `.env` file is honoured); without it we
//! use the `resources/` directory shipped with this crate.

use std::path::{Path, PathBuf};

use log::debug;

/// Environment variable naming the resource directory.
pub const RESOURCE_DIR_ENV: &str = "GRISMSTUFF_RESOURCE_DIR";

const BUNDLED_RESOURCE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    pub resource_dir: PathBuf,
}

impl ResourceConfig {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
        }
    }

    /// Resolve from the process environment (after loading `.env`, if any).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(RESOURCE_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            Some(dir) => {
                debug!("resource dir from {RESOURCE_DIR_ENV}: {dir}");
                Self::new(dir)
            }
            None => {
                debug!("{RESOURCE_DIR_ENV} unset, using bundled resources at {BUNDLED_RESOURCE_DIR}");
                Self::bundled()
            }
        }
    }

    /// The schemas shipped alongside this crate.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_RESOURCE_DIR)
    }

    pub fn schema_dir(&self) -> PathBuf {
        self.resource_dir.join("schemas")
    }

    pub fn schema_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.schema_dir().join(file_name)
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self::bundled()
    }
}
