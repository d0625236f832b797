//! Store configuration via `schemapath.toml`
//!
//! The config file names the two JSON documents a [`MemoryStore`] is loaded
//! from. Relative paths are taken relative to the directory holding the
//! config file, so a data directory can be moved as a whole.
//!
//! [`MemoryStore`]: crate::MemoryStore

use std::path::{Path, PathBuf};

use schemapath_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "schemapath.toml";

/// Default schema document file name.
pub const DEFAULT_SCHEMAS_FILE: &str = "schemas.json";

/// Default record document file name.
pub const DEFAULT_RECORDS_FILE: &str = "records.json";

/// Store configuration loaded from `schemapath.toml`.
///
/// # Example
///
/// ```toml
/// # Schema document: { "<type>": <schema definition>, ... }
/// schemas = "schemas.json"
///
/// # Record document: { "<type>": { "<id>": <record envelope>, ... }, ... }
/// records = "records.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the schema document.
    #[serde(default = "default_schemas")]
    pub schemas: PathBuf,
    /// Path to the record document.
    #[serde(default = "default_records")]
    pub records: PathBuf,
}

fn default_schemas() -> PathBuf {
    PathBuf::from(DEFAULT_SCHEMAS_FILE)
}

fn default_records() -> PathBuf {
    PathBuf::from(DEFAULT_RECORDS_FILE)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            schemas: default_schemas(),
            records: default_records(),
        }
    }
}

impl StoreConfig {
    /// Config pointing at explicit document paths.
    pub fn new(schemas: impl Into<PathBuf>, records: impl Into<PathBuf>) -> Self {
        Self {
            schemas: schemas.into(),
            records: records.into(),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# schemapath store configuration
#
# Relative paths are resolved against the directory of this file.

# Schema document: { "<type>": <schema definition>, ... }
schemas = "schemas.json"

# Record document: { "<type>": { "<id>": <record envelope>, ... }, ... }
records = "records.json"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// Relative document paths are rebased onto the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::storage(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: StoreConfig = toml::from_str(&content).map_err(|e| {
            Error::storage(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Rebase relative document paths onto `base`.
    pub fn relative_to(self, base: &Path) -> Self {
        let rebase = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Self {
            schemas: rebase(self.schemas),
            records: rebase(self.records),
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(true)` if the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml()).map_err(|e| {
            Error::storage(format!(
                "failed to write default config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(true)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::storage(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::storage(format!(
                "failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
