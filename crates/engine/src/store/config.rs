//! Collection configuration, optionally loaded from TOML
//!
//! ```toml
//! name = "people"
//! indexed_fields = ["job", "city"]
//! unique_key = "id"
//! ```
//!
//! The storage backend is not part of the file: it is a runtime object and
//! is supplied through [`crate::RecordStoreBuilder::backend`] or
//! [`crate::RecordStore::open`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use docstore_core::{Error, Result};

/// Default collection namespace
pub const DEFAULT_NAME: &str = "database";

/// Default unique-key field
pub const DEFAULT_UNIQUE_KEY: &str = "id";

/// Configuration of one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Collection namespace; every raw key is prefixed with `"<name>:"`
    #[serde(default = "default_name")]
    pub name: String,
    /// Fields maintained in secondary indexes. Fixed for the store's lifetime.
    #[serde(default)]
    pub indexed_fields: Vec<String>,
    /// Field stamped with each record's id
    #[serde(default = "default_unique_key")]
    pub unique_key: String,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_unique_key() -> String {
    DEFAULT_UNIQUE_KEY.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            indexed_fields: Vec::new(),
            unique_key: default_unique_key(),
        }
    }
}

impl StoreConfig {
    /// Config for collection `name` with defaults elsewhere
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check the configuration can back a store.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the name or unique key is empty, or an indexed field
    /// is empty or contains `':'` (which would alias the `<field>:<value>`
    /// index key layout). The unique key may be indexed like any other field.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::ConfigError("name must not be empty".to_string()));
        }
        if self.unique_key.is_empty() {
            return Err(Error::ConfigError(
                "unique_key must not be empty".to_string(),
            ));
        }
        for field in &self.indexed_fields {
            if field.is_empty() {
                return Err(Error::ConfigError(
                    "indexed field names must not be empty".to_string(),
                ));
            }
            if field.contains(':') {
                return Err(Error::ConfigError(format!(
                    "indexed field '{}' must not contain ':'",
                    field
                )));
            }
        }
        Ok(())
    }

    /// True if `field` is maintained in a secondary index
    pub fn is_indexed(&self, field: &str) -> bool {
        self.indexed_fields.iter().any(|f| f == field)
    }

    /// Parse from TOML text and validate
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    ///
    /// # Errors
    ///
    /// `IoError` if the file cannot be read, `ConfigError` if it is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::ConfigError(msg) => {
                Error::ConfigError(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Commented template with the default values
    pub fn default_toml() -> &'static str {
        r#"# docstore collection configuration
#
# Collection namespace. Raw storage keys are "<name>:<key>".
name = "database"

# Fields kept in secondary indexes for equality lookups.
# Cannot change once data exists. The unique key is only indexed if listed.
indexed_fields = []

# Field stamped with each record's store-assigned integer id.
unique_key = "id"
"#
    }
}
