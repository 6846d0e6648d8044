//! Data source configuration.

use serde::{Deserialize, Serialize};

use crate::dialect::DialectKind;
use crate::error::Result;

/// Environment variable naming a dialect that bypasses detection.
pub const DIALECT_ENV: &str = "OXIDE_DATA_DIALECT";

/// Dialect selection and rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Fixed dialect. When set, connection metadata is never probed.
    pub dialect: Option<DialectKind>,
    /// Provider probing order. Empty means the built-in order.
    pub providers: Vec<DialectKind>,
    /// Quote every identifier in rendered SQL.
    pub force_quote: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dialect: None,
            providers: Vec::new(),
            force_quote: true,
        }
    }
}

impl DataConfig {
    /// Parses configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DialectError::Config`] on malformed input or unknown
    /// dialect names.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Applies [`DIALECT_ENV`] from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DialectError::Config`] when the variable names no
    /// known dialect.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DialectError::Config`] when the dialect override
    /// names no known dialect.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(name) = lookup(DIALECT_ENV) {
            let value = serde_json::Value::String(name.trim().to_lowercase());
            self.dialect = Some(serde_json::from_value(value)?);
        }
        Ok(self)
    }
}
