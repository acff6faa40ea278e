//! Shop Configuration
//!
//! Loaded from a JSON file; keys missing from the file fall back to
//! defaults, and `SHOP_*` environment variables win over both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

const DATABASE_FILE: &str = "suteki_shop.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Directory holding the SQLite database
    pub data_dir: PathBuf,
    /// Directory for the rolling log files
    pub log_dir: PathBuf,
    /// Prefix of the log file names
    pub app_name: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
            app_name: "SutekiShop".to_string(),
        }
    }
}

impl ShopConfig {
    /// Read `path`, then apply environment overrides.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> DomainResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`ShopConfig::load`] with overrides taken from `lookup`
    pub fn load_with<F>(path: &Path, lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|e| DomainError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
            Self::from_json(&text)?
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        Ok(config.with_overrides(lookup))
    }

    pub fn from_json(text: &str) -> DomainResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| DomainError::InvalidInput(format!("Invalid shop config: {}", e)))
    }

    /// Apply overrides from any lookup, e.g. the process environment
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("SHOP_DATA_DIR").filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("SHOP_LOG_DIR").filter(|v| !v.is_empty()) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup("SHOP_APP_NAME").filter(|v| !v.is_empty()) {
            self.app_name = name;
        }
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}
