use crate::utils::error::{CatalogError, Result};
use serde::Deserialize;
use std::path::Path;

/// Optional TOML configuration file. Every field may be omitted; explicit
/// CLI flags take precedence over file values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub bind: Option<String>,
    pub database_url: Option<String>,
    pub tech_database: Option<String>,
    pub software_database: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CatalogError::InvalidConfigValueError {
            field: "config".to_string(),
            value: path.display().to_string(),
            reason: format!("Invalid TOML: {}", e),
        })
    }
}
