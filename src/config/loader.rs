//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading jurisdiction
//! rate tables from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{JurisdictionConfig, JurisdictionMetadata, RateTable};

/// Loads and provides access to jurisdiction rate tables.
///
/// # Directory Structure
///
/// ```text
/// config/cm_general/
/// ├── jurisdiction.yaml   # Jurisdiction metadata and currency
/// └── rates/
///     └── 2024-01-01.yaml # Rate table effective from this date
/// ```
///
/// Every rate table is validated while loading, so a loader that was built
/// successfully only ever hands out complete tables.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/cm_general").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let table = loader.rate_table_for(date).unwrap();
/// println!("Social security rate: {}", table.social_security.rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: JurisdictionConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `jurisdiction.yaml` or the `rates` directory is missing
    /// - Any file contains invalid YAML
    /// - Any rate table fails [`RateTable::validate`]
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<JurisdictionMetadata>(&path.join("jurisdiction.yaml"))?;
        let rate_tables = Self::load_rate_tables(&path.join("rates"))?;

        Ok(Self {
            config: JurisdictionConfig::new(metadata, rate_tables),
        })
    }

    /// Builds a loader from an already-assembled configuration.
    pub fn from_config(config: JurisdictionConfig) -> EngineResult<Self> {
        for table in config.rate_tables() {
            table.validate()?;
        }
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and validates all rate table files from the rates directory.
    fn load_rate_tables(rates_dir: &Path) -> EngineResult<Vec<RateTable>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let table = Self::load_yaml::<RateTable>(&path)?;
                table.validate().map_err(|e| EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                tables.push(table);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the underlying jurisdiction configuration.
    pub fn config(&self) -> &JurisdictionConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.metadata()
    }

    /// Returns the rate table in force on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RateTableNotFound`] when every loaded version
    /// takes effect after `date`.
    pub fn rate_table_for(&self, date: NaiveDate) -> EngineResult<&RateTable> {
        self.config.rate_table_for(date)
    }
}
