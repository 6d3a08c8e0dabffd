//! Rate table loading and management for the Payroll Engine.
//!
//! This module provides functionality to load statutory rate tables from YAML
//! files. Each jurisdiction directory holds its metadata plus one rate table
//! per effective date, so a change of year or jurisdiction never touches the
//! calculation code.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/cm_general").unwrap();
//! println!("Loaded jurisdiction: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BroadcastLevyRates, IncomeTaxRates, JurisdictionConfig, JurisdictionMetadata, LevyStep,
    LocalDevelopmentTaxRates, OvertimeRates, OvertimeTier, PercentageLevy, RateTable,
    SocialSecurityRates, TaxBracket,
};
