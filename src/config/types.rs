//! Rate table types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML rate table files. Every statutory constant the
//! engine uses lives here; the calculation code never hard-codes a rate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Metadata about the jurisdiction a set of rate tables belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionMetadata {
    /// Short code of the jurisdiction configuration (e.g., "cm_general").
    pub code: String,
    /// The human-readable name of the jurisdiction.
    pub name: String,
    /// ISO 4217 code of the payroll currency.
    pub currency: String,
    /// Number of decimal places shown on payslips for this currency.
    pub currency_scale: u32,
    /// Where the rates were taken from.
    pub source: String,
}

/// Social-security contribution: a capped percentage of base salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityRates {
    /// Contribution rate (e.g., 0.042 for 4.2%).
    pub rate: Decimal,
    /// Monthly salary ceiling above which no contribution is due.
    pub cap: Decimal,
}

/// One marginal income-tax bracket.
///
/// A bracket covers the slice of monthly net categorial salary between the
/// previous bracket's `up_to` (or zero) and its own `up_to`. The last bracket
/// has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of the bracket, or `None` for the top bracket.
    pub up_to: Option<Decimal>,
    /// Marginal rate applied to the slice inside this bracket.
    pub rate: Decimal,
}

/// Progressive income tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxRates {
    /// Flat share of annual gross allowed as professional expenses.
    pub professional_expense_rate: Decimal,
    /// Flat annual abatement subtracted from the annual taxable base.
    pub annual_abatement: Decimal,
    /// Strictly increasing marginal brackets on monthly NCS.
    pub brackets: Vec<TaxBracket>,
}

/// A levy expressed as a single percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageLevy {
    /// The levy rate (e.g., 0.10 for 10%).
    pub rate: Decimal,
}

/// Broadcast levy: a flat amount charged above a base-salary floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastLevyRates {
    /// The levy is waived when base salary does not exceed this floor.
    pub floor: Decimal,
    /// The flat monthly amount.
    pub amount: Decimal,
}

/// One step of a bracketed flat-amount table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyStep {
    /// Inclusive upper bound of base salary for this step, `None` for the last.
    pub up_to: Option<Decimal>,
    /// The flat amount due for salaries in this step.
    pub amount: Decimal,
}

/// Local development tax: a step table keyed by base salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDevelopmentTaxRates {
    /// Whether the tax applies in this jurisdiction configuration.
    pub enabled: bool,
    /// Base-salary steps, only consulted when `enabled` is true.
    #[serde(default)]
    pub steps: Vec<LevyStep>,
}

/// One tier of regular overtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeTier {
    /// Number of hours paid in this tier, `None` for the open-ended last tier.
    pub hours: Option<Decimal>,
    /// Multiplier applied to the hourly rate.
    pub multiplier: Decimal,
}

/// Overtime multipliers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeRates {
    /// Consecutive tiers for regular excess hours.
    pub regular_tiers: Vec<OvertimeTier>,
    /// Multiplier for every rest-day hour.
    pub rest_day_multiplier: Decimal,
    /// Multiplier for every night hour.
    pub night_multiplier: Decimal,
}

/// The complete set of statutory constants effective from a given date.
///
/// A rate table is read-only once loaded and may be shared between any
/// number of concurrent computations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// The first date on which these rates apply.
    pub effective_date: NaiveDate,
    /// Social-security contribution.
    pub social_security: SocialSecurityRates,
    /// Progressive income tax.
    pub income_tax: IncomeTaxRates,
    /// Communal surcharge, as a share of income tax.
    pub communal_tax: PercentageLevy,
    /// Housing-fund levy, as a share of base salary.
    pub housing_fund: PercentageLevy,
    /// Flat broadcast levy.
    pub broadcast_levy: BroadcastLevyRates,
    /// Bracketed local development tax.
    pub local_development_tax: LocalDevelopmentTaxRates,
    /// Overtime multipliers.
    pub overtime: OvertimeRates,
}

impl RateTable {
    /// Checks that the table is complete and internally consistent.
    ///
    /// Every rate must lie in `[0, 1]`, every flat amount must be
    /// non-negative, and every bounded table (tax brackets, local development
    /// steps, overtime tiers) must be strictly increasing and end with an
    /// unbounded entry so that any input is covered.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRateTable`] describing the first problem found.
    pub fn validate(&self) -> EngineResult<()> {
        check_rate("social_security.rate", self.social_security.rate)?;
        check_non_negative("social_security.cap", self.social_security.cap)?;

        let income_tax = &self.income_tax;
        check_rate(
            "income_tax.professional_expense_rate",
            income_tax.professional_expense_rate,
        )?;
        check_non_negative("income_tax.annual_abatement", income_tax.annual_abatement)?;
        check_bounds(
            "income_tax.brackets",
            income_tax.brackets.iter().map(|b| b.up_to),
        )?;
        for (index, bracket) in income_tax.brackets.iter().enumerate() {
            check_rate(&format!("income_tax.brackets[{}].rate", index), bracket.rate)?;
        }

        check_rate("communal_tax.rate", self.communal_tax.rate)?;
        check_rate("housing_fund.rate", self.housing_fund.rate)?;
        check_non_negative("broadcast_levy.floor", self.broadcast_levy.floor)?;
        check_non_negative("broadcast_levy.amount", self.broadcast_levy.amount)?;

        let ldt = &self.local_development_tax;
        if ldt.enabled {
            check_bounds(
                "local_development_tax.steps",
                ldt.steps.iter().map(|s| s.up_to),
            )?;
            for (index, step) in ldt.steps.iter().enumerate() {
                check_non_negative(
                    &format!("local_development_tax.steps[{}].amount", index),
                    step.amount,
                )?;
            }
        }

        let overtime = &self.overtime;
        if overtime.regular_tiers.is_empty() {
            return Err(EngineError::invalid_table(
                "overtime.regular_tiers must not be empty",
            ));
        }
        let last = overtime.regular_tiers.len() - 1;
        for (index, tier) in overtime.regular_tiers.iter().enumerate() {
            match tier.hours {
                Some(hours) if index == last => {
                    return Err(EngineError::invalid_table(format!(
                        "overtime.regular_tiers must end with an open-ended tier, last tier caps at {}",
                        hours
                    )));
                }
                Some(hours) if hours <= Decimal::ZERO => {
                    return Err(EngineError::invalid_table(format!(
                        "overtime.regular_tiers[{}].hours must be positive",
                        index
                    )));
                }
                None if index != last => {
                    return Err(EngineError::invalid_table(format!(
                        "overtime.regular_tiers[{}] is open-ended but is not the last tier",
                        index
                    )));
                }
                _ => {}
            }
            check_non_negative(
                &format!("overtime.regular_tiers[{}].multiplier", index),
                tier.multiplier,
            )?;
        }
        check_non_negative("overtime.rest_day_multiplier", overtime.rest_day_multiplier)?;
        check_non_negative("overtime.night_multiplier", overtime.night_multiplier)?;

        Ok(())
    }
}

fn check_rate(name: &str, rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::invalid_table(format!(
            "{} must be between 0 and 1, got {}",
            name, rate
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_table(format!(
            "{} must not be negative, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Bounds must be positive, strictly increasing, and only the last one open.
fn check_bounds(name: &str, bounds: impl Iterator<Item = Option<Decimal>>) -> EngineResult<()> {
    let bounds: Vec<Option<Decimal>> = bounds.collect();
    if bounds.is_empty() {
        return Err(EngineError::invalid_table(format!("{} must not be empty", name)));
    }

    let mut previous = Decimal::ZERO;
    for (index, bound) in bounds.iter().enumerate() {
        let is_last = index == bounds.len() - 1;
        match bound {
            Some(up_to) => {
                if is_last {
                    return Err(EngineError::invalid_table(format!(
                        "{} must end with an unbounded entry, last entry stops at {}",
                        name, up_to
                    )));
                }
                if *up_to <= previous {
                    return Err(EngineError::invalid_table(format!(
                        "{}[{}] upper bound {} is not above {}",
                        name, index, up_to, previous
                    )));
                }
                previous = *up_to;
            }
            None if !is_last => {
                return Err(EngineError::invalid_table(format!(
                    "{}[{}] is unbounded but is not the last entry",
                    name, index
                )));
            }
            None => {}
        }
    }

    Ok(())
}

/// All configuration loaded for one jurisdiction.
///
/// Rate tables are kept sorted by effective date, oldest first.
#[derive(Debug, Clone)]
pub struct JurisdictionConfig {
    metadata: JurisdictionMetadata,
    rate_tables: Vec<RateTable>,
}

impl JurisdictionConfig {
    /// Creates a new configuration, sorting rate tables by effective date.
    pub fn new(metadata: JurisdictionMetadata, rate_tables: Vec<RateTable>) -> Self {
        let mut sorted = rate_tables;
        sorted.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            rate_tables: sorted,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn metadata(&self) -> &JurisdictionMetadata {
        &self.metadata
    }

    /// Returns all rate table versions, oldest first.
    pub fn rate_tables(&self) -> &[RateTable] {
        &self.rate_tables
    }

    /// Returns the most recent rate table effective on or before `date`.
    pub fn rate_table_for(&self, date: NaiveDate) -> EngineResult<&RateTable> {
        self.rate_tables
            .iter()
            .rfind(|table| table.effective_date <= date)
            .ok_or(EngineError::RateTableNotFound { date })
    }
}
