//! Overtime pay calculation.
//!
//! ## Rate Structure
//!
//! Regular excess hours are paid in consecutive tiers taken from the rate
//! table (by default the first 8 hours at 120%, the next 8 at 130% and the
//! remainder at 140%). Rest-day hours and night hours each carry a single
//! multiplier of their own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::OvertimeRates;
use crate::error::{EngineError, EngineResult};
use crate::models::OvertimeHours;

/// The category an overtime line was paid under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeCategory {
    /// Ordinary excess hours, paid by tier.
    Regular,
    /// Rest-day hours.
    RestDay,
    /// Night hours.
    Night,
}

/// One priced block of overtime hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeLine {
    /// The overtime category.
    pub category: OvertimeCategory,
    /// Hours paid in this block.
    pub hours: Decimal,
    /// Multiplier applied to the hourly rate.
    pub multiplier: Decimal,
    /// `hours × hourly_rate × multiplier`.
    pub amount: Decimal,
}

/// The result of pricing a period's overtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeResult {
    /// Priced blocks, regular tiers first, then rest day, then night.
    pub lines: Vec<OvertimeLine>,
    /// Sum of all line amounts.
    pub total: Decimal,
}

/// Prices overtime hours at the tiered multipliers of the rate table.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if any hour count or the hourly rate is negative.
///   Negative hours are rejected, never clamped.
/// - [`EngineError::InvalidRateTable`] if the regular tiers run out before all
///   regular hours are priced.
/// - [`EngineError::InvalidInput`] if a priced amount does not fit in a [`Decimal`].
///
/// # Examples
///
/// ```no_run
/// use payroll_engine::calculation::calculate_overtime_pay;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::OvertimeHours;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/cm_general").unwrap();
/// let table = loader
///     .rate_table_for(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
///     .unwrap();
///
/// let hours = OvertimeHours {
///     regular: Decimal::from(20),
///     ..OvertimeHours::default()
/// };
/// let result = calculate_overtime_pay(Decimal::from(1_000), &hours, &table.overtime).unwrap();
///
/// // 8 × 1.2 + 8 × 1.3 + 4 × 1.4 hours at 1,000
/// assert_eq!(result.total, Decimal::from(25_600));
/// ```
pub fn calculate_overtime_pay(
    hourly_rate: Decimal,
    hours: &OvertimeHours,
    rates: &OvertimeRates,
) -> EngineResult<OvertimeResult> {
    if hourly_rate < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "hourly_rate",
            format!("must not be negative, got {}", hourly_rate),
        ));
    }
    check_hours("overtime_hours.regular", hours.regular)?;
    check_hours("overtime_hours.rest_day", hours.rest_day)?;
    check_hours("overtime_hours.night", hours.night)?;

    let mut lines = Vec::new();

    let mut remaining = hours.regular;
    for tier in &rates.regular_tiers {
        if remaining <= Decimal::ZERO {
            break;
        }
        let tier_hours = match tier.hours {
            Some(cap) => remaining.min(cap),
            None => remaining,
        };
        lines.push(price(
            OvertimeCategory::Regular,
            tier_hours,
            tier.multiplier,
            hourly_rate,
        )?);
        remaining -= tier_hours;
    }

    if remaining > Decimal::ZERO {
        return Err(EngineError::invalid_table(format!(
            "overtime tiers leave {} regular hours unpriced",
            remaining.normalize()
        )));
    }

    if hours.rest_day > Decimal::ZERO {
        lines.push(price(
            OvertimeCategory::RestDay,
            hours.rest_day,
            rates.rest_day_multiplier,
            hourly_rate,
        )?);
    }

    if hours.night > Decimal::ZERO {
        lines.push(price(
            OvertimeCategory::Night,
            hours.night,
            rates.night_multiplier,
            hourly_rate,
        )?);
    }

    let total = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.amount))
        .ok_or_else(|| EngineError::invalid_input("overtime_hours", "overtime pay is out of range"))?;

    Ok(OvertimeResult { lines, total })
}

fn check_hours(field: &str, hours: Decimal) -> EngineResult<()> {
    if hours < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {}", hours),
        ));
    }
    Ok(())
}

fn price(
    category: OvertimeCategory,
    hours: Decimal,
    multiplier: Decimal,
    hourly_rate: Decimal,
) -> EngineResult<OvertimeLine> {
    let amount = hours
        .checked_mul(hourly_rate)
        .and_then(|v| v.checked_mul(multiplier))
        .ok_or_else(|| EngineError::invalid_input("overtime_hours", "overtime pay is out of range"))?;

    Ok(OvertimeLine {
        category,
        hours,
        multiplier,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OvertimeTier;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn standard_rates() -> OvertimeRates {
        OvertimeRates {
            regular_tiers: vec![
                OvertimeTier {
                    hours: Some(dec("8")),
                    multiplier: dec("1.2"),
                },
                OvertimeTier {
                    hours: Some(dec("8")),
                    multiplier: dec("1.3"),
                },
                OvertimeTier {
                    hours: None,
                    multiplier: dec("1.4"),
                },
            ],
            rest_day_multiplier: dec("1.4"),
            night_multiplier: dec("1.5"),
        }
    }

    fn regular(hours: &str) -> OvertimeHours {
        OvertimeHours {
            regular: dec(hours),
            ..OvertimeHours::default()
        }
    }

    #[test]
    fn test_twenty_regular_hours_span_three_tiers() {
        let result = calculate_overtime_pay(dec("1000"), &regular("20"), &standard_rates()).unwrap();

        assert_eq!(result.lines.len(), 3);
        assert_eq!(result.lines[0].amount, dec("9600"));
        assert_eq!(result.lines[1].amount, dec("10400"));
        assert_eq!(result.lines[2].amount, dec("5600"));
        assert_eq!(result.total, dec("25600"));
    }

    #[test]
    fn test_hours_within_first_tier() {
        let result = calculate_overtime_pay(dec("1000"), &regular("5"), &standard_rates()).unwrap();

        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].multiplier, dec("1.2"));
        assert_eq!(result.total, dec("6000"));
    }

    #[test]
    fn test_exactly_first_tier_boundary() {
        let result = calculate_overtime_pay(dec("1000"), &regular("8"), &standard_rates()).unwrap();

        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.total, dec("9600"));
    }

    #[test]
    fn test_fractional_hours_into_second_tier() {
        let result = calculate_overtime_pay(dec("1000"), &regular("9.5"), &standard_rates()).unwrap();

        // 8 × 1200 + 1.5 × 1300
        assert_eq!(result.total, dec("11550"));
    }

    #[test]
    fn test_rest_day_and_night_hours() {
        let hours = OvertimeHours {
            regular: Decimal::ZERO,
            rest_day: dec("4"),
            night: dec("2"),
        };
        let result = calculate_overtime_pay(dec("1000"), &hours, &standard_rates()).unwrap();

        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].category, OvertimeCategory::RestDay);
        assert_eq!(result.lines[0].amount, dec("5600"));
        assert_eq!(result.lines[1].category, OvertimeCategory::Night);
        assert_eq!(result.lines[1].amount, dec("3000"));
        assert_eq!(result.total, dec("8600"));
    }

    #[test]
    fn test_no_overtime_yields_zero() {
        let result =
            calculate_overtime_pay(dec("1000"), &OvertimeHours::default(), &standard_rates())
                .unwrap();
        assert!(result.lines.is_empty());
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn test_negative_regular_hours_are_rejected() {
        let result = calculate_overtime_pay(dec("1000"), &regular("-1"), &standard_rates());
        match result {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "overtime_hours.regular");
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_negative_night_hours_are_rejected() {
        let hours = OvertimeHours {
            night: dec("-0.5"),
            ..OvertimeHours::default()
        };
        let result = calculate_overtime_pay(dec("1000"), &hours, &standard_rates());
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_out_of_range_pay_is_an_error() {
        let mut rates = standard_rates();
        rates.night_multiplier = dec("10000000000000");
        let hours = OvertimeHours {
            night: dec("744"),
            ..OvertimeHours::default()
        };

        let result = calculate_overtime_pay(dec("1000000000000000"), &hours, &rates);
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "overtime_hours"),
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_bounded_last_tier_is_a_configuration_error() {
        let mut rates = standard_rates();
        rates.regular_tiers.truncate(2);

        let result = calculate_overtime_pay(dec("1000"), &regular("20"), &rates);
        assert!(matches!(result, Err(EngineError::InvalidRateTable { .. })));

        // Hours that fit inside the bounded tiers still price fine
        let result = calculate_overtime_pay(dec("1000"), &regular("16"), &rates).unwrap();
        assert_eq!(result.total, dec("20000"));
    }
}
