//! Compensation normalization.
//!
//! Bonus and allowance data arrives from forms and older stored records in
//! several shapes: explicit lists whose entries name their amount `amount`,
//! `montant`, `value` or `total`, or a handful of fixed legacy fields. This
//! module is the only place those shapes are recognised; everything past it
//! works with canonical [`CompensationLine`]s.
//!
//! Normalization is lenient: a missing, negative or unparsable amount becomes
//! zero rather than an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::models::CompensationLine;

/// Keys that may carry an entry's amount, in lookup order.
pub const AMOUNT_KEYS: [&str; 4] = ["amount", "montant", "value", "total"];

/// Keys that may carry an entry's label, in lookup order.
pub const LABEL_KEYS: [&str; 3] = ["label", "libelle", "name"];

/// Legacy fixed-name compensation fields.
///
/// Older records store each bonus or allowance in its own field instead of a
/// list. Values are kept as raw JSON and parsed leniently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyCompensationFields {
    /// Performance bonus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_bonus: Option<Value>,
    /// Transport bonus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_bonus: Option<Value>,
    /// Overtime stored as a precomputed display amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime_amount: Option<Value>,
    /// Housing allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing_allowance: Option<Value>,
    /// Representation allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representation_allowance: Option<Value>,
    /// Meal allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_allowance: Option<Value>,
    /// Uncategorised non-taxable allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_taxable_allowance: Option<Value>,
}

impl LegacyCompensationFields {
    fn bonus_fields(&self) -> [(&'static str, Option<&Value>); 3] {
        [
            ("Performance bonus", self.performance_bonus.as_ref()),
            ("Transport bonus", self.transport_bonus.as_ref()),
            ("Overtime", self.overtime_amount.as_ref()),
        ]
    }

    fn allowance_fields(&self) -> [(&'static str, Option<&Value>); 4] {
        [
            ("Housing allowance", self.housing_allowance.as_ref()),
            ("Representation allowance", self.representation_allowance.as_ref()),
            ("Meal allowance", self.meal_allowance.as_ref()),
            ("Non-taxable allowance", self.non_taxable_allowance.as_ref()),
        ]
    }
}

/// A loosely-structured compensation record as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCompensation {
    /// Explicit bonus entries, in any supported shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonuses: Option<Vec<Value>>,
    /// Explicit allowance entries, in any supported shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowances: Option<Vec<Value>>,
    /// Legacy fixed fields, consulted only when the matching list is absent or empty.
    #[serde(flatten)]
    pub legacy: LegacyCompensationFields,
}

/// The two canonical sequences produced by [`normalize_compensation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCompensation {
    /// Canonical bonus lines.
    pub bonuses: Vec<CompensationLine>,
    /// Canonical allowance lines.
    pub allowances: Vec<CompensationLine>,
}

/// Canonicalizes bonuses and allowances.
///
/// For each of the two sequences independently: a non-empty explicit list is
/// used as-is (each entry's amount parsed leniently); otherwise the legacy
/// fields are mapped one-to-one into lines, skipping any that are not strictly
/// positive.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{normalize_compensation, RawCompensation};
/// use rust_decimal::Decimal;
///
/// let raw: RawCompensation = serde_json::from_value(serde_json::json!({
///     "bonuses": [{ "label": "Performance", "montant": "33000" }],
///     "housing_allowance": 20000,
///     "meal_allowance": 0
/// }))
/// .unwrap();
///
/// let normalized = normalize_compensation(&raw);
/// assert_eq!(normalized.bonuses[0].amount, Decimal::from(33_000));
/// assert_eq!(normalized.allowances.len(), 1);
/// assert_eq!(normalized.allowances[0].label, "Housing allowance");
/// ```
pub fn normalize_compensation(raw: &RawCompensation) -> NormalizedCompensation {
    let bonuses = match raw.bonuses.as_deref() {
        Some(entries) if !entries.is_empty() => normalize_lines(entries, "Bonus"),
        _ => legacy_lines(&raw.legacy.bonus_fields()),
    };

    let allowances = match raw.allowances.as_deref() {
        Some(entries) if !entries.is_empty() => normalize_lines(entries, "Allowance"),
        _ => legacy_lines(&raw.legacy.allowance_fields()),
    };

    NormalizedCompensation {
        bonuses,
        allowances,
    }
}

/// Converts explicit list entries into canonical lines, preserving order.
///
/// Entries may be objects carrying one of [`LABEL_KEYS`] and one of
/// [`AMOUNT_KEYS`], or bare amounts. Entries without a label are named
/// `"{default_label} {position}"`.
pub fn normalize_lines(entries: &[Value], default_label: &str) -> Vec<CompensationLine> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let label = entry_label(entry)
                .unwrap_or_else(|| format!("{} {}", default_label, index + 1));
            CompensationLine::new(label, entry_amount(entry))
        })
        .collect()
}

fn legacy_lines(fields: &[(&'static str, Option<&Value>)]) -> Vec<CompensationLine> {
    fields
        .iter()
        .filter_map(|(label, value)| {
            let amount = parse_amount((*value)?);
            (amount > Decimal::ZERO).then(|| CompensationLine::new(*label, amount))
        })
        .collect()
}

fn entry_label(entry: &Value) -> Option<String> {
    let object = entry.as_object()?;
    LABEL_KEYS
        .iter()
        .filter_map(|key| object.get(*key)?.as_str())
        .map(str::trim)
        .find(|label| !label.is_empty())
        .map(str::to_string)
}

fn entry_amount(entry: &Value) -> Decimal {
    match entry {
        Value::Object(object) => AMOUNT_KEYS
            .iter()
            .filter_map(|key| object.get(*key))
            .find(|value| !value.is_null())
            .map(parse_amount)
            .unwrap_or(Decimal::ZERO),
        other => parse_amount(other),
    }
}

/// Parses a monetary amount leniently.
///
/// Numbers and numeric strings are accepted. Strings may group thousands with
/// spaces or commas (`10,000`), and a comma that does not group thousands is a
/// decimal separator (`2500,50`). Anything else,
/// and any negative amount, yields zero.
pub fn parse_amount(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(&clean_amount_text(text)),
        _ => None,
    };

    match parsed {
        Some(amount) if amount > Decimal::ZERO => amount,
        _ => Decimal::ZERO,
    }
}

fn clean_amount_text(text: &str) -> String {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    match (compact.rfind(','), compact.rfind('.')) {
        // "1.234,50": dots group thousands, the comma is decimal
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), None) if is_thousands_grouped(&compact) => compact.replace(',', ""),
        (Some(_), None) => compact.replace(',', "."),
        _ => compact.replace(',', ""),
    }
}

/// True for `1,234` or `-12,345,678`: a lead group of 1 to 3 digits then
/// comma-separated groups of exactly 3.
fn is_thousands_grouped(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let mut groups = digits.split(',');
    let lead_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
    lead_ok && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
