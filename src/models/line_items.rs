//! Typed shapes for the JSON-valued columns.
//!
//! The remote store keeps these as `jsonb` and accepts anything, so the shape
//! is checked here before a write goes out. Reads are tolerant: a stored
//! value of another shape is kept as raw JSON in a [`JsonColumn`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidationError;

/// Part name to quantity, or part name to unit price.
pub type PartAmounts = BTreeMap<String, f64>;

/// A `jsonb` column as read back from the store.
///
/// Values that match the expected shape decode as `Typed`; anything else is
/// kept verbatim as `Raw` and serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonColumn<T> {
    Typed(T),
    Raw(Value),
}

impl<T> JsonColumn<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            JsonColumn::Typed(value) => Some(value),
            JsonColumn::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, JsonColumn::Raw(_))
    }
}

impl<T> From<T> for JsonColumn<T> {
    fn from(value: T) -> Self {
        JsonColumn::Typed(value)
    }
}

/// One entry of an estimate's line-item group (roof kit, glue, labor, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineItem {
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    pub fn total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn check_amount(what: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            "amount",
            format!("{} must be a finite, non-negative number (got {})", what, value),
        ));
    }
    Ok(())
}

/// Validates a scalar money or quantity column.
pub fn validate_amount<T: std::borrow::Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    check_amount("Amount", *value.borrow())
}

/// Validates a `parts` or `prices` mapping.
pub fn validate_part_amounts(amounts: &PartAmounts) -> Result<(), ValidationError> {
    for (name, value) in amounts {
        if name.trim().is_empty() {
            return Err(invalid("part_name", "Part name must not be empty".into()));
        }
        check_amount(&format!("Amount for '{}'", name), *value)?;
    }
    Ok(())
}

/// Validates a line-item group.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), ValidationError> {
    for (idx, item) in items.iter().enumerate() {
        if item.description.trim().is_empty() {
            return Err(invalid(
                "description",
                format!("Line item {} has an empty description", idx),
            ));
        }
        check_amount(&format!("Quantity of '{}'", item.description), item.quantity)?;
        check_amount(&format!("Unit price of '{}'", item.description), item.unit_price)?;
    }
    Ok(())
}

/// Sum of quantity times unit price for every part that has a price.
///
/// Parts without a price contribute nothing.
pub fn parts_cost(parts: &PartAmounts, prices: &PartAmounts) -> f64 {
    parts
        .iter()
        .filter_map(|(name, qty)| prices.get(name).map(|price| qty * price))
        .sum()
}
