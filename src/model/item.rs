//! An agricultural input held in stock (seed, fertilizer, herbicide).
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](keyed_actor::ActorEntity) trait, so every item
//! lives behind its own actor managed by a [`ResourceActor`](keyed_actor::ResourceActor).
//!
//! See [`impl ActorEntity for InventoryItem`](#impl-ActorEntity-for-InventoryItem) for:
//! - Creation parameters ([`NewItem`])
//! - Update parameters ([`ItemUpdate`])
//! - Stock movements ([`StockAction`](crate::item_actor::StockAction))

use crate::item_actor::InventoryError;
use crate::model::status::{classify, StockStatus};
use chrono::{DateTime, Utc};
use keyed_actor::AuditStamp;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted item name, in characters.
pub const MAX_NAME_LEN: usize = 60;
/// Longest accepted unit of measure, in characters.
pub const MAX_UNIT_LEN: usize = 10;
/// Fractional digits kept for quantities and prices.
pub const DECIMAL_PLACES: u32 = 2;

/// The immutable identity of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCode(pub u64);

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemCode {
    fn from(raw: u64) -> Self {
        ItemCode(raw)
    }
}

impl From<ItemCode> for u64 {
    fn from(code: ItemCode) -> Self {
        code.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub code: ItemCode,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub min_level: Decimal,
    #[serde(flatten)]
    pub(crate) stamp: AuditStamp,
}

impl InventoryItem {
    /// Builds a validated item from creation parameters.
    ///
    /// Text is trimmed and decimals are rounded to two places before checking.
    pub fn new(code: ItemCode, params: NewItem, stamp: AuditStamp) -> Result<Self, InventoryError> {
        Ok(Self {
            code,
            name: text_field("name", &params.name, MAX_NAME_LEN)?,
            quantity: non_negative("quantity", params.quantity)?,
            unit: text_field("unit", &params.unit, MAX_UNIT_LEN)?,
            unit_price: non_negative("unit_price", params.unit_price)?,
            min_level: non_negative("min_level", params.min_level)?,
            stamp,
        })
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.stamp.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.stamp.updated_at()
    }

    pub fn status(&self) -> StockStatus {
        classify(self.quantity, self.min_level)
    }

    /// `quantity × unit_price`, saturating at [`Decimal::MAX`].
    pub fn total_value(&self) -> Decimal {
        self.quantity
            .checked_mul(self.unit_price)
            .map_or(Decimal::MAX, normalize)
    }

    /// Whether the item sits at or below its minimum level.
    pub fn is_critical(&self) -> bool {
        self.quantity <= self.min_level
    }

    /// Adds a receipt to the quantity on hand and returns the new quantity.
    pub fn receive(&mut self, amount: Decimal) -> Result<Decimal, InventoryError> {
        let amount = positive_amount(amount)?;
        let quantity = self
            .quantity
            .checked_add(amount)
            .ok_or_else(|| InventoryError::invalid("quantity out of range"))?;
        self.quantity = normalize(quantity);
        Ok(self.quantity)
    }

    /// Takes a withdrawal from the quantity on hand and returns the new quantity.
    ///
    /// Fails without touching the quantity when `amount` exceeds it.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Decimal, InventoryError> {
        let amount = positive_amount(amount)?;
        if amount > self.quantity {
            return Err(InventoryError::InsufficientStock {
                code: self.code,
                requested: amount,
                available: self.quantity,
            });
        }
        self.quantity = normalize(self.quantity - amount);
        Ok(self.quantity)
    }

    /// Applies a field edit. All fields are checked before any is changed.
    pub fn apply(&mut self, update: ItemUpdate) -> Result<(), InventoryError> {
        if update.is_empty() {
            return Err(InventoryError::invalid("update changes nothing"));
        }
        let name = update
            .name
            .map(|name| text_field("name", &name, MAX_NAME_LEN))
            .transpose()?;
        let unit = update
            .unit
            .map(|unit| text_field("unit", &unit, MAX_UNIT_LEN))
            .transpose()?;
        let unit_price = update
            .unit_price
            .map(|price| non_negative("unit_price", price))
            .transpose()?;
        let min_level = update
            .min_level
            .map(|level| non_negative("min_level", level))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(unit) = unit {
            self.unit = unit;
        }
        if let Some(unit_price) = unit_price {
            self.unit_price = unit_price;
        }
        if let Some(min_level) = min_level {
            self.min_level = min_level;
        }
        Ok(())
    }
}

/// Parameters for a new item. Leave `code` empty to have one assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(default)]
    pub code: Option<ItemCode>,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub min_level: Decimal,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
        min_level: Decimal,
    ) -> Self {
        Self {
            code: None,
            name: name.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            min_level,
        }
    }

    /// Requests a specific code instead of the next one.
    pub fn with_code(mut self, code: ItemCode) -> Self {
        self.code = Some(code);
        self
    }
}

/// Field edits for an existing item. `None` keeps the current value.
///
/// The quantity is not editable here; it only moves through receipts and withdrawals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub min_level: Option<Decimal>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.unit.is_none()
            && self.unit_price.is_none()
            && self.min_level.is_none()
    }
}

/// Rounds to two fractional digits, half away from zero.
pub fn normalize(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DECIMAL_PLACES);
    rounded
}

fn text_field(field: &str, value: &str, max_len: usize) -> Result<String, InventoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::invalid(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(InventoryError::invalid(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn non_negative(field: &str, value: Decimal) -> Result<Decimal, InventoryError> {
    let value = normalize(value);
    if value < Decimal::ZERO {
        return Err(InventoryError::invalid(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(value)
}

fn positive_amount(amount: Decimal) -> Result<Decimal, InventoryError> {
    let amount = normalize(amount);
    if amount <= Decimal::ZERO {
        return Err(InventoryError::invalid(format!(
            "amount must be greater than zero, got {amount}"
        )));
    }
    Ok(amount)
}
