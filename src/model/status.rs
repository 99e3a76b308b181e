//! Derived stock status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How close an item is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockStatus {
    /// At or below the minimum level.
    Critical,
    /// Above the minimum, but within half of it again.
    Alert,
    Normal,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Critical => "CRITICAL",
            StockStatus::Alert => "ALERT",
            StockStatus::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a quantity against its minimum level.
///
/// With `min_level = 0` the alert band is empty and only an empty item is critical.
/// When `min_level × 1.5` is beyond the decimal range, every quantity above the minimum
/// is an alert.
pub fn classify(quantity: Decimal, min_level: Decimal) -> StockStatus {
    if quantity <= min_level {
        return StockStatus::Critical;
    }
    match min_level.checked_mul(Decimal::new(15, 1)) {
        Some(alert_ceiling) if quantity > alert_ceiling => StockStatus::Normal,
        _ => StockStatus::Alert,
    }
}
