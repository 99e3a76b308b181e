//! # Reporting View
//!
//! Read-only projections of the ledger. Nothing here takes part in locking: a report is built
//! from committed rows and derives `total_value` and [`StockStatus`] on the fly.

use crate::model::{InventoryItem, ItemCode, StockStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

const HEADERS: [&str; 8] = [
    "Code",
    "Name",
    "Quantity",
    "Unit",
    "Unit Price",
    "Min Level",
    "Total Value",
    "Status",
];

/// One item as it appears in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReportRow {
    pub code: ItemCode,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub min_level: Decimal,
    pub total_value: Decimal,
    pub status: StockStatus,
}

impl From<&InventoryItem> for StockReportRow {
    fn from(item: &InventoryItem) -> Self {
        Self {
            code: item.code,
            name: item.name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            unit_price: item.unit_price,
            min_level: item.min_level,
            total_value: item.total_value(),
            status: item.status(),
        }
    }
}

impl StockReportRow {
    fn cells(&self) -> [String; 8] {
        [
            self.code.to_string(),
            self.name.clone(),
            format!("{:.2}", self.quantity),
            self.unit.clone(),
            format!("{:.2}", self.unit_price),
            format!("{:.2}", self.min_level),
            format!("{:.2}", self.total_value),
            self.status.to_string(),
        ]
    }
}

/// A snapshot of every item at `generated_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<StockReportRow>,
    pub total_value: Decimal,
}

impl StockReport {
    pub fn build(items: impl IntoIterator<Item = InventoryItem>, generated_at: DateTime<Utc>) -> Self {
        let mut items: Vec<_> = items.into_iter().collect();
        sort_items(&mut items);
        let rows: Vec<StockReportRow> = items.iter().map(StockReportRow::from).collect();
        let total_value = rows
            .iter()
            .try_fold(Decimal::ZERO, |sum, row| sum.checked_add(row.total_value))
            .unwrap_or(Decimal::MAX);
        Self {
            generated_at,
            rows,
            total_value,
        }
    }

    /// Rows at or below their minimum level.
    pub fn critical(&self) -> impl Iterator<Item = &StockReportRow> {
        self.rows
            .iter()
            .filter(|row| row.status == StockStatus::Critical)
    }

    /// The printable report: header line, table and grand total.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Report generated at: {}\n\n",
            self.generated_at.format("%d/%m/%Y %H:%M:%S")
        );
        out.push_str(&render_table(&self.rows));
        if !self.rows.is_empty() {
            out.push_str(&format!("\nTotal value: {:.2}", self.total_value));
        }
        out
    }

    /// File name for this report, stamped with its generation time.
    pub fn file_name(&self) -> String {
        format!(
            "stock_report_{}.txt",
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Writes the rendered report into `dir` and returns the file's path.
    ///
    /// The file appears complete or not at all. A report saved twice within the same second
    /// replaces the earlier file.
    pub async fn save(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        crate::storage::replace_file(&path, self.render().as_bytes()).await?;
        info!(path = %path.display(), rows = self.rows.len(), "Report saved");
        Ok(path)
    }
}

/// Orders items by name, then by code.
pub fn sort_items(items: &mut [InventoryItem]) {
    items.sort_by(|a, b| a.name.cmp(&b.name).then(a.code.cmp(&b.code)));
}

/// Renders rows as an aligned ASCII table.
///
/// ```text
/// +------+-----------------+
/// | Code | Name            |
/// +------+-----------------+
/// | 1    | Semente de Soja |
/// +------+-----------------+
/// ```
pub fn render_table(rows: &[StockReportRow]) -> String {
    if rows.is_empty() {
        return "No items found.".to_string();
    }

    let cells: Vec<[String; 8]> = rows.iter().map(StockReportRow::cells).collect();
    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut table = vec![separator.clone()];
    table.push(table_line(HEADERS.iter().copied(), &widths));
    table.push(separator.clone());
    for row in &cells {
        table.push(table_line(row.iter().map(String::as_str), &widths));
    }
    table.push(separator);
    table.join("\n")
}

fn table_line<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = values
        .zip(widths)
        .map(|(value, &width)| format!(" {value:<width$} "))
        .collect();
    format!("|{}|", padded.join("|"))
}
