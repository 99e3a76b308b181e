//! # AgroStock demo
//!
//! Runs the soybean-seed scenario against a ledger built from [`Config`]:
//! 1.  Stock three inputs.
//! 2.  Withdraw seed until it crosses the alert and critical thresholds.
//! 3.  Try to oversell and show that nothing changes.
//! 4.  Print the stock report and the critical list.
//!
//! Set `AGROSTOCK_DATA_FILE` to keep the stock between runs and `AGROSTOCK_REPORT_DIR` to
//! save a copy of the report.

use agrostock::config::Config;
use agrostock::lifecycle::{setup_tracing, InventorySystem};
use agrostock::model::NewItem;
use agrostock::report::{render_table, StockReportRow};
use rust_decimal::Decimal;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    setup_tracing(&config.log_level);

    info!(?config, "Starting AgroStock");
    let system = InventorySystem::from_config(&config).await?;
    let client = system.inventory_client.clone();

    let span = tracing::info_span!("stocking");
    let seed = async {
        let seed = client
            .create_item(NewItem::new(
                "Semente de Soja",
                Decimal::new(1000, 0),
                "kg",
                Decimal::new(1250, 2),
                Decimal::new(200, 0),
            ))
            .await?;
        client
            .create_item(NewItem::new(
                "Glifosato",
                Decimal::new(300, 0),
                "L",
                Decimal::new(2790, 2),
                Decimal::new(50, 0),
            ))
            .await?;
        client
            .create_item(NewItem::new(
                "Ureia",
                Decimal::new(40, 0),
                "saca",
                Decimal::new(18900, 2),
                Decimal::new(40, 0),
            ))
            .await?;
        Ok::<_, agrostock::item_actor::InventoryError>(seed)
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("planting");
    async {
        for amount in [Decimal::new(850, 0), Decimal::new(100, 0)] {
            let level = client.withdraw(seed, amount).await?;
            info!(code = %seed, quantity = %level.quantity, status = %level.status, "Withdrawn");
        }
        if let Err(e) = client.withdraw(seed, Decimal::new(10000, 0)).await {
            warn!(error = %e, "Withdrawal refused");
        }
        Ok::<_, agrostock::item_actor::InventoryError>(())
    }
    .instrument(span)
    .await?;

    let report = client.stock_report().await?;
    println!("{}\n", report.render());
    if let Some(dir) = &config.report_dir {
        let path = report.save(dir).await?;
        println!("Report saved to {}\n", path.display());
    }

    let critical: Vec<StockReportRow> = client
        .list_critical_items()
        .await?
        .iter()
        .map(StockReportRow::from)
        .collect();
    println!("Critical items:\n{}", render_table(&critical));

    drop(client);
    system.shutdown().await?;

    info!("AgroStock finished");
    Ok(())
}
