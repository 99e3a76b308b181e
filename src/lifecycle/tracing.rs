//! # Observability & Tracing
//!
//! Structured logging for the whole ledger, built on `tracing`.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: `Actor started` (with the restored row count and id high-water mark),
//!   `Shutdown`
//! - **Entity Operations**: `Created`, `Updated`, `Action ok`, `Deleted` and their failures,
//!   each with `entity_type` and the item code as fields
//! - **Client Calls**: an `#[instrument]` span per [`InventoryClient`](crate::clients::InventoryClient)
//!   method, carrying its arguments
//! - **Alerts**: `Minimum stock level reached` at `WARN` after a withdrawal
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show full payloads with debug logs
//! RUST_LOG=debug cargo run
//!
//! # Only the runtime
//! RUST_LOG=keyed_actor=debug cargo run
//! ```
//!
//! Without `RUST_LOG`, the configured `log_level` is used.
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Actor started entity_type="InventoryItem" restored=0 last_issued=0
//! INFO create_item{name=Semente de Soja}: Created entity_type="InventoryItem" id=1
//! INFO withdraw{code=ItemCode(1) amount=850}: Action ok entity_type="InventoryItem" id=1
//! WARN withdraw{code=ItemCode(1) amount=100}: Minimum stock level reached code=1 quantity=50.00
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` is used. Later calls keep the
/// subscriber that is already installed.
pub fn setup_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type already names the source
        .compact()
        .try_init();
}
