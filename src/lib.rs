//! # AgroStock
//!
//! > **An inventory ledger for agricultural inputs.**
//!
//! Tracks seed, fertilizer and herbicide stock for one organization: quantities on hand,
//! unit cost, minimum levels and the status derived from them. Quantities only move through
//! receipts and withdrawals, and a withdrawal can never take more than is on hand, however
//! many callers race for the same item.
//!
//! ## Design
//!
//! ### One actor per item
//! Items live behind the [`keyed_actor`] runtime. The registry actor creates items one at a
//! time and routes every other request to the item's own actor, whose mailbox serialises the
//! read-validate-write of each movement. Different items never wait on each other.
//!
//! ### Identity and audit
//! Codes come from an atomic counter whose high-water mark is stored with the rows, so a code
//! is never issued twice, not even after deletion or a restart. `created_at` and
//! `updated_at` are stamped by the runtime on every committed write.
//!
//! ### All or nothing
//! A movement is applied to a draft, persisted, and only then made live. A refused
//! withdrawal or a failed write leaves the item exactly as it was.
//!
//! ### Type-safe errors
//! Every operation returns [`InventoryError`](item_actor::InventoryError). Ledger errors
//! raised inside an item actor reach the caller unchanged.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: [`InventoryItem`](model::InventoryItem), its payloads and the status
//!   [`classify`](model::classify) function.
//! - [`item_actor`]: the `ActorEntity` impl, stock actions and errors.
//! - [`clients`]: [`InventoryClient`](clients::InventoryClient), the public API.
//! - [`report`]: read-only stock reports and table rendering.
//! - [`storage`]: the JSON snapshot store.
//! - [`lifecycle`]: [`InventorySystem`](lifecycle::InventorySystem) and tracing setup.
//! - [`config`]: TOML and environment configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo scenario with info logs
//! RUST_LOG=info cargo run
//!
//! # Keep stock in a JSON file between runs
//! AGROSTOCK_DATA_FILE=stock.json cargo run
//! ```

pub mod clients;
pub mod config;
pub mod item_actor;
pub mod lifecycle;
pub mod model;
pub mod report;
pub mod storage;
