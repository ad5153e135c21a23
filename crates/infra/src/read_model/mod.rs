//! In-memory record store backing the reports.

pub mod snapshot;
pub mod stock_store;

pub use snapshot::{Snapshot, SnapshotError};
pub use stock_store::InMemoryStockStore;
