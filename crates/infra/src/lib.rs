//! Infrastructure layer: record store, snapshots, configuration.

pub mod config;
pub mod read_model;

pub use config::{AppConfig, OutputFormat, load_config};
pub use read_model::{InMemoryStockStore, Snapshot, SnapshotError};
