use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockreport_stock::{Location, Product, ShipmentIn, ShipmentOut, StockMove};

use super::stock_store::InMemoryStockStore;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stock records exported by the inventory system, as loaded at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub products: Vec<Product>,
    /// Moves that belong to no shipment (production, inventory, loose moves).
    #[serde(default)]
    pub moves: Vec<StockMove>,
    #[serde(default)]
    pub shipments_out: Vec<ShipmentOut>,
    #[serde(default)]
    pub shipments_in: Vec<ShipmentIn>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn into_store(self) -> InMemoryStockStore {
        let store = InMemoryStockStore::new();
        for loc in self.locations {
            store.insert_location(loc);
        }
        for product in self.products {
            store.insert_product(product);
        }
        for mv in self.moves {
            store.insert_move(mv);
        }
        for shipment in self.shipments_out {
            store.insert_shipment_out(shipment);
        }
        for shipment in self.shipments_in {
            store.insert_shipment_in(shipment);
        }
        tracing::info!(moves = store.move_count(), "stock snapshot loaded");
        store
    }
}
