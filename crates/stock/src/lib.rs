//! Stock records consumed by the reports (locations, products, moves, shipments).
//!
//! These are read-side snapshots of records owned by the inventory system. The
//! crate also defines the repository seam the reports query through.

pub mod location;
pub mod product;
pub mod repository;
pub mod shipment;
pub mod stock_move;

pub use location::{Location, LocationType};
pub use product::{Product, Uom};
pub use repository::{MoveClause, MoveFilter, MoveOrder, RepositoryError, StockRepository};
pub use shipment::{ShipmentIn, ShipmentOut, ShipmentState};
pub use stock_move::{MoveOrigin, MoveState, ShipmentKind, ShipmentRef, StockMove};
