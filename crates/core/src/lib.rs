//! `stockreport-core`: shared building blocks for the stock report crates.
//!
//! This crate contains **pure** primitives (no IO, no rendering).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{LocationId, MoveId, ProductId, SaleId, SaleLineId, ShipmentId, UomId};
