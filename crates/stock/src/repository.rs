//! Record-store seam.
//!
//! Reports never reach into storage directly; they query a `StockRepository`
//! with typed filter clauses and an ordering, plus a point-in-time stock query.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use stockreport_core::{LocationId, ProductId, SaleId, ShipmentId};

use crate::location::{Location, LocationType};
use crate::product::Product;
use crate::shipment::{ShipmentIn, ShipmentOut, ShipmentState};
use crate::stock_move::{MoveState, StockMove};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("record store failure: {0}")]
    Backend(String),
}

impl RepositoryError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// One `(field, operator, value)` condition on a stock move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveClause {
    Product(ProductId),
    State(MoveState),
    /// `effective_date >= date`
    EffectiveDateFrom(NaiveDate),
    /// `effective_date <= date`
    EffectiveDateTo(NaiveDate),
    FromLocationType(LocationType),
    ToLocationType(LocationType),
}

impl MoveClause {
    pub fn matches(&self, mv: &StockMove) -> bool {
        match self {
            MoveClause::Product(p) => mv.product.id == *p,
            MoveClause::State(s) => mv.state == *s,
            // Moves without an effective date never satisfy a date bound.
            MoveClause::EffectiveDateFrom(d) => mv.effective_date.is_some_and(|e| e >= *d),
            MoveClause::EffectiveDateTo(d) => mv.effective_date.is_some_and(|e| e <= *d),
            MoveClause::FromLocationType(t) => mv.from_location.kind == *t,
            MoveClause::ToLocationType(t) => mv.to_location.kind == *t,
        }
    }
}

/// Conjunction of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveFilter {
    clauses: Vec<MoveClause>,
}

impl MoveFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, clause: MoveClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn product(self, product: ProductId) -> Self {
        self.with(MoveClause::Product(product))
    }

    pub fn state(self, state: MoveState) -> Self {
        self.with(MoveClause::State(state))
    }

    /// Inclusive on both bounds.
    pub fn effective_between(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.with(MoveClause::EffectiveDateFrom(start))
            .with(MoveClause::EffectiveDateTo(end))
    }

    pub fn from_type(self, kind: LocationType) -> Self {
        self.with(MoveClause::FromLocationType(kind))
    }

    pub fn to_type(self, kind: LocationType) -> Self {
        self.with(MoveClause::ToLocationType(kind))
    }

    pub fn matches(&self, mv: &StockMove) -> bool {
        self.clauses.iter().all(|c| c.matches(mv))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveOrder {
    /// Ascending effective date; moves without one sort first. Ties by id.
    #[default]
    EffectiveDate,
    Id,
}

impl MoveOrder {
    pub fn sort(self, moves: &mut [StockMove]) {
        match self {
            MoveOrder::EffectiveDate => moves.sort_by(|a, b| {
                a.effective_date
                    .cmp(&b.effective_date)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            MoveOrder::Id => moves.sort_by_key(|m| m.id),
        }
    }
}

/// Read access to the stock records the reports are built from.
pub trait StockRepository: Send + Sync {
    fn find_moves(&self, filter: &MoveFilter, order: MoveOrder) -> Result<Vec<StockMove>, RepositoryError>;

    /// Quantity of `product` (in its default unit) held in `locations` and their
    /// children at the end of `date`.
    fn quantity_as_of(
        &self,
        product: ProductId,
        locations: &[LocationId],
        date: NaiveDate,
    ) -> Result<Decimal, RepositoryError>;

    fn product(&self, id: ProductId) -> Result<Product, RepositoryError>;

    fn location(&self, id: LocationId) -> Result<Location, RepositoryError>;

    /// Outgoing shipments by id, in the order requested.
    fn shipments_out(&self, ids: &[ShipmentId]) -> Result<Vec<ShipmentOut>, RepositoryError>;

    /// Incoming shipments by id, in the order requested.
    fn shipments_in(&self, ids: &[ShipmentId]) -> Result<Vec<ShipmentIn>, RepositoryError>;

    /// Outgoing shipments in any of `states` (every shipment when empty).
    fn find_shipments_out(&self, states: &[ShipmentState]) -> Result<Vec<ShipmentOut>, RepositoryError>;

    /// Outgoing shipments carrying goods for `sale`.
    fn shipments_for_sale(&self, sale: SaleId) -> Result<Vec<ShipmentOut>, RepositoryError> {
        Ok(self
            .find_shipments_out(&[])?
            .into_iter()
            .filter(|s| s.ships_sale(sale))
            .collect())
    }
}

impl<S> StockRepository for Arc<S>
where
    S: StockRepository + ?Sized,
{
    fn find_moves(&self, filter: &MoveFilter, order: MoveOrder) -> Result<Vec<StockMove>, RepositoryError> {
        (**self).find_moves(filter, order)
    }

    fn quantity_as_of(
        &self,
        product: ProductId,
        locations: &[LocationId],
        date: NaiveDate,
    ) -> Result<Decimal, RepositoryError> {
        (**self).quantity_as_of(product, locations, date)
    }

    fn product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        (**self).product(id)
    }

    fn location(&self, id: LocationId) -> Result<Location, RepositoryError> {
        (**self).location(id)
    }

    fn shipments_out(&self, ids: &[ShipmentId]) -> Result<Vec<ShipmentOut>, RepositoryError> {
        (**self).shipments_out(ids)
    }

    fn shipments_in(&self, ids: &[ShipmentId]) -> Result<Vec<ShipmentIn>, RepositoryError> {
        (**self).shipments_in(ids)
    }

    fn find_shipments_out(&self, states: &[ShipmentState]) -> Result<Vec<ShipmentOut>, RepositoryError> {
        (**self).find_shipments_out(states)
    }

    fn shipments_for_sale(&self, sale: SaleId) -> Result<Vec<ShipmentOut>, RepositoryError> {
        (**self).shipments_for_sale(sale)
    }
}
