use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use stockreport_core::{Entity, LocationId, ProductId, ShipmentId};
use stockreport_stock::{
    Location, MoveFilter, MoveOrder, MoveState, Product, RepositoryError, ShipmentIn, ShipmentOut,
    ShipmentState, StockMove, StockRepository,
};

type Table<E> = HashMap<<E as Entity>::Id, E>;

fn put<E: Entity>(table: &mut Table<E>, record: E) {
    table.insert(record.id(), record);
}

#[derive(Debug, Default)]
struct Tables {
    locations: Table<Location>,
    products: Table<Product>,
    moves: Table<StockMove>,
    shipments_out: Table<ShipmentOut>,
    shipments_in: Table<ShipmentIn>,
}

impl Tables {
    /// `roots` plus every location below them.
    fn descendants(&self, roots: &[LocationId]) -> HashSet<LocationId> {
        let mut set: HashSet<LocationId> = roots.iter().copied().collect();
        loop {
            let before = set.len();
            for loc in self.locations.values() {
                if loc.parent.is_some_and(|p| set.contains(&p)) {
                    set.insert(loc.id);
                }
            }
            if set.len() == before {
                return set;
            }
        }
    }
}

/// In-memory stock record store for tests/dev and snapshot-backed serving.
///
/// Shipment moves are indexed alongside standalone moves, so a move inserted
/// through a shipment is visible to `find_moves` and the stock query.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    inner: RwLock<Tables>,
}

fn poisoned() -> RepositoryError {
    RepositoryError::Backend("stock store lock poisoned".to_string())
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_location(&self, location: Location) {
        if let Ok(mut t) = self.inner.write() {
            put(&mut t.locations, location);
        }
    }

    pub fn insert_product(&self, product: Product) {
        if let Ok(mut t) = self.inner.write() {
            put(&mut t.products, product);
        }
    }

    pub fn insert_move(&self, mv: StockMove) {
        if let Ok(mut t) = self.inner.write() {
            put(&mut t.moves, mv);
        }
    }

    pub fn insert_shipment_out(&self, shipment: ShipmentOut) {
        if let Ok(mut t) = self.inner.write() {
            for mv in shipment.outgoing_moves.iter().chain(&shipment.inventory_moves) {
                put(&mut t.moves, mv.clone());
            }
            put(&mut t.shipments_out, shipment);
        }
    }

    pub fn insert_shipment_in(&self, shipment: ShipmentIn) {
        if let Ok(mut t) = self.inner.write() {
            for mv in shipment.incoming_moves.iter().chain(&shipment.inventory_moves) {
                put(&mut t.moves, mv.clone());
            }
            put(&mut t.shipments_in, shipment);
        }
    }

    pub fn move_count(&self) -> usize {
        self.inner.read().map(|t| t.moves.len()).unwrap_or(0)
    }
}

impl StockRepository for InMemoryStockStore {
    fn find_moves(&self, filter: &MoveFilter, order: MoveOrder) -> Result<Vec<StockMove>, RepositoryError> {
        let t = self.inner.read().map_err(|_| poisoned())?;
        let mut moves: Vec<StockMove> = t
            .moves
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        order.sort(&mut moves);
        Ok(moves)
    }

    /// Only done moves count; a move inside the location set changes nothing.
    fn quantity_as_of(
        &self,
        product: ProductId,
        locations: &[LocationId],
        date: NaiveDate,
    ) -> Result<Decimal, RepositoryError> {
        let t = self.inner.read().map_err(|_| poisoned())?;
        let scope = t.descendants(locations);

        let qty = t
            .moves
            .values()
            .filter(|m| m.product.id == product && m.state == MoveState::Done)
            .filter(|m| m.effective_date.is_some_and(|d| d <= date))
            .fold(Decimal::ZERO, |acc, m| {
                let into = scope.contains(&m.to_location.id);
                let out_of = scope.contains(&m.from_location.id);
                match (out_of, into) {
                    (false, true) => acc + m.internal_quantity,
                    (true, false) => acc - m.internal_quantity,
                    _ => acc,
                }
            });
        Ok(qty)
    }

    fn product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let t = self.inner.read().map_err(|_| poisoned())?;
        t.products
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("product", id))
    }

    fn location(&self, id: LocationId) -> Result<Location, RepositoryError> {
        let t = self.inner.read().map_err(|_| poisoned())?;
        t.locations
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("location", id))
    }

    fn shipments_out(&self, ids: &[ShipmentId]) -> Result<Vec<ShipmentOut>, RepositoryError> {
        let t = self.inner.read().map_err(|_| poisoned())?;
        ids.iter()
            .map(|id| {
                t.shipments_out
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RepositoryError::not_found("customer shipment", id))
            })
            .collect()
    }

    fn shipments_in(&self, ids: &[ShipmentId]) -> Result<Vec<ShipmentIn>, RepositoryError> {
        let t = self.inner.read().map_err(|_| poisoned())?;
        ids.iter()
            .map(|id| {
                t.shipments_in
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RepositoryError::not_found("supplier shipment", id))
            })
            .collect()
    }

    fn find_shipments_out(&self, states: &[ShipmentState]) -> Result<Vec<ShipmentOut>, RepositoryError> {
        let t = self.inner.read().map_err(|_| poisoned())?;
        let mut found: Vec<ShipmentOut> = t
            .shipments_out
            .values()
            .filter(|s| states.is_empty() || states.contains(&s.state))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}
