//! Move ordering and grouping for report layouts.
//!
//! Every grouping is a stable sort on a fully ordered key followed by a
//! group-by on the same key, so equal keys are always adjacent. Locations and
//! products are keyed by their `sort_key()`, whose equality agrees with its
//! order, so fields outside the key (a location code, a unit) never split a
//! group.

use rust_decimal::Decimal;
use serde::Serialize;

use stockreport_core::ShipmentId;
use stockreport_stock::{Location, MoveState, Product, ShipmentIn, ShipmentOut, StockMove};

/// Stable sort of `items` by `key`, then split into runs of equal keys.
pub fn sort_then_group<T, K, F>(mut items: Vec<T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.sort_by_cached_key(&key);

    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match groups.last_mut() {
            Some((last, members)) if *last == k => members.push(item),
            _ => groups.push((k, vec![item])),
        }
    }
    groups
}

/// Moves of one shipment in print order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentMoves {
    pub shipment: ShipmentId,
    pub moves: Vec<StockMove>,
}

fn by_locations(mut moves: Vec<StockMove>) -> Vec<StockMove> {
    moves.sort_by_cached_key(|m| (m.from_location.sort_key(), m.to_location.sort_key()));
    moves
}

/// Picking list: each shipment's inventory moves by (from, to) location.
pub fn picking_list_moves(shipments: &[ShipmentOut]) -> Vec<ShipmentMoves> {
    shipments
        .iter()
        .map(|s| ShipmentMoves {
            shipment: s.id,
            moves: by_locations(s.inventory_moves.clone()),
        })
        .collect()
}

/// Restocking list: each supplier shipment's inventory moves by (from, to) location.
pub fn restocking_list_moves(shipments: &[ShipmentIn]) -> Vec<ShipmentMoves> {
    shipments
        .iter()
        .map(|s| ShipmentMoves {
            shipment: s.id,
            moves: by_locations(s.inventory_moves.clone()),
        })
        .collect()
}

/// Delivery note: each shipment's outgoing moves by (product, from) location.
pub fn delivery_note_moves(shipments: &[ShipmentOut]) -> Vec<ShipmentMoves> {
    shipments
        .iter()
        .map(|s| {
            let mut moves = s.outgoing_moves.clone();
            moves.sort_by_cached_key(|m| (m.product.sort_key(), m.from_location.sort_key()));
            ShipmentMoves { shipment: s.id, moves }
        })
        .collect()
}

/// Moves picked from one location for one product, across shipments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveGroup {
    pub from_location: Location,
    pub product: Product,
    pub moves: Vec<StockMove>,
    /// Sum of the members' `quantity` (as entered, in their own units).
    pub quantity: Decimal,
    /// Sum of the members' `internal_quantity` (product default unit).
    pub internal_quantity: Decimal,
}

/// Consolidated picking list: inventory moves of all `shipments` grouped by
/// (from location, product).
pub fn consolidated_picking_list(shipments: &[ShipmentOut]) -> Vec<MoveGroup> {
    let moves: Vec<StockMove> = shipments
        .iter()
        .flat_map(|s| s.inventory_moves.iter().cloned())
        .collect();

    sort_then_group(moves, |m| (m.from_location.sort_key(), m.product.sort_key()))
        .into_iter()
        .map(|(_, moves)| {
            // Groups are never empty.
            let first = &moves[0];
            MoveGroup {
                from_location: first.from_location.clone(),
                product: first.product.clone(),
                quantity: moves.iter().map(|m| m.quantity).sum(),
                internal_quantity: moves.iter().map(|m| m.internal_quantity).sum(),
                moves,
            }
        })
        .collect()
}

/// Product still to be shipped to customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingItem {
    pub product: Product,
    pub moves: Vec<StockMove>,
    /// Shipment numbers, in first-seen order.
    pub shipments: Vec<String>,
    pub quantity: Decimal,
}

/// Items awaiting shipment: undelivered outgoing moves of waiting or assigned
/// shipments, grouped by product.
pub fn items_waiting_shipment(shipments: &[ShipmentOut]) -> Vec<WaitingItem> {
    let pending: Vec<(&str, StockMove)> = shipments
        .iter()
        .filter(|s| s.is_awaiting_shipment())
        .flat_map(|s| {
            s.outgoing_moves
                .iter()
                .filter(|m| m.state != MoveState::Done)
                .map(move |m| (s.number.as_str(), m.clone()))
        })
        .collect();

    sort_then_group(pending, |(_, m)| m.product.sort_key())
        .into_iter()
        .map(|(_, members)| {
            let product = members[0].1.product.clone();
            let mut numbers: Vec<String> = Vec::new();
            for (number, _) in &members {
                if !numbers.iter().any(|n| n.as_str() == *number) {
                    numbers.push((*number).to_string());
                }
            }
            let moves: Vec<StockMove> = members.into_iter().map(|(_, m)| m).collect();
            WaitingItem {
                quantity: moves.iter().map(|m| m.internal_quantity).sum(),
                product,
                moves,
                shipments: numbers,
            }
        })
        .collect()
}
