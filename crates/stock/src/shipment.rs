use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockreport_core::{Entity, LocationId, SaleId, ShipmentId};

use crate::location::Location;
use crate::stock_move::{MoveState, ShipmentKind, ShipmentRef, StockMove};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentState {
    Draft,
    Waiting,
    Assigned,
    Packed,
    Received,
    Done,
    Cancel,
}

/// Customer shipment.
///
/// Goods are first picked from storage to the warehouse output location
/// (`inventory_moves`), then shipped from output to the customer
/// (`outgoing_moves`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentOut {
    pub id: ShipmentId,
    pub number: String,
    pub customer: String,
    #[serde(default)]
    pub delivery_address: Option<String>,
    pub warehouse: LocationId,
    #[serde(default)]
    pub planned_date: Option<NaiveDate>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    pub state: ShipmentState,
    #[serde(default)]
    pub outgoing_moves: Vec<StockMove>,
    #[serde(default)]
    pub inventory_moves: Vec<StockMove>,
}

impl ShipmentOut {
    pub fn reference(&self) -> ShipmentRef {
        ShipmentRef {
            id: self.id,
            kind: ShipmentKind::Out,
        }
    }

    /// Distinct sales shipped by this shipment, in first-seen order.
    pub fn sales(&self) -> Vec<SaleId> {
        let mut sales: Vec<SaleId> = Vec::new();
        for sale in self
            .outgoing_moves
            .iter()
            .filter_map(|m| m.origin.as_ref().and_then(|o| o.sale()))
        {
            if !sales.contains(&sale) {
                sales.push(sale);
            }
        }
        sales
    }

    /// Printable references of [`Self::sales`], same order.
    pub fn sale_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for label in self
            .outgoing_moves
            .iter()
            .filter_map(|m| m.origin.as_ref().and_then(|o| o.sale_label()))
        {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    /// Whether any outgoing move originates from `sale`.
    pub fn ships_sale(&self, sale: SaleId) -> bool {
        self.outgoing_moves
            .iter()
            .any(|m| m.origin.as_ref().and_then(|o| o.sale()) == Some(sale))
    }

    /// Build the picking move feeding `outgoing`: same product and quantity,
    /// from `storage` to the outgoing move's source (the output location).
    ///
    /// The outgoing move's origin is kept as `inventory_origin` so picking lists
    /// can show which sale each picked line belongs to.
    pub fn inventory_move_for(&self, outgoing: &StockMove, storage: &Location) -> StockMove {
        let mut mv = StockMove::new(
            outgoing.product.clone(),
            outgoing.uom.clone(),
            outgoing.quantity,
            storage.clone(),
            outgoing.from_location.clone(),
        )
        .with_state(MoveState::Draft)
        .with_shipment(self.reference());
        mv.planned_date = outgoing.planned_date.or(self.planned_date);
        mv.inventory_origin = outgoing.origin.clone();
        mv
    }

    /// Whether the shipment still has goods to hand over to the customer.
    pub fn is_awaiting_shipment(&self) -> bool {
        matches!(self.state, ShipmentState::Waiting | ShipmentState::Assigned)
    }
}

impl Entity for ShipmentOut {
    type Id = ShipmentId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Supplier shipment.
///
/// Goods arrive from the supplier into the warehouse input location
/// (`incoming_moves`) and are then restocked into storage (`inventory_moves`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentIn {
    pub id: ShipmentId,
    pub number: String,
    pub supplier: String,
    pub warehouse: LocationId,
    #[serde(default)]
    pub planned_date: Option<NaiveDate>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    pub state: ShipmentState,
    #[serde(default)]
    pub incoming_moves: Vec<StockMove>,
    #[serde(default)]
    pub inventory_moves: Vec<StockMove>,
}

impl ShipmentIn {
    pub fn reference(&self) -> ShipmentRef {
        ShipmentRef {
            id: self.id,
            kind: ShipmentKind::In,
        }
    }
}

impl Entity for ShipmentIn {
    type Id = ShipmentId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
