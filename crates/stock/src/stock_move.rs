use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockreport_core::{Entity, MoveId, SaleId, SaleLineId, ShipmentId};

use crate::location::Location;
use crate::product::{Product, Uom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    Draft,
    Assigned,
    Done,
}

/// Business document a move was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveOrigin {
    SaleLine {
        sale: SaleId,
        line: SaleLineId,
        /// Order number as printed on the sale, e.g. `SO0042`.
        #[serde(default)]
        number: String,
    },
    /// Any other origin (purchase line, production, inventory line...), by reference.
    Other { reference: String },
}

impl MoveOrigin {
    pub fn sale(&self) -> Option<SaleId> {
        match self {
            MoveOrigin::SaleLine { sale, .. } => Some(*sale),
            MoveOrigin::Other { .. } => None,
        }
    }

    /// Printable sale reference: the order number, or the sale id when no
    /// number was recorded.
    pub fn sale_label(&self) -> Option<String> {
        match self {
            MoveOrigin::SaleLine { sale, number, .. } if number.is_empty() => Some(sale.to_string()),
            MoveOrigin::SaleLine { number, .. } => Some(number.clone()),
            MoveOrigin::Other { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentKind {
    Out,
    In,
    OutReturn,
}

/// Back-reference from a move to the shipment holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipmentRef {
    pub id: ShipmentId,
    pub kind: ShipmentKind,
}

/// One transfer of a product between two locations.
///
/// `internal_quantity` is `quantity` converted into the product's default unit;
/// every total on a report is computed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMove {
    pub id: MoveId,
    pub product: Product,
    pub uom: Uom,
    pub quantity: Decimal,
    pub internal_quantity: Decimal,
    pub from_location: Location,
    pub to_location: Location,
    #[serde(default)]
    pub planned_date: Option<NaiveDate>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    pub state: MoveState,
    #[serde(default)]
    pub shipment: Option<ShipmentRef>,
    #[serde(default)]
    pub origin: Option<MoveOrigin>,
    #[serde(default)]
    pub inventory_origin: Option<MoveOrigin>,
}

impl StockMove {
    /// New draft move; `internal_quantity` is derived from `uom`.
    pub fn new(product: Product, uom: Uom, quantity: Decimal, from_location: Location, to_location: Location) -> Self {
        let internal_quantity = uom.compute_qty(quantity, &product.default_uom);
        Self {
            id: MoveId::new(),
            product,
            uom,
            quantity,
            internal_quantity,
            from_location,
            to_location,
            planned_date: None,
            effective_date: None,
            state: MoveState::Draft,
            shipment: None,
            origin: None,
            inventory_origin: None,
        }
    }

    pub fn with_effective_date(mut self, date: NaiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }

    pub fn with_state(mut self, state: MoveState) -> Self {
        self.state = state;
        self
    }

    pub fn with_shipment(mut self, shipment: ShipmentRef) -> Self {
        self.shipment = Some(shipment);
        self
    }

    pub fn with_origin(mut self, origin: MoveOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Origin that decides which sale the move ships.
    ///
    /// Only moves of outgoing shipments qualify. The move's own origin wins over
    /// the origin copied from its outgoing counterpart.
    fn shipping_origin(&self) -> Option<&MoveOrigin> {
        let shipment = self.shipment?;
        if shipment.kind != ShipmentKind::Out {
            return None;
        }
        self.origin.as_ref().or(self.inventory_origin.as_ref())
    }

    /// Sale order the move ships, if any.
    pub fn sale_order(&self) -> Option<SaleId> {
        self.shipping_origin().and_then(MoveOrigin::sale)
    }

    /// Printable reference of [`Self::sale_order`].
    pub fn sale_label(&self) -> Option<String> {
        self.shipping_origin().and_then(MoveOrigin::sale_label)
    }
}

impl Entity for StockMove {
    type Id = MoveId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
