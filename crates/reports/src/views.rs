//! Template contexts, one per report.
//!
//! Values are formatted here so the templates only print strings.

use askama::Template;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use stockreport_stock::{ShipmentIn, ShipmentOut, StockMove};

use crate::grouping::{MoveGroup, ShipmentMoves, WaitingItem};
use crate::ledger::{LedgerCategory, LedgerRecord};

pub fn fmt_qty(qty: Decimal) -> String {
    qty.normalize().to_string()
}

pub fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLine {
    pub from: String,
    pub to: String,
    pub product: String,
    pub quantity: String,
    pub uom: String,
    pub date: String,
    pub sale: String,
}

impl MoveLine {
    pub fn from_move(mv: &StockMove) -> Self {
        Self {
            from: mv.from_location.label(),
            to: mv.to_location.label(),
            product: mv.product.rec_name(),
            quantity: fmt_qty(mv.quantity),
            uom: mv.uom.symbol.clone(),
            date: fmt_date(mv.effective_date.or(mv.planned_date)),
            sale: mv.sale_label().unwrap_or_default(),
        }
    }

    /// Same line with the quantity expressed in the product's default unit.
    pub fn normalized(mv: &StockMove) -> Self {
        Self {
            quantity: fmt_qty(mv.internal_quantity),
            uom: mv.product.default_uom.symbol.clone(),
            ..Self::from_move(mv)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentSection {
    pub number: String,
    pub party: String,
    pub address: String,
    pub planned_date: String,
    pub sales: String,
    pub lines: Vec<MoveLine>,
}

fn lines(moves: &[StockMove]) -> Vec<MoveLine> {
    moves.iter().map(MoveLine::from_move).collect()
}

fn section_out(shipment: &ShipmentOut, moves: &ShipmentMoves) -> ShipmentSection {
    ShipmentSection {
        number: shipment.number.clone(),
        party: shipment.customer.clone(),
        address: shipment.delivery_address.clone().unwrap_or_default(),
        planned_date: fmt_date(shipment.planned_date),
        sales: shipment.sale_labels().join(", "),
        lines: lines(&moves.moves),
    }
}

fn section_in(shipment: &ShipmentIn, moves: &ShipmentMoves) -> ShipmentSection {
    ShipmentSection {
        number: shipment.number.clone(),
        party: shipment.supplier.clone(),
        address: String::new(),
        planned_date: fmt_date(shipment.planned_date),
        sales: String::new(),
        lines: lines(&moves.moves),
    }
}

/// Pairs each shipment with its grouped moves; both lists share one order.
fn zip_sections<S>(
    shipments: &[S],
    grouped: &[ShipmentMoves],
    build: impl Fn(&S, &ShipmentMoves) -> ShipmentSection,
) -> Vec<ShipmentSection> {
    shipments
        .iter()
        .zip(grouped)
        .map(|(s, m)| build(s, m))
        .collect()
}

#[derive(Template)]
#[template(path = "picking_list.html")]
pub struct PickingListView {
    pub title: String,
    pub company: String,
    pub shipments: Vec<ShipmentSection>,
}

impl PickingListView {
    pub fn new(title: &str, company: &str, shipments: &[ShipmentOut], grouped: &[ShipmentMoves]) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            shipments: zip_sections(shipments, grouped, section_out),
        }
    }
}

#[derive(Template)]
#[template(path = "restocking_list.html")]
pub struct RestockingListView {
    pub title: String,
    pub company: String,
    pub shipments: Vec<ShipmentSection>,
}

impl RestockingListView {
    pub fn new(title: &str, company: &str, shipments: &[ShipmentIn], grouped: &[ShipmentMoves]) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            shipments: zip_sections(shipments, grouped, section_in),
        }
    }
}

#[derive(Template)]
#[template(path = "delivery_note.html")]
pub struct DeliveryNoteView {
    pub title: String,
    pub company: String,
    pub shipments: Vec<ShipmentSection>,
}

impl DeliveryNoteView {
    pub fn new(title: &str, company: &str, shipments: &[ShipmentOut], grouped: &[ShipmentMoves]) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            shipments: zip_sections(shipments, grouped, section_out),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedLine {
    pub from: String,
    pub product: String,
    pub quantity: String,
    pub uom: String,
    pub moves: usize,
}

#[derive(Template)]
#[template(path = "consolidated_picking_list.html")]
pub struct ConsolidatedPickingListView {
    pub title: String,
    pub company: String,
    pub shipments: String,
    pub lines: Vec<ConsolidatedLine>,
}

impl ConsolidatedPickingListView {
    pub fn new(title: &str, company: &str, shipments: &[ShipmentOut], groups: &[MoveGroup]) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            shipments: shipments
                .iter()
                .map(|s| s.number.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            lines: groups
                .iter()
                .map(|g| ConsolidatedLine {
                    from: g.from_location.label(),
                    product: g.product.rec_name(),
                    quantity: fmt_qty(g.internal_quantity),
                    uom: g.product.default_uom.symbol.clone(),
                    moves: g.moves.len(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSection {
    pub title: String,
    pub lines: Vec<MoveLine>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerProduct {
    pub product: String,
    pub uom: String,
    pub opening_stock: String,
    pub closing_stock: String,
    pub sections: Vec<LedgerSection>,
}

#[derive(Template)]
#[template(path = "product_ledger.html")]
pub struct ProductLedgerView {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub products: Vec<LedgerProduct>,
}

impl ProductLedgerView {
    pub fn new(title: &str, company: &str, start: NaiveDate, end: NaiveDate, records: &[LedgerRecord]) -> Self {
        let products = records
            .iter()
            .map(|r| LedgerProduct {
                product: r.product.rec_name(),
                uom: r.product.default_uom.symbol.clone(),
                opening_stock: fmt_qty(r.summary.opening_stock),
                closing_stock: fmt_qty(r.summary.closing_stock),
                sections: LedgerCategory::ALL
                    .iter()
                    .map(|c| LedgerSection {
                        title: c.title().to_string(),
                        lines: r.moves(*c).iter().map(MoveLine::normalized).collect(),
                        total: fmt_qty(r.summary.total(*c)),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: title.to_string(),
            company: company.to_string(),
            start_date: fmt_date(Some(start)),
            end_date: fmt_date(Some(end)),
            products,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingLine {
    pub product: String,
    pub quantity: String,
    pub uom: String,
    pub shipments: String,
}

#[derive(Template)]
#[template(path = "items_waiting_shipment.html")]
pub struct ItemsWaitingShipmentView {
    pub title: String,
    pub company: String,
    pub lines: Vec<WaitingLine>,
}

impl ItemsWaitingShipmentView {
    pub fn new(title: &str, company: &str, items: &[WaitingItem]) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            lines: items
                .iter()
                .map(|i| WaitingLine {
                    product: i.product.rec_name(),
                    quantity: fmt_qty(i.quantity),
                    uom: i.product.default_uom.symbol.clone(),
                    shipments: i.shipments.join(", "),
                })
                .collect(),
        }
    }
}
