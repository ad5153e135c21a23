//! Report dispatch: one strategy per report kind.

use askama::Template;
use serde::{Deserialize, Serialize};

use stockreport_core::{DomainError, ShipmentId};
use stockreport_stock::{ShipmentState, StockRepository};

use crate::error::ReportError;
use crate::grouping;
use crate::ledger::{self, LedgerRecord};
use crate::pdf::{DocumentRenderer, PdfOptions};
use crate::views::{
    ConsolidatedPickingListView, DeliveryNoteView, ItemsWaitingShipmentView, PickingListView,
    ProductLedgerView, RestockingListView,
};
use crate::wizard::ProductLedgerParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    PickingList,
    ConsolidatedPickingList,
    RestockingList,
    DeliveryNote,
    ProductLedger,
    ItemsWaitingShipment,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::PickingList,
        ReportKind::ConsolidatedPickingList,
        ReportKind::RestockingList,
        ReportKind::DeliveryNote,
        ReportKind::ProductLedger,
        ReportKind::ItemsWaitingShipment,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::PickingList => "Picking List",
            ReportKind::ConsolidatedPickingList => "Consolidated Picking List",
            ReportKind::RestockingList => "Restocking List",
            ReportKind::DeliveryNote => "Delivery Note",
            ReportKind::ProductLedger => "Product Ledger",
            ReportKind::ItemsWaitingShipment => "Items Waiting Shipment",
        }
    }

    pub fn report_name(self) -> &'static str {
        match self {
            ReportKind::PickingList => "report.picking_list",
            ReportKind::ConsolidatedPickingList => "report.consolidated_picking_list",
            ReportKind::RestockingList => "report.restocking_list",
            ReportKind::DeliveryNote => "report.delivery_note",
            ReportKind::ProductLedger => "report.product_ledger",
            ReportKind::ItemsWaitingShipment => "report.items_waiting_shipment",
        }
    }

    fn file_stem(self) -> String {
        self.title().to_lowercase().replace(' ', "-")
    }
}

/// What to print, with the parameters each report needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum ReportRequest {
    PickingList { shipments: Vec<ShipmentId> },
    ConsolidatedPickingList { shipments: Vec<ShipmentId> },
    RestockingList { shipments: Vec<ShipmentId> },
    DeliveryNote { shipments: Vec<ShipmentId> },
    ProductLedger(ProductLedgerParams),
    ItemsWaitingShipment,
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRequest::PickingList { .. } => ReportKind::PickingList,
            ReportRequest::ConsolidatedPickingList { .. } => ReportKind::ConsolidatedPickingList,
            ReportRequest::RestockingList { .. } => ReportKind::RestockingList,
            ReportRequest::DeliveryNote { .. } => ReportKind::DeliveryNote,
            ReportRequest::ProductLedger(_) => ReportKind::ProductLedger,
            ReportRequest::ItemsWaitingShipment => ReportKind::ItemsWaitingShipment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Html,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Html => "html",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

/// A rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutput {
    pub format: ReportFormat,
    pub content: Vec<u8>,
    pub filename: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub company_name: Option<String>,
    pub format: ReportFormat,
    pub page_margin: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            company_name: None,
            format: ReportFormat::Pdf,
            page_margin: "0.50in".to_string(),
        }
    }
}

impl ReportSettings {
    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions::with_margin(&self.page_margin).footer_company(self.company_name.as_deref())
    }
}

pub struct ReportEngine<R, P> {
    repo: R,
    renderer: P,
    settings: ReportSettings,
}

fn require_shipments(ids: &[ShipmentId]) -> Result<(), ReportError> {
    if ids.is_empty() {
        return Err(DomainError::validation("select at least one shipment").into());
    }
    Ok(())
}

impl<R, P> ReportEngine<R, P>
where
    R: StockRepository,
    P: DocumentRenderer,
{
    pub fn new(repo: R, renderer: P, settings: ReportSettings) -> Self {
        Self {
            repo,
            renderer,
            settings,
        }
    }

    /// Ledger records without rendering.
    pub fn ledger(&self, params: &ProductLedgerParams) -> Result<Vec<LedgerRecord>, ReportError> {
        ledger::product_ledger(&self.repo, params)
    }

    /// Report HTML, before any conversion.
    pub fn render_html(&self, request: &ReportRequest) -> Result<String, ReportError> {
        let title = request.kind().title();
        let company = self.settings.company_name.as_deref().unwrap_or_default();

        let html = match request {
            ReportRequest::PickingList { shipments } => {
                require_shipments(shipments)?;
                let shipments = self.repo.shipments_out(shipments)?;
                let grouped = grouping::picking_list_moves(&shipments);
                PickingListView::new(title, company, &shipments, &grouped).render()?
            }
            ReportRequest::ConsolidatedPickingList { shipments } => {
                require_shipments(shipments)?;
                let shipments = self.repo.shipments_out(shipments)?;
                let groups = grouping::consolidated_picking_list(&shipments);
                ConsolidatedPickingListView::new(title, company, &shipments, &groups).render()?
            }
            ReportRequest::RestockingList { shipments } => {
                require_shipments(shipments)?;
                let shipments = self.repo.shipments_in(shipments)?;
                let grouped = grouping::restocking_list_moves(&shipments);
                RestockingListView::new(title, company, &shipments, &grouped).render()?
            }
            ReportRequest::DeliveryNote { shipments } => {
                require_shipments(shipments)?;
                let shipments = self.repo.shipments_out(shipments)?;
                let grouped = grouping::delivery_note_moves(&shipments);
                DeliveryNoteView::new(title, company, &shipments, &grouped).render()?
            }
            ReportRequest::ProductLedger(params) => {
                let records = self.ledger(params)?;
                ProductLedgerView::new(title, company, params.start_date, params.end_date, &records).render()?
            }
            ReportRequest::ItemsWaitingShipment => {
                let shipments = self
                    .repo
                    .find_shipments_out(&[ShipmentState::Waiting, ShipmentState::Assigned])?;
                let items = grouping::items_waiting_shipment(&shipments);
                ItemsWaitingShipmentView::new(title, company, &items).render()?
            }
        };
        Ok(html)
    }

    /// Render `request` in the configured format.
    pub fn execute(&self, request: &ReportRequest) -> Result<ReportOutput, ReportError> {
        let kind = request.kind();
        let html = self.render_html(request)?;

        let format = self.settings.format;
        let content = match format {
            ReportFormat::Html => html.into_bytes(),
            ReportFormat::Pdf => self.renderer.render_pdf(&html, &self.settings.pdf_options())?,
        };

        tracing::info!(
            report = kind.report_name(),
            format = format.extension(),
            bytes = content.len(),
            "report generated"
        );

        Ok(ReportOutput {
            format,
            content,
            filename: format!("{}.{}", kind.file_stem(), format.extension()),
            title: kind.title().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use stockreport_core::{LocationId, SaleId, SaleLineId};
    use stockreport_infra::InMemoryStockStore;
    use stockreport_stock::{
        Location, LocationType, MoveOrigin, MoveState, Product, ShipmentIn, ShipmentOut, StockMove, Uom,
    };

    use crate::error::RenderError;

    /// Records the options it was called with and returns a fixed document.
    #[derive(Default)]
    struct FakeRenderer {
        calls: Mutex<Vec<PdfOptions>>,
    }

    impl DocumentRenderer for FakeRenderer {
        fn render_pdf(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
            self.calls.lock().unwrap().push(options.clone());
            let mut out = b"%PDF-1.4\n".to_vec();
            out.extend_from_slice(html.as_bytes());
            Ok(out)
        }
    }

    struct Setup {
        store: Arc<InMemoryStockStore>,
        shipment: ShipmentOut,
        sale: SaleId,
        product: Product,
        warehouse: Location,
    }

    fn setup() -> Setup {
        let store = Arc::new(InMemoryStockStore::new());
        let warehouse = Location::new("Warehouse", LocationType::Warehouse);
        let storage = Location::new("Storage", LocationType::Storage).with_parent(warehouse.id);
        let output = Location::new("Output", LocationType::Storage).with_parent(warehouse.id);
        let customer = Location::new("Customer", LocationType::Customer);
        for loc in [&warehouse, &storage, &output, &customer] {
            store.insert_location(loc.clone());
        }
        let product = Product::new("123", "Bat Mobile", Uom::unit());
        store.insert_product(product.clone());

        let sale = SaleId::new();
        let today = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
        let mut shipment = ShipmentOut {
            id: ShipmentId::new(),
            number: "CS1".to_string(),
            customer: "Bruce Wayne".to_string(),
            delivery_address: Some("Gotham".to_string()),
            warehouse: warehouse.id,
            planned_date: Some(today),
            effective_date: Some(today),
            state: ShipmentState::Waiting,
            outgoing_moves: Vec::new(),
            inventory_moves: Vec::new(),
        };
        let outgoing = StockMove::new(product.clone(), Uom::unit(), dec!(6), output.clone(), customer.clone())
            .with_shipment(shipment.reference())
            .with_origin(MoveOrigin::SaleLine {
                sale,
                line: SaleLineId::new(),
                number: "SO0042".to_string(),
            });
        let inventory = shipment.inventory_move_for(&outgoing, &storage);
        shipment.outgoing_moves.push(outgoing);
        shipment.inventory_moves.push(inventory);
        store.insert_shipment_out(shipment.clone());

        Setup {
            store,
            shipment,
            sale,
            product,
            warehouse,
        }
    }

    fn engine(
        s: &Setup,
        format: ReportFormat,
    ) -> ReportEngine<Arc<InMemoryStockStore>, Arc<FakeRenderer>> {
        ReportEngine::new(
            s.store.clone(),
            Arc::new(FakeRenderer::default()),
            ReportSettings {
                company_name: Some("openlabs".to_string()),
                format,
                page_margin: "0.50in".to_string(),
            },
        )
    }

    #[test]
    fn picking_list_renders_pdf() {
        let s = setup();
        let engine = engine(&s, ReportFormat::Pdf);

        let out = engine
            .execute(&ReportRequest::PickingList {
                shipments: vec![s.shipment.id],
            })
            .unwrap();

        assert_eq!(out.format, ReportFormat::Pdf);
        assert_eq!(out.title, "Picking List");
        assert_eq!(out.filename, "picking-list.pdf");
        assert!(out.content.starts_with(b"%PDF"));

        let calls = engine.renderer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].footer_left, "openlabs");
        assert_eq!(calls[0].footer_right, "[page]/[toPage]");
    }

    #[test]
    fn picking_list_shows_moves_and_sale() {
        let s = setup();
        let html = engine(&s, ReportFormat::Html)
            .render_html(&ReportRequest::PickingList {
                shipments: vec![s.shipment.id],
            })
            .unwrap();

        assert!(html.contains("Shipment CS1"));
        assert!(html.contains("Storage"));
        assert!(html.contains("Output"));
        assert!(html.contains("[123] Bat Mobile"));
        assert!(html.contains("<td>SO0042</td>"));
        assert!(html.contains("Sales: SO0042"));
        assert!(!html.contains(&s.sale.to_string()));
    }

    #[test]
    fn html_format_skips_conversion() {
        let s = setup();
        let engine = engine(&s, ReportFormat::Html);
        let out = engine
            .execute(&ReportRequest::DeliveryNote {
                shipments: vec![s.shipment.id],
            })
            .unwrap();

        assert_eq!(out.format, ReportFormat::Html);
        assert_eq!(out.filename, "delivery-note.html");
        assert!(String::from_utf8(out.content).unwrap().contains("Deliver to: Bruce Wayne"));
        assert!(engine.renderer.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn consolidated_list_sums_quantities() {
        let s = setup();
        let html = engine(&s, ReportFormat::Html)
            .render_html(&ReportRequest::ConsolidatedPickingList {
                shipments: vec![s.shipment.id],
            })
            .unwrap();
        assert!(html.contains("Shipments: CS1"));
        assert!(html.contains(">6<"));
    }

    #[test]
    fn items_waiting_shipment_lists_pending_products() {
        let s = setup();
        let html = engine(&s, ReportFormat::Html)
            .render_html(&ReportRequest::ItemsWaitingShipment)
            .unwrap();
        assert!(html.contains("[123] Bat Mobile"));
        assert!(html.contains("CS1"));
    }

    #[test]
    fn restocking_list_reads_supplier_shipments() {
        let s = setup();
        let input = Location::new("Input", LocationType::Storage).with_parent(s.warehouse.id);
        let storage = Location::new("Shelf 9", LocationType::Storage).with_parent(s.warehouse.id);
        let mut shipment = ShipmentIn {
            id: ShipmentId::new(),
            number: "SS1".to_string(),
            supplier: "Wayne Enterprises".to_string(),
            warehouse: s.warehouse.id,
            planned_date: None,
            effective_date: None,
            state: ShipmentState::Received,
            incoming_moves: Vec::new(),
            inventory_moves: Vec::new(),
        };
        shipment.inventory_moves.push(
            StockMove::new(s.product.clone(), Uom::unit(), dec!(3), input, storage)
                .with_state(MoveState::Draft)
                .with_shipment(shipment.reference()),
        );
        s.store.insert_shipment_in(shipment.clone());

        let out = engine(&s, ReportFormat::Html)
            .execute(&ReportRequest::RestockingList {
                shipments: vec![shipment.id],
            })
            .unwrap();
        let html = String::from_utf8(out.content).unwrap();
        assert!(html.contains("Supplier: Wayne Enterprises"));
        assert!(html.contains("Shelf 9"));
    }

    #[test]
    fn product_ledger_renders_summary() {
        let s = setup();
        let params = ProductLedgerParams {
            products: vec![s.product.id],
            warehouses: vec![s.warehouse.id],
            start_date: NaiveDate::from_ymd_opt(2015, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2015, 6, 30).unwrap(),
        };
        let out = engine(&s, ReportFormat::Html)
            .execute(&ReportRequest::ProductLedger(params))
            .unwrap();
        let html = String::from_utf8(out.content).unwrap();
        assert_eq!(out.title, "Product Ledger");
        assert!(html.contains("Period: 2015-05-01 to 2015-06-30"));
        assert!(html.contains("Opening stock"));
        assert!(html.contains("Lost and Found"));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let s = setup();
        let err = engine(&s, ReportFormat::Pdf)
            .execute(&ReportRequest::PickingList { shipments: vec![] })
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidParameters(_)));
    }

    #[test]
    fn unknown_shipment_is_a_repository_error() {
        let s = setup();
        let err = engine(&s, ReportFormat::Pdf)
            .execute(&ReportRequest::DeliveryNote {
                shipments: vec![ShipmentId::new()],
            })
            .unwrap_err();
        assert!(matches!(err, ReportError::Repository(_)));
    }

    #[test]
    fn ledger_request_is_validated() {
        let s = setup();
        let params = ProductLedgerParams {
            products: vec![s.product.id],
            warehouses: vec![LocationId::new()],
            start_date: NaiveDate::from_ymd_opt(2015, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
        };
        assert!(matches!(
            engine(&s, ReportFormat::Html).ledger(&params),
            Err(ReportError::InvalidParameters(_))
        ));
    }

    #[test]
    fn shipments_are_found_by_sale() {
        let s = setup();
        let found = s.store.shipments_for_sale(s.sale).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, "CS1");
        assert!(s.store.shipments_for_sale(SaleId::new()).unwrap().is_empty());
    }

    #[test]
    fn requests_are_tagged_by_report() {
        let id = ShipmentId::new();
        let json = format!(r#"{{"report":"picking_list","shipments":["{id}"]}}"#);
        let req: ReportRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, ReportRequest::PickingList { shipments: vec![id] });

        let req: ReportRequest = serde_json::from_str(r#"{"report":"items_waiting_shipment"}"#).unwrap();
        assert_eq!(req.kind(), ReportKind::ItemsWaitingShipment);
    }

    #[test]
    fn every_kind_has_a_distinct_file_name() {
        let mut stems: Vec<_> = ReportKind::ALL.iter().map(|k| k.file_stem()).collect();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), ReportKind::ALL.len());
    }
}
