//! Printable stock reports.
//!
//! Each report queries a [`StockRepository`](stockreport_stock::StockRepository),
//! groups and sorts the moves it needs, renders an HTML template and, for PDF
//! output, hands the HTML to a [`DocumentRenderer`].

pub mod engine;
pub mod error;
pub mod grouping;
pub mod ledger;
pub mod pdf;
pub mod views;
pub mod wizard;

pub use engine::{ReportEngine, ReportFormat, ReportKind, ReportOutput, ReportRequest, ReportSettings};
pub use error::{RenderError, ReportError};
pub use grouping::{MoveGroup, ShipmentMoves, WaitingItem};
pub use ledger::{LedgerCategory, LedgerRecord, LedgerSummary, compute_ledger, product_ledger};
pub use pdf::{DocumentRenderer, PdfOptions, WkhtmltopdfRenderer};
pub use wizard::ProductLedgerParams;
