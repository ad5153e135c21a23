use axum::{
    Router,
    routing::{get, post},
};

pub mod ledger;
pub mod reports;
pub mod system;

/// Router for all report endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/reports", get(reports::list_reports).post(reports::generate_report))
        .route("/ledger", post(ledger::product_ledger))
}
