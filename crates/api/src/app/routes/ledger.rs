use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use stockreport_reports::ProductLedgerParams;

use crate::app::errors;
use crate::app::services::AppServices;

/// Ledger records as JSON, without rendering a document.
pub async fn product_ledger(
    Extension(services): Extension<Arc<AppServices>>,
    Json(params): Json<ProductLedgerParams>,
) -> axum::response::Response {
    match services.engine().ledger(&params) {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::report_error_to_response(e),
    }
}
