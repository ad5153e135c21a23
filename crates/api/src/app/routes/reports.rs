use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{StatusCode, header},
    response::IntoResponse,
};

use stockreport_reports::{ReportKind, ReportOutput, ReportRequest};

use crate::app::dto::ReportKindResponse;
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn list_reports() -> impl IntoResponse {
    Json(
        ReportKind::ALL
            .into_iter()
            .map(ReportKindResponse::from)
            .collect::<Vec<_>>(),
    )
}

pub async fn generate_report(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<ReportRequest>,
) -> axum::response::Response {
    // Rendering may shell out to the PDF converter.
    let result = tokio::task::spawn_blocking(move || services.engine().execute(&request)).await;

    match result {
        Ok(Ok(output)) => document_response(output),
        Ok(Err(e)) => {
            tracing::warn!("report generation failed: {e}");
            errors::report_error_to_response(e)
        }
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string()),
    }
}

fn document_response(output: ReportOutput) -> axum::response::Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, output.format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", output.filename),
            ),
            (header::HeaderName::from_static("x-report-title"), output.title),
        ],
        output.content,
    )
        .into_response()
}
