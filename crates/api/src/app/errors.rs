use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockreport_reports::{RenderError, ReportError};
use stockreport_stock::RepositoryError;

pub fn report_error_to_response(err: ReportError) -> axum::response::Response {
    match err {
        ReportError::InvalidParameters(e) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string())
        }
        ReportError::Repository(e @ RepositoryError::NotFound { .. }) => {
            json_error(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        ReportError::Repository(e @ RepositoryError::Backend(_)) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        ReportError::Render(e @ RenderError::Template(_)) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "template_error", e.to_string())
        }
        ReportError::Render(e) => json_error(StatusCode::BAD_GATEWAY, "render_error", e.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
