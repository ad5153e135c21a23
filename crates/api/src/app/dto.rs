use serde::Serialize;

use stockreport_reports::ReportKind;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ReportKindResponse {
    pub kind: ReportKind,
    pub name: &'static str,
    pub title: &'static str,
}

impl From<ReportKind> for ReportKindResponse {
    fn from(kind: ReportKind) -> Self {
        Self {
            kind,
            name: kind.report_name(),
            title: kind.title(),
        }
    }
}
