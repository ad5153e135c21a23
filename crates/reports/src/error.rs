use thiserror::Error;

use stockreport_core::DomainError;
use stockreport_stock::RepositoryError;

/// Failure turning report HTML into a document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf converter exited with {status}: {stderr}")]
    Converter { status: String, stderr: String },

    #[error("pdf converter produced no output")]
    EmptyOutput,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    InvalidParameters(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<askama::Error> for ReportError {
    fn from(err: askama::Error) -> Self {
        ReportError::Render(RenderError::Template(err))
    }
}
