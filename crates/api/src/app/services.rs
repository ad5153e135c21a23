//! Infrastructure wiring: record store, PDF converter and report engine.

use std::sync::Arc;

use anyhow::Context;

use stockreport_infra::{AppConfig, InMemoryStockStore, OutputFormat, Snapshot};
use stockreport_reports::{
    DocumentRenderer, ReportEngine, ReportFormat, ReportSettings, WkhtmltopdfRenderer,
};
use stockreport_stock::StockRepository;

/// Report engine over type-erased store and converter.
pub type Engine = ReportEngine<Arc<dyn StockRepository>, Arc<dyn DocumentRenderer>>;

pub struct AppServices {
    engine: Engine,
}

impl AppServices {
    pub fn new(
        repo: Arc<dyn StockRepository>,
        renderer: Arc<dyn DocumentRenderer>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            engine: ReportEngine::new(repo, renderer, settings),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

pub fn report_settings(config: &AppConfig) -> ReportSettings {
    ReportSettings {
        company_name: config.company_name.clone(),
        format: match config.output_format {
            OutputFormat::Pdf => ReportFormat::Pdf,
            OutputFormat::Html => ReportFormat::Html,
        },
        page_margin: config.page_margin.clone(),
    }
}

/// Wire services from configuration, loading the stock snapshot when one is configured.
pub fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store = match &config.data_file {
        Some(path) => Snapshot::read(path)
            .with_context(|| format!("failed to load stock snapshot {path}"))?
            .into_store(),
        None => {
            tracing::warn!("no data_file configured; starting with an empty stock store");
            InMemoryStockStore::new()
        }
    };

    let renderer = WkhtmltopdfRenderer::new(&config.wkhtmltopdf_path);
    Ok(AppServices::new(
        Arc::new(store),
        Arc::new(renderer),
        report_settings(config),
    ))
}
