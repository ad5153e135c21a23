use std::sync::Arc;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = stockreport_infra::load_config().context("failed to load configuration")?;
    stockreport_observability::init_with(&config.log_level, config.log_json);

    let services = stockreport_api::app::services::build_services(&config)?;
    let app = stockreport_api::app::build_app(Arc::new(services));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
