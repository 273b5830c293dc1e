use std::sync::Arc;

use anyhow::Context;

use storefront_api::app::{self, services::AppServices};
use storefront_api::config::ServiceConfig;
use storefront_catalog::CatalogStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = ServiceConfig::from_env()?;
    tracing::info!(catalog_path = %config.catalog_path.display(), "starting product catalog service");

    // The service cannot answer anything without an initial catalog.
    let catalog = CatalogStore::arc();
    catalog
        .load_from_path(&config.catalog_path)
        .with_context(|| format!("failed to load catalog from {}", config.catalog_path.display()))?;

    let services = Arc::new(AppServices::new(catalog, config.catalog_path.clone()));
    if let Some(every) = config.reload_interval {
        tracing::info!(interval_secs = every.as_secs(), "periodic catalog reload enabled");
        app::services::spawn_periodic_reload(Arc::clone(&services), every);
    }

    let router = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("product catalog service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
