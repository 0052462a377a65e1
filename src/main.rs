//! Demo: connect to a product backend, list its products, optionally search.
//!
//! ```bash
//! CATALOG_BASE_URL=http://localhost:5000 RUST_LOG=info cargo run -- "phone"
//! ```

use product_catalog::config::CatalogConfig;
use product_catalog::lifecycle::{setup_tracing, CatalogSystem};
use product_catalog::view::{Confirmation, StaticConfirmer, TracingNotifier};
use std::sync::Arc;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = match std::env::var("CATALOG_CONFIG") {
        Ok(path) => CatalogConfig::from_file(&path).and_then(|c| c.with_env_overrides()),
        Err(_) => CatalogConfig::from_env(),
    }
    .map_err(|e| e.to_string())?;
    info!(base_url = %config.base_url, "Starting product catalog");

    let system = CatalogSystem::connect(
        &config,
        Arc::new(TracingNotifier),
        Arc::new(StaticConfirmer(Confirmation::Rejected)),
    )
    .await
    .map_err(|e| e.to_string())?;

    let state = system.view.snapshot().await.map_err(|e| e.to_string())?;
    for product in &state.products {
        info!(id = %product.id, name = %product.name, price = product.price, "Product");
    }

    if let Some(term) = std::env::args().nth(1) {
        let span = tracing::info_span!("search", %term);
        async {
            let outcome = system.view.search(&term).await.map_err(|e| e.to_string())?;
            let state = system.view.snapshot().await.map_err(|e| e.to_string())?;
            info!(?outcome, count = state.products.len(), "Search finished");
            for product in &state.products {
                info!(id = %product.id, name = %product.name, "Result");
            }
            Ok::<_, String>(())
        }
        .instrument(span)
        .await?;
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    Ok(())
}
