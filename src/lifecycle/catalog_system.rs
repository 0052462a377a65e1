use crate::config::CatalogConfig;
use crate::service::{HttpProductService, ProductApi, ServiceError};
use crate::view::{Confirmer, Notifier, Outcome, ViewActor, ViewClient, ViewContext, ViewError, ViewOptions};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Errors raised while starting or stopping the catalog.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Failed to build product service: {0}")]
    Service(#[from] ServiceError),

    #[error("View unavailable: {0}")]
    View(#[from] ViewError),

    #[error("View task failed: {0}")]
    TaskFailed(String),
}

/// The running product catalog: one view actor wired to a product service.
///
/// # Example
///
/// ```no_run
/// use product_catalog::config::CatalogConfig;
/// use product_catalog::lifecycle::CatalogSystem;
/// use product_catalog::view::{Confirmation, StaticConfirmer, TracingNotifier};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CatalogConfig::from_env()?;
/// let system = CatalogSystem::connect(
///     &config,
///     Arc::new(TracingNotifier),
///     Arc::new(StaticConfirmer(Confirmation::Accepted)),
/// )
/// .await?;
///
/// let state = system.view.snapshot().await?;
/// println!("{} products", state.products.len());
/// system.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct CatalogSystem {
    /// Handle for driving the product screen.
    pub view: ViewClient,

    handle: JoinHandle<()>,
}

impl CatalogSystem {
    /// Starts the view actor against `api` and performs the initial load.
    ///
    /// A failed initial load does not fail startup; the view just starts empty.
    pub async fn start(
        config: &CatalogConfig,
        api: Arc<dyn ProductApi>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Result<Self, SystemError> {
        let (actor, view) = ViewActor::new(ViewOptions::from(config));
        let handle = tokio::spawn(actor.run(ViewContext::new(api, notifier, confirmer)));

        match view.load().await? {
            Outcome::Applied => info!("Initial load complete"),
            other => warn!(outcome = ?other, "Initial load did not apply"),
        }

        Ok(Self { view, handle })
    }

    /// Builds the HTTP service from `config`, then [`start`](Self::start)s.
    pub async fn connect(
        config: &CatalogConfig,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Result<Self, SystemError> {
        let api = HttpProductService::new(config)?;
        info!(root = %api.resource_root(), "Connecting to product backend");
        Self::start(config, Arc::new(api), notifier, confirmer).await
    }

    /// Drops this system's view handle and waits for the actor to finish.
    ///
    /// Other clones of the view keep the actor alive; this waits for them too.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down catalog...");
        drop(self.view);

        if let Err(e) = self.handle.await {
            error!("View task failed: {:?}", e);
            return Err(SystemError::TaskFailed(format!("{e:?}")));
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}
