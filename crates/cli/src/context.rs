//! Immutable startup context shared by every command.

use std::sync::Arc;

use tether_db::{init_client, ClientFactory, ClientResult, DbAuthError, ServiceConfig};
use tether_telemetry::{DeployMode, Logger};
use tracing::info;

/// Everything resolved once at startup.
///
/// Built before any command runs and only ever handed out as
/// `Arc<AppContext>`; nothing in it is mutated afterwards.
#[derive(Debug)]
pub struct AppContext<C> {
    pub logger: Logger,
    pub config: ServiceConfig,
    pub client: C,
}

impl<C> AppContext<C> {
    /// Build the context, failing fast when credentials are missing.
    pub fn init<F>(
        config: Result<ServiceConfig, DbAuthError>,
        factory: &F,
        logger: Logger,
    ) -> ClientResult<Arc<Self>>
    where
        F: ClientFactory<Client = C>,
    {
        let (config, client) = init_client(config, factory)?;
        info!(
            mode = logger.mode().as_str(),
            url = config.url(),
            "Startup context ready"
        );
        Ok(Arc::new(Self {
            logger,
            config,
            client,
        }))
    }

    /// Deployment mode the logger was built with.
    pub fn mode(&self) -> DeployMode {
        self.logger.mode()
    }
}
