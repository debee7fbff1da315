//! Runtime container.
//!
//! Owns the authenticator and the gateway for the lifetime of the process.
//! The gateway's connection pool is acquired in [`StorefrontRuntime::start`]
//! and released in [`StorefrontRuntime::shutdown`].

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};

use sf_01_session_auth::{IdentityContext, IdentityError, SessionAuthApi, SessionAuthenticator};
use sf_02_commerce_gateway::{
    CommerceApi, CommerceGateway, GatewayError, HttpTransport, OrderCreateRequest, OrderRecord,
    ReqwestTransport,
};

use crate::attribution::attribute_order;
use crate::config::{ConfigError, StorefrontConfig};

/// Failure of a storefront flow.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("authentication failed: {0}")]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Storefront runtime.
pub struct StorefrontRuntime<T: HttpTransport = ReqwestTransport> {
    authenticator: Arc<SessionAuthenticator>,
    gateway: Arc<CommerceGateway<T>>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl StorefrontRuntime<ReqwestTransport> {
    /// Validate configuration and open the gateway's connection pool.
    pub fn start(config: &StorefrontConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let gateway = CommerceGateway::connect(&config.gateway)?;
        Self::assemble(config, gateway)
    }
}

impl<T: HttpTransport> StorefrontRuntime<T> {
    /// Assemble a runtime over an existing transport.
    pub fn with_transport(config: &StorefrontConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let gateway = CommerceGateway::new(&config.gateway, transport)?;
        Self::assemble(config, gateway)
    }

    fn assemble(
        config: &StorefrontConfig,
        gateway: CommerceGateway<T>,
    ) -> Result<Self, ConfigError> {
        let authenticator =
            SessionAuthenticator::new(config.bot_token.clone(), config.auth.clone())
                .map_err(|e| ConfigError::Auth(e.to_string()))?;
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        info!(
            api_root = gateway.api_root(),
            max_age_secs = config.auth.max_age_secs,
            "Storefront runtime started"
        );

        Ok(Self {
            authenticator: Arc::new(authenticator),
            gateway: Arc::new(gateway),
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn authenticator(&self) -> Arc<SessionAuthenticator> {
        Arc::clone(&self.authenticator)
    }

    pub fn gateway(&self) -> Arc<CommerceGateway<T>> {
        Arc::clone(&self.gateway)
    }

    /// Resolves the acting user of a signed session payload.
    pub fn authenticate(&self, payload: &str) -> Result<IdentityContext, IdentityError> {
        self.authenticator.authenticate(payload).inspect_err(|e| {
            warn!(reason = %e, "Session authentication rejected");
        })
    }

    /// Authenticate, attribute the order to the session user, and create it.
    pub async fn place_order(
        &self,
        payload: &str,
        order: OrderCreateRequest,
    ) -> Result<OrderRecord, StorefrontError> {
        let identity = self.authenticate(payload)?;
        let order = attribute_order(order, &identity);
        let record = self.gateway.create_order(&order).await?;
        info!(
            order_id = record.id,
            user_id = identity.user_id(),
            "Order placed"
        );
        Ok(record)
    }

    /// Receiver that flips to `true` once shutdown starts.
    pub fn shutdown_signal(&self) -> tokio::sync::watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Wait for `signal`, then shut down.
    ///
    /// A failing signal source is logged and still leads to shutdown.
    pub async fn run_until<F>(&self, signal: F)
    where
        F: Future<Output = std::io::Result<()>>,
    {
        if let Err(e) = signal.await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        self.shutdown().await;
    }

    /// Signal shutdown and release the connection pool.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        self.gateway.close().await;

        info!("Shutdown complete");
    }
}
