//! App Context

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{
    api::{ApiClient, ApiError},
    auth::{AuthService, HttpAuthService, SessionStore, SessionStoreError, StoredSession, TokenCell},
    config::Config,
    domain::{
        carts::{CartStore, HttpCartsApi},
        catalog::{CatalogService, HttpCatalogService},
        orders::{HttpOrdersService, OrdersService, OrdersServiceError, models::CheckoutReceipt},
        payments::{HttpPaymentsService, PaymentsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build the http client")]
    Client(#[source] ApiError),
}

/// Wired-up services sharing one HTTP client and one token cell.
#[derive(Clone)]
pub struct StorefrontContext {
    pub auth: Arc<dyn AuthService>,
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<CartStore>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub tokens: Arc<TokenCell>,
    pub sessions: SessionStore,
    startup_generation: u64,
}

impl fmt::Debug for StorefrontContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorefrontContext")
            .field("carts", &self.carts)
            .field("tokens", &self.tokens)
            .field("sessions", &self.sessions)
            .field("startup_generation", &self.startup_generation)
            .finish_non_exhaustive()
    }
}

impl StorefrontContext {
    /// Build the client context from configuration, resuming a persisted
    /// session when one exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, AppInitError> {
        let sessions = SessionStore::new(config.session.session_path());

        // An unreadable session file must not brick the binary, or there
        // would be no way to sign in again and overwrite it.
        let stored = match sessions.load() {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "stored session unreadable, starting signed out");
                None
            }
        };

        let tokens = Arc::new(match stored {
            Some(session) => TokenCell::with_token(session.access_token),
            None => TokenCell::new(),
        });

        let api = Arc::new(
            ApiClient::new(&config.api, Arc::clone(&tokens)).map_err(AppInitError::Client)?,
        );

        Ok(Self::from_parts(
            Arc::new(HttpAuthService::new(
                Arc::clone(&api),
                Arc::clone(&tokens),
                sessions.clone(),
            )),
            Arc::new(HttpCatalogService::new(Arc::clone(&api))),
            Arc::new(CartStore::new(Arc::new(HttpCartsApi::new(Arc::clone(
                &api,
            ))))),
            Arc::new(HttpOrdersService::new(Arc::clone(&api))),
            Arc::new(HttpPaymentsService::new(api)),
            tokens,
            sessions,
        ))
    }

    /// Assemble a context from already-built services.
    #[must_use]
    pub fn from_parts(
        auth: Arc<dyn AuthService>,
        catalog: Arc<dyn CatalogService>,
        carts: Arc<CartStore>,
        orders: Arc<dyn OrdersService>,
        payments: Arc<dyn PaymentsService>,
        tokens: Arc<TokenCell>,
        sessions: SessionStore,
    ) -> Self {
        let startup_generation = tokens.generation();

        Self {
            auth,
            catalog,
            carts,
            orders,
            payments,
            tokens,
            sessions,
            startup_generation,
        }
    }

    /// Places an order from the current cart.
    ///
    /// Refuses locally while the held snapshot is empty, so a cart known
    /// to hold nothing costs no request. On success the local cart is
    /// cleared at once, then refreshed so the server stays authoritative;
    /// a failed checkout leaves the held snapshot as it was.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::EmptyCart`] for an empty or unknown
    /// cart, or the server's rejection otherwise.
    pub async fn place_order(&self) -> Result<CheckoutReceipt, OrdersServiceError> {
        if self.carts.snapshot().is_none_or(|cart| cart.is_empty()) {
            return Err(OrdersServiceError::EmptyCart);
        }

        let receipt = self.orders.checkout().await?;

        self.carts.clear_local();

        if let Err(err) = self.carts.refresh().await {
            tracing::debug!(order = %receipt.order_id, error = %err, "cart refresh after checkout failed");
        }

        Ok(receipt)
    }

    /// Writes a transparently refreshed access token back to the session
    /// file, so the next invocation starts from the newer token. A cell
    /// that was cleared (the refresh credential died) clears the file.
    ///
    /// # Errors
    ///
    /// Returns an error when the session file cannot be read or written.
    pub fn persist_refreshed_token(&self) -> Result<(), SessionStoreError> {
        if self.tokens.generation() == self.startup_generation {
            return Ok(());
        }

        match (self.tokens.current(), self.sessions.load()?) {
            (Some(token), Some(stored)) => {
                self.sessions.save(&StoredSession::new(token, stored.user))
            }
            (Some(_), None) => Ok(()),
            (None, _) => self.sessions.clear(),
        }
    }
}
