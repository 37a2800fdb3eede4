//! Client-held cart state.

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockWriteGuard},
};

use crate::{
    auth::UserIdentity,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{CartItemId, CartSnapshot},
            service::CartsApi,
        },
        catalog::models::VariantId,
    },
};

#[derive(Debug, Default)]
struct CartState {
    snapshot: Option<CartSnapshot>,
    drawer_open: bool,
}

/// Holder of the last-known server cart.
///
/// The store is the sole writer of the snapshot: every mutation goes to the
/// server and the response body replaces the held snapshot wholesale. There
/// is no client-side merging and no local recomputation of totals. A failed
/// mutation leaves the previous snapshot in place. Mutations are not
/// serialized against each other; when two race, the later server response
/// wins.
pub struct CartStore {
    api: Arc<dyn CartsApi>,
    state: RwLock<CartState>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("api", &"<CartsApi>")
            .field("state", &self.state)
            .finish()
    }
}

impl CartStore {
    #[must_use]
    pub fn new(api: Arc<dyn CartsApi>) -> Self {
        Self {
            api,
            state: RwLock::new(CartState::default()),
        }
    }

    /// Fetches the cart and replaces the snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the fetch fails; the held
    /// snapshot is left as it was.
    pub async fn refresh(&self) -> Result<CartSnapshot, CartsServiceError> {
        let snapshot = self.api.fetch_cart().await?;

        self.write().snapshot = Some(snapshot.clone());

        Ok(snapshot)
    }

    /// Adds a variant to the cart and opens the drawer.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the server rejects the add; the
    /// held snapshot is left as it was.
    pub async fn add(
        &self,
        variant: VariantId,
        qty: i64,
    ) -> Result<CartSnapshot, CartsServiceError> {
        let snapshot = self.api.add_item(variant, qty).await?;

        let mut state = self.write();

        state.snapshot = Some(snapshot.clone());
        state.drawer_open = true;

        Ok(snapshot)
    }

    /// Sets the quantity of one line.
    ///
    /// Quantities below one are rejected here, before any network traffic;
    /// removing a line is an explicit [`Self::remove`], not a zero write.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::QuantityBelowOne`] for a quantity under
    /// one, or the server's rejection otherwise.
    pub async fn set_quantity(
        &self,
        item: CartItemId,
        qty: i64,
    ) -> Result<CartSnapshot, CartsServiceError> {
        if qty < 1 {
            return Err(CartsServiceError::QuantityBelowOne);
        }

        let snapshot = self.api.set_item_quantity(item, qty).await?;

        self.write().snapshot = Some(snapshot.clone());

        Ok(snapshot)
    }

    /// Removes one line.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the server rejects the removal.
    pub async fn remove(&self, item: CartItemId) -> Result<CartSnapshot, CartsServiceError> {
        let snapshot = self.api.remove_item(item).await?;

        self.write().snapshot = Some(snapshot.clone());

        Ok(snapshot)
    }

    /// Empties the cart server-side.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the server rejects the clear.
    pub async fn clear(&self) -> Result<CartSnapshot, CartsServiceError> {
        let snapshot = self.api.clear_cart().await?;

        self.write().snapshot = Some(snapshot.clone());

        Ok(snapshot)
    }

    /// Drops the held snapshot and closes the drawer. No network traffic.
    pub fn clear_local(&self) {
        let mut state = self.write();

        state.snapshot = None;
        state.drawer_open = false;
    }

    /// Reacts to a session change: refresh for a signed-in user, clear
    /// locally for a signed-out one. No authenticated request is ever
    /// issued while signed out, and a failed refresh stays quiet.
    pub async fn sync_session(&self, identity: Option<&UserIdentity>) {
        match identity {
            Some(user) => {
                if let Err(err) = self.refresh().await {
                    tracing::debug!(user = %user.id, error = %err, "cart refresh after sign-in failed");
                }
            }
            None => self.clear_local(),
        }
    }

    /// The held snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<CartSnapshot> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .clone()
    }

    /// Quantity of a variant currently in the cart.
    #[must_use]
    pub fn quantity_of(&self, variant: VariantId) -> i64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .as_ref()
            .map_or(0, |snapshot| snapshot.quantity_of(variant))
    }

    /// Total quantity as the server last reported it.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .as_ref()
            .map_or(0, |snapshot| snapshot.summary.total_qty)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .drawer_open
    }

    pub fn open(&self) {
        self.write().drawer_open = true;
    }

    pub fn close(&self) {
        self.write().drawer_open = false;
    }

    pub fn toggle(&self) {
        let mut state = self.write();

        state.drawer_open = !state.drawer_open;
    }

    fn write(&self) -> RwLockWriteGuard<'_, CartState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
