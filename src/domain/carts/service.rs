//! Cart API calls.
//!
//! Every mutation answers with the full snapshot; callers replace, never
//! merge.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use mockall::automock;
use reqwest::StatusCode;
use serde::Serialize;

use crate::{
    api::{ApiClient, ApiError},
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{CartItemId, CartSnapshot},
            records::CartSnapshotRecord,
        },
        catalog::models::VariantId,
    },
};

#[derive(Debug)]
pub struct HttpCartsApi {
    api: Arc<ApiClient>,
}

impl HttpCartsApi {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CartsApi for HttpCartsApi {
    async fn fetch_cart(&self) -> Result<CartSnapshot, CartsServiceError> {
        let record: CartSnapshotRecord = self.api.get("/api/cart/me").await?;

        Ok(record.into())
    }

    async fn add_item(
        &self,
        variant: VariantId,
        qty: i64,
    ) -> Result<CartSnapshot, CartsServiceError> {
        let record: CartSnapshotRecord = self
            .api
            .post("/api/cart/items", &AddItemRequest { variant_id: variant, qty })
            .await?;

        Ok(record.into())
    }

    async fn set_item_quantity(
        &self,
        item: CartItemId,
        qty: i64,
    ) -> Result<CartSnapshot, CartsServiceError> {
        let record: CartSnapshotRecord = self
            .api
            .patch(&format!("/api/cart/items/{item}"), &SetQtyRequest { qty })
            .await?;

        Ok(record.into())
    }

    async fn remove_item(&self, item: CartItemId) -> Result<CartSnapshot, CartsServiceError> {
        let record: CartSnapshotRecord =
            self.api.delete(&format!("/api/cart/items/{item}")).await?;

        Ok(record.into())
    }

    async fn clear_cart(&self) -> Result<CartSnapshot, CartsServiceError> {
        match self.api.post_empty::<CartSnapshotRecord>("/api/cart/clear").await {
            Ok(record) => Ok(record.into()),
            // Older deployments have no clear endpoint; fall back to
            // deleting the lines one by one.
            Err(ApiError::Status { status, .. })
                if status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED =>
            {
                let current = self.fetch_cart().await?;

                try_join_all(current.items.iter().map(|item| {
                    let path = format!("/api/cart/items/{}", item.id);

                    async move { self.api.delete::<CartSnapshotRecord>(&path).await }
                }))
                .await?;

                self.fetch_cart().await
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[automock]
#[async_trait]
pub trait CartsApi: Send + Sync {
    /// Fetches the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the request fails.
    async fn fetch_cart(&self) -> Result<CartSnapshot, CartsServiceError>;

    /// Adds `qty` of a variant; returns the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the server rejects the add.
    async fn add_item(
        &self,
        variant: VariantId,
        qty: i64,
    ) -> Result<CartSnapshot, CartsServiceError>;

    /// Sets the quantity of one line; returns the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the server rejects the write.
    async fn set_item_quantity(
        &self,
        item: CartItemId,
        qty: i64,
    ) -> Result<CartSnapshot, CartsServiceError>;

    /// Removes one line; returns the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the server rejects the removal.
    async fn remove_item(&self, item: CartItemId) -> Result<CartSnapshot, CartsServiceError>;

    /// Empties the cart server-side; returns the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CartsServiceError`] if the server rejects the clear.
    async fn clear_cart(&self) -> Result<CartSnapshot, CartsServiceError>;
}

#[derive(Debug, Serialize)]
struct AddItemRequest {
    variant_id: VariantId,
    qty: i64,
}

#[derive(Debug, Serialize)]
struct SetQtyRequest {
    qty: i64,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn every_mutation_returns_the_full_snapshot() -> TestResult {
        let ctx = TestContext::signed_in().await;

        ctx.stub.stock_variant(42, 10, "259.00");
        ctx.stub.stock_variant(51, 10, "390.00");

        let after_add = ctx.carts_api.add_item(VariantId::new(42), 2).await?;
        assert_eq!(after_add.summary.total_qty, 2);

        let after_second = ctx.carts_api.add_item(VariantId::new(51), 1).await?;
        assert_eq!(after_second.summary.total_qty, 3);

        let line = after_second
            .items
            .iter()
            .find(|item| item.variant_id == Some(VariantId::new(42)))
            .ok_or("line for variant 42 should exist")?;

        let after_set = ctx.carts_api.set_item_quantity(line.id, 5).await?;
        assert_eq!(after_set.quantity_of(VariantId::new(42)), 5);

        let after_remove = ctx.carts_api.remove_item(line.id).await?;
        assert_eq!(after_remove.quantity_of(VariantId::new(42)), 0);
        assert_eq!(after_remove.summary.total_qty, 1);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_falls_back_to_per_line_deletes() -> TestResult {
        let ctx = TestContext::signed_in().await;

        ctx.stub.stock_variant(42, 10, "259.00");
        ctx.stub.stock_variant(51, 10, "390.00");
        ctx.stub.disable_clear_endpoint();

        ctx.carts_api.add_item(VariantId::new(42), 2).await?;
        ctx.carts_api.add_item(VariantId::new(51), 1).await?;

        let cleared = ctx.carts_api.clear_cart().await?;

        assert!(cleared.is_empty());
        assert!(ctx.stub.request_count("DELETE", "/api/cart/items") >= 2);

        Ok(())
    }
}
