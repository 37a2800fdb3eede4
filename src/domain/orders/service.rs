//! Order endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::ApiClient,
    domain::orders::{
        errors::OrdersServiceError,
        models::{CheckoutReceipt, Order, OrderId},
        records::{CheckoutRecord, OrderRecord},
    },
};

/// Order operations backed by the remote API.
#[derive(Debug)]
pub struct HttpOrdersService {
    api: Arc<ApiClient>,
}

impl HttpOrdersService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    async fn checkout(&self) -> Result<CheckoutReceipt, OrdersServiceError> {
        let record: CheckoutRecord = self.api.post_empty("/api/orders/checkout").await?;

        Ok(record.into())
    }

    async fn my_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let records: Vec<OrderRecord> = self.api.get("/api/orders/me").await?;

        Ok(records.into_iter().map(Order::from).collect())
    }

    async fn order_detail(&self, order: OrderId) -> Result<Order, OrdersServiceError> {
        let record: OrderRecord = self.api.get(&format!("/api/orders/{order}")).await?;

        Ok(record.into())
    }
}

/// Orders of the signed-in user.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turns the server-side cart into an order.
    ///
    /// The body is empty: the server checks out whatever the signed-in
    /// user's cart holds, clears that cart, and answers with the new order
    /// id. Clearing the client-held snapshot afterwards is the caller's
    /// job.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::EmptyCart`] when there is nothing to
    /// check out, or another [`OrdersServiceError`] if the request fails.
    async fn checkout(&self) -> Result<CheckoutReceipt, OrdersServiceError>;

    /// All orders of the signed-in user, newest first, without line items.
    ///
    /// # Errors
    ///
    /// Returns an [`OrdersServiceError`] if the request fails.
    async fn my_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// One order with its frozen line items.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] for an unknown or foreign
    /// order, or another [`OrdersServiceError`] if the request fails.
    async fn order_detail(&self, order: OrderId) -> Result<Order, OrdersServiceError>;
}
