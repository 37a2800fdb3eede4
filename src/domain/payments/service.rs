//! Payment endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::{
    api::{ApiClient, EventStream},
    domain::{
        orders::models::OrderId,
        payments::{
            errors::PaymentsServiceError,
            models::{PaymentStatus, PaymentSummary, QrSession},
            records::{PaymentMeRecord, QrRecord, StatusRecord},
        },
    },
};

/// Payment operations backed by the remote API.
#[derive(Debug)]
pub struct HttpPaymentsService {
    api: Arc<ApiClient>,
}

impl HttpPaymentsService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PaymentsService for HttpPaymentsService {
    async fn payment_me(&self) -> Result<PaymentSummary, PaymentsServiceError> {
        let record: PaymentMeRecord = self.api.get("/api/payment/me").await?;

        Ok(record.into())
    }

    async fn create_qr(&self) -> Result<QrSession, PaymentsServiceError> {
        let record: QrRecord = self.api.post_empty("/api/payment/scb/qr").await?;

        Ok(record.into())
    }

    async fn status(&self, order: OrderId) -> Result<PaymentStatus, PaymentsServiceError> {
        let record: StatusRecord = self
            .api
            .get_with_query("/api/payment/scb/status", &[("orderId", order.to_string())])
            .await?;

        Ok(PaymentStatus::parse(&record.status))
    }

    async fn status_events(&self, order: OrderId) -> Result<EventStream, PaymentsServiceError> {
        Ok(self
            .api
            .events(&format!("/api/payment/events/{order}"))
            .await?)
    }

    async fn simulate_paid(&self, order: OrderId) -> Result<(), PaymentsServiceError> {
        self.api
            .post_discard(
                "/api/payment/scb/simulate-paid",
                &SimulatePaidRequest { order_id: order },
            )
            .await?;

        Ok(())
    }
}

/// Payment for the order currently due.
#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// The order awaiting payment, with its frozen lines and totals.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentsServiceError::NothingDue`] when no order awaits
    /// payment, or another [`PaymentsServiceError`] if the request fails.
    async fn payment_me(&self) -> Result<PaymentSummary, PaymentsServiceError>;

    /// Asks the gateway for a QR session covering the due order.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentsServiceError::NothingDue`] when no order awaits
    /// payment, or another [`PaymentsServiceError`] if the request fails.
    async fn create_qr(&self) -> Result<QrSession, PaymentsServiceError>;

    /// One-shot status query, the poll half of the watch.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentsServiceError`] if the request fails.
    async fn status(&self, order: OrderId) -> Result<PaymentStatus, PaymentsServiceError>;

    /// Opens the push half of the watch: a server-sent event stream of
    /// status payloads for one order.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentsServiceError`] if the stream cannot be opened.
    async fn status_events(&self, order: OrderId) -> Result<EventStream, PaymentsServiceError>;

    /// Marks the order paid without a real bank transfer. Backends only
    /// expose this outside production.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentsServiceError`] if the request fails.
    async fn simulate_paid(&self, order: OrderId) -> Result<(), PaymentsServiceError>;
}

#[derive(Debug, Serialize)]
struct SimulatePaidRequest {
    #[serde(rename = "orderId")]
    order_id: OrderId,
}
