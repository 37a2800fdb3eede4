//! Wire shapes for the payment endpoints.
//!
//! Unlike the rest of the API these endpoints speak `camelCase` throughout.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{
    orders::models::{OrderId, OrderItemId},
    wire::{loose_decimal, loose_int},
};

/// Response of `GET /api/payment/me`: the order currently awaiting
/// payment, with its frozen lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMeRecord {
    pub order_id: OrderId,
    #[serde(default)]
    pub items: Vec<PaymentLineRecord>,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub subtotal: Decimal,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub shipping_fee: Decimal,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub grand_total: Decimal,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub scb_transaction_id: Option<String>,
    #[serde(default)]
    pub scb_qr_id: Option<String>,
}

/// One line on the payment summary. Prices arrive as pre-formatted
/// strings here, not numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLineRecord {
    pub id: OrderItemId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shade_name: Option<String>,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub unit_price: Decimal,
    #[serde(default, deserialize_with = "loose_int")]
    pub qty: i64,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub line_total: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Response of `POST /api/payment/scb/qr`.
///
/// The gateway answers in one of two generations: v2 hosts a rendered
/// image and sends `qrImageUrl`; v1 sends the raw EMV payload as
/// `qrRawData`. Exactly one of the two is expected to be present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRecord {
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub amount: Decimal,
    #[serde(default)]
    pub qr_image_url: Option<String>,
    #[serde(default)]
    pub qr_raw_data: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Status payload shared by the poll endpoint and the push events.
/// Anything beside `status` is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRecord {
    #[serde(default)]
    pub status: String,
}
