//! Wire shapes for the order endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{
    catalog::models::{ProductId, VariantId},
    orders::models::{OrderId, OrderItemId},
    wire::{loose_decimal, loose_int},
};

/// One order as `/api/orders/me` and `/api/orders/{id}` return it.
///
/// The list endpoint omits `items`; the detail endpoint carries them.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub subtotal: Decimal,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub shipping_fee: Decimal,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub discount_total: Decimal,
    #[serde(default, deserialize_with = "loose_decimal")]
    pub grand_total: Decimal,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemRecord>,
}

/// One line of an order, frozen at checkout time.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRecord {
    pub id: OrderItemId,
    pub product_id: ProductId,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub name: String,
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

/// Response of `POST /api/orders/checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRecord {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}
