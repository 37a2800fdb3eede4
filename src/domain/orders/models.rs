//! Orders as the client works with them.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        catalog::models::{ProductId, VariantId},
        orders::records::{CheckoutRecord, OrderItemRecord, OrderRecord},
        wire::parse_timestamp,
    },
    ids::TypedId,
};

/// Identifier of an [`Order`].
pub type OrderId = TypedId<Order>;

/// Identifier of an [`OrderItem`].
pub type OrderItemId = TypedId<OrderItem>;

/// Lifecycle state of an order.
///
/// States this client does not know are kept verbatim rather than dropped;
/// the backend grows states faster than clients ship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
    Shipped,
    Other(String),
}

impl OrderStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "PAID" => Self::Paid,
            "CANCELLED" => Self::Cancelled,
            "SHIPPED" => Self::Shipped,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Whether the pay flow still applies to the order.
    #[must_use]
    pub const fn is_payable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Paid => write!(f, "PAID"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Shipped => write!(f, "SHIPPED"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

/// One order, with line items when the detail endpoint supplied them.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub customer_name: Option<String>,
    pub items: Vec<OrderItem>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            status: OrderStatus::parse(&record.status),
            subtotal: record.subtotal,
            shipping_fee: record.shipping_fee,
            discount_total: record.discount_total,
            grand_total: record.grand_total,
            created_at: record.created_at.as_deref().and_then(parse_timestamp),
            updated_at: record.updated_at.as_deref().and_then(parse_timestamp),
            customer_name: record.customer_name,
            items: record.items.into_iter().map(OrderItem::from).collect(),
        }
    }
}

/// One line of an order. Prices and names are frozen copies taken at
/// checkout, not live references into the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub name: String,
    pub shade_name: Option<String>,
    pub unit_price: Decimal,
    pub qty: i64,
    pub line_total: Decimal,
    pub image_url: Option<String>,
}

impl From<OrderItemRecord> for OrderItem {
    fn from(record: OrderItemRecord) -> Self {
        Self {
            id: record.id,
            product_id: record.product_id,
            variant_id: record.variant_id,
            name: record.name,
            shade_name: record.shade_name,
            unit_price: record.unit_price,
            qty: record.qty,
            line_total: record.line_total,
            image_url: record.image_url,
        }
    }
}

/// What checkout hands back: the id of the order it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
}

impl From<CheckoutRecord> for CheckoutReceipt {
    fn from(record: CheckoutRecord) -> Self {
        Self {
            order_id: record.order_id,
        }
    }
}
