//! Payment-side view of an order and the watch vocabulary.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::{
    orders::models::{OrderId, OrderItemId, OrderStatus},
    payments::records::{PaymentLineRecord, PaymentMeRecord, QrRecord},
    wire::parse_timestamp,
};

/// The order currently awaiting payment, as the payment endpoints see it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSummary {
    pub order_id: OrderId,
    pub items: Vec<PaymentLine>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub grand_total: Decimal,
    pub status: OrderStatus,
    pub scb_transaction_id: Option<String>,
    pub scb_qr_id: Option<String>,
}

impl From<PaymentMeRecord> for PaymentSummary {
    fn from(record: PaymentMeRecord) -> Self {
        Self {
            order_id: record.order_id,
            items: record.items.into_iter().map(PaymentLine::from).collect(),
            subtotal: record.subtotal,
            shipping_fee: record.shipping_fee,
            grand_total: record.grand_total,
            status: OrderStatus::parse(&record.status),
            scb_transaction_id: record.scb_transaction_id,
            scb_qr_id: record.scb_qr_id,
        }
    }
}

/// One frozen line on the payment summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLine {
    pub id: OrderItemId,
    pub name: Option<String>,
    pub shade_name: Option<String>,
    pub unit_price: Decimal,
    pub qty: i64,
    pub line_total: Decimal,
    pub image_url: Option<String>,
}

impl From<PaymentLineRecord> for PaymentLine {
    fn from(record: PaymentLineRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            shade_name: record.shade_name,
            unit_price: record.unit_price,
            qty: record.qty,
            line_total: record.line_total,
            image_url: record.image_url,
        }
    }
}

/// The scannable code of a QR session, in whichever form the gateway
/// speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrCode {
    /// v2 gateways host a rendered image.
    Image { url: String },
    /// v1 gateways send the raw EMV payload for client-side rendering.
    Raw { payload: String },
}

/// An open QR payment session for one order.
#[derive(Debug, Clone, PartialEq)]
pub struct QrSession {
    pub order_id: OrderId,
    pub amount: Decimal,
    pub code: Option<QrCode>,
    pub transaction_id: Option<String>,
    pub expires_at: Option<Timestamp>,
}

impl From<QrRecord> for QrSession {
    fn from(record: QrRecord) -> Self {
        // An image wins when a gateway sends both forms.
        let code = record
            .qr_image_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| QrCode::Image { url })
            .or_else(|| {
                record
                    .qr_raw_data
                    .filter(|payload| !payload.trim().is_empty())
                    .map(|payload| QrCode::Raw { payload })
            });

        Self {
            order_id: record.order_id,
            amount: record.amount,
            code,
            transaction_id: record.transaction_id,
            expires_at: record.expires_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// A status observation from either watch channel.
///
/// `Paid` and `Success` both mean settled money; which one arrives
/// depends on the gateway generation. Everything unknown is kept
/// verbatim and treated as "still waiting".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Success,
    Pending,
    Timeout,
    Cancelled,
    Other(String),
}

impl PaymentStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PAID" => Self::Paid,
            "SUCCESS" => Self::Success,
            "PENDING" => Self::Pending,
            "TIMEOUT" => Self::Timeout,
            "CANCELLED" => Self::Cancelled,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Whether the money is settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::Success)
    }

    /// Whether the session ended without payment.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Timeout | Self::Cancelled)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "PAID"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Pending => write!(f, "PENDING"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

/// Which channel produced an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchChannel {
    Push,
    Poll,
}

impl fmt::Display for WatchChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Poll => write!(f, "poll"),
        }
    }
}

/// How a payment watch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The order was paid, first observed on `via`.
    Paid { via: WatchChannel },
    /// The QR session ran out or the order was cancelled before payment.
    Expired { status: PaymentStatus },
}
