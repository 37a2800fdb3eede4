//! Cart wire records.
//!
//! Every cart endpoint answers with the full snapshot; these records mirror
//! that body, loose keys included.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{
    carts::models::CartItemId,
    catalog::models::VariantId,
    wire,
};

/// The `/api/cart/me` body and the body of every cart mutation response.
#[derive(Debug, Clone, Deserialize)]
pub struct CartSnapshotRecord {
    #[serde(default)]
    pub items: Vec<CartItemRecord>,

    #[serde(default)]
    pub summary: Option<CartSummaryRecord>,
}

/// One cart line as the server returns it, including the denormalized
/// display snapshot taken at fetch time.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemRecord {
    pub id: CartItemId,

    #[serde(default, alias = "variantId", alias = "v_id", alias = "vid")]
    pub variant_id: Option<VariantId>,

    #[serde(
        default,
        alias = "quantity",
        alias = "qty_ordered",
        alias = "amount",
        deserialize_with = "wire::loose_int"
    )]
    pub qty: i64,

    #[serde(default, alias = "pname", alias = "title")]
    pub name: Option<String>,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default, alias = "shadeName")]
    pub shade_name: Option<String>,

    #[serde(default, alias = "shadeCode")]
    pub shade_code: Option<String>,

    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,

    #[serde(
        default,
        alias = "priceNow",
        alias = "unit_price",
        deserialize_with = "wire::loose_decimal_opt"
    )]
    pub price_now: Option<Decimal>,

    #[serde(default, alias = "stockQty", deserialize_with = "wire::loose_int_opt")]
    pub stock_qty: Option<i64>,
}

/// Server-computed totals; the client never derives its own.
#[derive(Debug, Clone, Deserialize)]
pub struct CartSummaryRecord {
    #[serde(default, deserialize_with = "wire::loose_int")]
    pub total_qty: i64,

    #[serde(default, deserialize_with = "wire::loose_decimal")]
    pub subtotal: Decimal,
}
