//! Catalog wire records.
//!
//! List endpoints, the detail endpoint, and the related-products endpoint
//! were written at different times and name the same fields differently.
//! These records absorb every naming the storefront has been seen to
//! receive; normalization into models happens exactly once, in
//! [`super::models`].

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{
    catalog::models::{CategoryId, ProductId, VariantId},
    wire,
};

/// One entry of a product list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingRecord {
    #[serde(alias = "p_id", alias = "pId")]
    pub id: ProductId,

    #[serde(default, alias = "pname")]
    pub name: Option<String>,

    #[serde(
        default,
        alias = "base_price",
        alias = "basePrice",
        deserialize_with = "wire::loose_decimal_opt"
    )]
    pub price: Option<Decimal>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default, alias = "primaryImageUrl")]
    pub primary_image_url: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    // A variant hint may ride along under several names. The product id is
    // never usable as one.
    #[serde(default, alias = "variantId", alias = "v_id")]
    pub variant_id: Option<VariantId>,

    #[serde(default, alias = "defaultVariantId")]
    pub default_variant_id: Option<VariantId>,

    #[serde(default)]
    pub first_variant_id: Option<VariantId>,

    #[serde(default, deserialize_with = "wire::loose_int_opt")]
    pub stock: Option<i64>,

    #[serde(default, alias = "stockQty", deserialize_with = "wire::loose_int_opt")]
    pub stock_qty: Option<i64>,

    #[serde(default)]
    pub swatches: Vec<String>,

    #[serde(default)]
    pub badges: Vec<String>,
}

/// The product detail endpoint's payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(alias = "p_id", alias = "pId")]
    pub id: ProductId,

    #[serde(default, alias = "pname")]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(
        default,
        alias = "basePrice",
        deserialize_with = "wire::loose_decimal"
    )]
    pub base_price: Decimal,

    #[serde(default, alias = "pc_id", alias = "pcId")]
    pub category_id: Option<CategoryId>,

    #[serde(default, alias = "primaryImageUrl")]
    pub primary_image_url: Option<String>,

    #[serde(default, alias = "Images")]
    pub images: Vec<String>,

    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

/// One product variant (a shade) as the detail endpoint returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantRecord {
    #[serde(alias = "ID")]
    pub id: VariantId,

    #[serde(default, alias = "p_id", alias = "pId")]
    pub product_id: Option<ProductId>,

    #[serde(default)]
    pub sku: String,

    #[serde(default, alias = "shadeName")]
    pub shade_name: Option<String>,

    #[serde(default, alias = "shadeCode")]
    pub shade_code: Option<String>,

    #[serde(default, deserialize_with = "wire::loose_decimal")]
    pub price: Decimal,

    #[serde(default, alias = "stockQty", deserialize_with = "wire::loose_int")]
    pub stock_qty: i64,

    #[serde(
        default = "wire::default_true",
        alias = "isActive",
        deserialize_with = "wire::loose_bool"
    )]
    pub is_active: bool,

    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
}

/// One shop category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    #[serde(alias = "pc_id", alias = "pcId")]
    pub id: CategoryId,

    #[serde(default, alias = "pc_name", alias = "pcName")]
    pub name: Option<String>,
}
