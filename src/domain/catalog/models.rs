//! Catalog models.

use rust_decimal::Decimal;

use crate::{
    domain::catalog::records::{CategoryRecord, ListingRecord, ProductRecord, VariantRecord},
    ids::TypedId,
};

/// Product id
pub type ProductId = TypedId<Product>;

/// Variant id
pub type VariantId = TypedId<Variant>;

/// Category id
pub type CategoryId = TypedId<Category>;

/// Normalized projection of a product list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    /// Stock figure when the endpoint provides one; `None` reads as
    /// "assume available".
    pub stock: Option<i64>,
    /// Concrete variant the card can add directly, when the payload names
    /// one.
    pub variant_hint: Option<VariantId>,
    pub swatches: Vec<String>,
    pub badges: Vec<String>,
}

impl ListingCard {
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock.is_some_and(|stock| stock <= 0)
    }
}

impl From<ListingRecord> for ListingCard {
    fn from(record: ListingRecord) -> Self {
        let image = record
            .primary_image_url
            .or(record.image)
            .or_else(|| record.images.into_iter().next());

        // First hint key wins; zero and negative ids are noise, not hints.
        let variant_hint = record
            .variant_id
            .or(record.default_variant_id)
            .or(record.first_variant_id)
            .filter(|id| id.get() > 0);

        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            price: record.price.unwrap_or_default(),
            image,
            stock: record.stock.or(record.stock_qty),
            variant_hint,
            swatches: record.swatches,
            badges: record.badges,
        }
    }
}

/// Product Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub category_id: Option<CategoryId>,
    /// Gallery images, primary first, exact duplicates dropped.
    pub images: Vec<String>,
    pub variants: Vec<Variant>,
}

impl Product {
    pub fn active_variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter().filter(|variant| variant.is_active)
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let id = record.id;

        let mut images = Vec::new();

        for image in record.primary_image_url.into_iter().chain(record.images) {
            let image = image.trim().to_owned();

            if !image.is_empty() && !images.contains(&image) {
                images.push(image);
            }
        }

        let variants = record
            .variants
            .into_iter()
            .map(|variant| Variant::from_record(variant, id))
            .collect();

        Self {
            id,
            name: record.name.unwrap_or_default(),
            description: record.description,
            base_price: record.base_price,
            category_id: record.category_id,
            images,
            variants,
        }
    }
}

/// Variant Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub shade_name: Option<String>,
    pub shade_code: Option<String>,
    pub price: Decimal,
    pub stock_qty: i64,
    pub is_active: bool,
    pub image_url: Option<String>,
}

impl Variant {
    #[must_use]
    pub fn from_record(record: VariantRecord, product: ProductId) -> Self {
        Self {
            id: record.id,
            product_id: record.product_id.unwrap_or(product),
            sku: record.sku,
            shade_name: record.shade_name,
            shade_code: record.shade_code,
            price: record.price,
            stock_qty: record.stock_qty,
            is_active: record.is_active,
            image_url: record.image_url,
        }
    }

    /// Label shown for this shade: name when present, SKU otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        self.shade_name.as_deref().unwrap_or(&self.sku)
    }
}

/// Category Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
        }
    }
}
