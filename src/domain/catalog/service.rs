//! Catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::ApiClient,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{Category, ListingCard, Product, ProductId},
        records::{CategoryRecord, ListingRecord, ProductRecord},
    },
};

#[derive(Debug)]
pub struct HttpCatalogService {
    api: Arc<ApiClient>,
}

impl HttpCatalogService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn list_products(&self) -> Result<Vec<ListingCard>, CatalogServiceError> {
        let entries: Vec<serde_json::Value> = self.api.get("/api/products").await?;

        Ok(decode_listings(entries))
    }

    async fn get_product(&self, product: ProductId) -> Result<Product, CatalogServiceError> {
        let record: ProductRecord = self.api.get(&format!("/api/products/{product}")).await?;

        Ok(record.into())
    }

    async fn related_products(
        &self,
        product: ProductId,
        limit: usize,
    ) -> Result<Vec<ListingCard>, CatalogServiceError> {
        let path = format!("/api/products/{product}/related");
        let entries: Vec<serde_json::Value> = self
            .api
            .get_with_query(&path, &[("limit", limit.to_string())])
            .await?;

        let mut cards = decode_listings(entries);

        cards.retain(|card| card.id != product);
        cards.truncate(limit);

        Ok(cards)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError> {
        let records: Vec<CategoryRecord> = self.api.get("/api/shop/categories").await?;

        Ok(records.into_iter().map(Category::from).collect())
    }
}

/// Decodes list entries one by one so a single malformed product drops that
/// entry instead of the whole listing.
fn decode_listings(entries: Vec<serde_json::Value>) -> Vec<ListingCard> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ListingRecord>(entry) {
            Ok(record) => Some(ListingCard::from(record)),
            Err(err) => {
                tracing::debug!(error = %err, "skipping undecodable product entry");

                None
            }
        })
        .collect()
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves the product listing.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogServiceError`] if the request fails.
    async fn list_products(&self) -> Result<Vec<ListingCard>, CatalogServiceError>;

    /// Retrieves a single product with its variants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::NotFound`] for an unknown product,
    /// or another [`CatalogServiceError`] if the request fails.
    async fn get_product(&self, product: ProductId) -> Result<Product, CatalogServiceError>;

    /// Retrieves products related to the given one, excluding the product
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogServiceError`] if the request fails.
    async fn related_products(
        &self,
        product: ProductId,
        limit: usize,
    ) -> Result<Vec<ListingCard>, CatalogServiceError>;

    /// Retrieves the shop categories.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogServiceError`] if the request fails.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogServiceError>;
}
