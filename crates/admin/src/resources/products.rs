//! Product resource: catalog queries, mutations, and image cascade.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{CreatedWithin, Page, PageRequest, Product};

use crate::cache::{CacheValue, QueryCache, detail_key, list_key};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "products";
const BUCKET: &str = "products-images";
const ENTITY: &str = "products";
const DETAIL: &str = "product";

/// Filters accepted by the products list view.
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    /// Case-insensitive substring match across both name variants.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<Uuid>,
    /// Restrict to best sellers (or non-best-sellers).
    pub best_seller: Option<bool>,
    /// Creation-date lower bound.
    pub created_within: Option<CreatedWithin>,
}

impl ProductFilters {
    fn fingerprint(&self) -> String {
        format!(
            "q={}|c={}|b={}|w={}",
            self.search.as_deref().unwrap_or(""),
            self.category_id.map(|id| id.to_string()).unwrap_or_default(),
            self.best_seller.map(|b| b.to_string()).unwrap_or_default(),
            self.created_within
                .map(|w| format!("{w:?}"))
                .unwrap_or_default(),
        )
    }
}

/// Payload for creating a product. Both language variants of the text
/// fields are required.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProduct {
    pub title: String,
    pub name_ar: String,
    pub name_en: String,
    pub description_ar: String,
    pub description_en: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<Decimal>,
    pub stock_quantity: i64,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub is_best_seller: bool,
    pub is_limited_offer: bool,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<Option<Decimal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_best_seller: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_limited_offer: Option<bool>,
}

/// Handle over the products table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Products<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// One page of products, newest first, with the exact total.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        request: PageRequest,
        filters: &ProductFilters,
    ) -> DataResult<Page<Product>> {
        let key = list_key(ENTITY, request.page, request.per_page, &filters.fingerprint());
        if let Some(CacheValue::Products(page)) = self.cache.get(&key).await {
            return Ok(page);
        }

        let mut query = self
            .client
            .table(TABLE)
            .order_desc("created_at")
            .page(request);
        if let Some(term) = filters.search.as_deref() {
            query = query.search(&["name_ar", "name_en"], term);
        }
        if let Some(category_id) = filters.category_id {
            query = query.eq("category_id", category_id);
        }
        if let Some(flag) = filters.best_seller {
            query = query.eq("is_best_seller", flag);
        }
        if let Some(window) = filters.created_within {
            query = query.gte("created_at", window.since(Utc::now()).to_rfc3339());
        }

        let page = query
            .fetch_page::<Product>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_PRODUCTS, e))?;

        self.cache
            .insert(key, CacheValue::Products(page.clone()))
            .await;
        Ok(page)
    }

    /// One product by id.
    ///
    /// # Errors
    ///
    /// Returns the localized not-found message when the row is missing.
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> DataResult<Product> {
        let key = detail_key(DETAIL, id);
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            return Ok(*product);
        }

        let product = self
            .client
            .table(TABLE)
            .eq("id", id)
            .fetch_one::<Product>()
            .await
            .map_err(|e| DataError::backend(messages::PRODUCT_NOT_FOUND, e))?;

        self.cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Create a product and seed its detail cache.
    ///
    /// # Errors
    ///
    /// Returns the localized create message on failure.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateProduct) -> DataResult<Product> {
        let product: Product = self
            .client
            .insert(TABLE, &input)
            .await
            .map_err(|e| DataError::backend(messages::CREATE_PRODUCT, e))?;
        self.sync_caches(&product).await;
        Ok(product)
    }

    /// Apply a partial update and return the fresh row.
    ///
    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateProduct) -> DataResult<Product> {
        let product: Product = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_PRODUCT, e))?;
        self.sync_caches(&product).await;
        Ok(product)
    }

    /// Toggle the best-seller flag.
    ///
    /// # Errors
    ///
    /// Returns the localized update message on failure.
    pub async fn set_best_seller(&self, id: Uuid, flag: bool) -> DataResult<Product> {
        let product: Product = self
            .client
            .update(TABLE, id, &json!({ "is_best_seller": flag }))
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_PRODUCT, e))?;
        self.sync_caches(&product).await;
        Ok(product)
    }

    /// Toggle the limited-time-offer flag.
    ///
    /// # Errors
    ///
    /// Returns the localized update message on failure.
    pub async fn set_limited_offer(&self, id: Uuid, flag: bool) -> DataResult<Product> {
        let product: Product = self
            .client
            .update(TABLE, id, &json!({ "is_limited_offer": flag }))
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_PRODUCT, e))?;
        self.sync_caches(&product).await;
        Ok(product)
    }

    /// Delete a product, then clean up its images best-effort.
    ///
    /// Deleting an already-deleted product succeeds. Image cleanup failures
    /// are logged and never block the deletion.
    ///
    /// # Errors
    ///
    /// Returns the localized delete message on failure.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> DataResult<()> {
        let existing = self
            .client
            .table(TABLE)
            .eq("id", id)
            .fetch_optional::<Product>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_PRODUCT, e))?;
        let Some(product) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_PRODUCT, e))?;

        self.client.remove_public_urls(&product.image_urls).await;

        self.cache.invalidate_entity(ENTITY);
        self.cache.invalidate(&detail_key(DETAIL, id)).await;
        self.cache.invalidate("stats:dashboard").await;
        Ok(())
    }

    /// Upload one product image and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns the localized upload message on failure.
    pub async fn upload_image(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DataResult<String> {
        self.client
            .upload_object(BUCKET, "", filename, bytes, content_type)
            .await
            .map_err(|e| DataError::backend(messages::UPLOAD_MEDIA, e))
    }

    /// Post-mutation cache maintenance: lists refetch, the detail entry is
    /// overwritten with the returned row, the dashboard summary refetches.
    async fn sync_caches(&self, product: &Product) {
        self.cache.invalidate_entity(ENTITY);
        self.cache
            .insert(
                detail_key(DETAIL, product.id),
                CacheValue::Product(Box::new(product.clone())),
            )
            .await;
        self.cache.invalidate("stats:dashboard").await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_distinguishes_filters() {
        let none = ProductFilters::default();
        let searched = ProductFilters {
            search: Some("كنافة".to_string()),
            ..Default::default()
        };
        let flagged = ProductFilters {
            best_seller: Some(true),
            ..Default::default()
        };
        assert_ne!(none.fingerprint(), searched.fingerprint());
        assert_ne!(none.fingerprint(), flagged.fingerprint());
        assert_ne!(searched.fingerprint(), flagged.fingerprint());
    }

    #[test]
    fn test_update_payload_serializes_only_provided_fields() {
        let input = UpdateProduct {
            price: Some(Decimal::from(120)),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("price"));
    }

    #[test]
    fn test_update_payload_can_clear_offer_price() {
        let input = UpdateProduct {
            offer_price: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "offer_price": null }));
    }

    #[test]
    fn test_create_payload_requires_both_language_variants() {
        // Compile-time property: the fields are not optional. Serialization
        // must carry both variants.
        let input = CreateProduct {
            title: "kunafa".to_string(),
            name_ar: "كنافة".to_string(),
            name_en: "Kunafa".to_string(),
            description_ar: "طازجة".to_string(),
            description_en: "Fresh".to_string(),
            price: Decimal::from(100),
            offer_price: None,
            stock_quantity: 5,
            image_urls: vec![],
            category_id: None,
            is_best_seller: false,
            is_limited_offer: false,
        };
        let value = serde_json::to_value(&input).unwrap();
        assert!(value.get("name_ar").is_some());
        assert!(value.get("name_en").is_some());
    }
}
