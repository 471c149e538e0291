//! Category resource.
//!
//! Categories are a small reference table; the product form needs all of
//! them at once, so the listing is unpaginated and cached as one entry.

use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::Category;

use crate::cache::{CacheValue, QueryCache};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "categories";
const BUCKET: &str = "categories-images";
const ENTITY: &str = "categories";
const LIST_KEY: &str = "categories:all";

/// Payload for creating a category.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCategory {
    pub name_ar: String,
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}

/// Handle over the categories table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Categories<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Categories<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// All categories, newest first.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> DataResult<Vec<Category>> {
        if let Some(CacheValue::Categories(categories)) = self.cache.get(LIST_KEY).await {
            return Ok(categories);
        }

        let categories = self
            .client
            .table(TABLE)
            .order_desc("created_at")
            .fetch::<Category>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_CATEGORIES, e))?;

        self.cache
            .insert(
                LIST_KEY.to_string(),
                CacheValue::Categories(categories.clone()),
            )
            .await;
        Ok(categories)
    }

    /// One category by id.
    ///
    /// # Errors
    ///
    /// Returns the localized not-found message when the row is missing.
    pub async fn get(&self, id: Uuid) -> DataResult<Category> {
        self.client
            .table(TABLE)
            .eq("id", id)
            .fetch_one::<Category>()
            .await
            .map_err(|e| DataError::backend(messages::CATEGORY_NOT_FOUND, e))
    }

    /// # Errors
    ///
    /// Returns the localized create message on failure.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateCategory) -> DataResult<Category> {
        let category: Category = self
            .client
            .insert(TABLE, &input)
            .await
            .map_err(|e| DataError::backend(messages::CREATE_CATEGORY, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateCategory) -> DataResult<Category> {
        let category: Category = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_CATEGORY, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(category)
    }

    /// Delete a category, then clean up its artwork best-effort.
    ///
    /// Products referencing the category keep their dangling reference; the
    /// product form treats an unknown category as "uncategorized".
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
            .fetch_optional::<Category>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_CATEGORY, e))?;
        let Some(category) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_CATEGORY, e))?;

        if let Some(image_url) = category.image_url {
            self.client.remove_public_urls(&[image_url]).await;
        }
        self.cache.invalidate_entity(ENTITY);
        Ok(())
    }

    /// Upload category artwork and return its public URL.
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
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_payload_is_sparse() {
        let input = UpdateCategory {
            name_en: Some("Sweets".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "name_en": "Sweets" }));
    }
}
