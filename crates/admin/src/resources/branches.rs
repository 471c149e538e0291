//! Branch resource.

use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{Branch, Page, PageRequest};

use crate::cache::{CacheValue, QueryCache, list_key};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "branches";
const BUCKET: &str = "branches-images";
const ENTITY: &str = "branches";

/// Payload for creating a branch.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBranch {
    pub name_ar: String,
    pub name_en: String,
    pub address_ar: String,
    pub address_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBranch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}

/// Handle over the branches table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Branches<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Branches<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// One page of branches, newest first, optionally filtered by a
    /// bilingual name search.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        request: PageRequest,
        search: Option<&str>,
    ) -> DataResult<Page<Branch>> {
        let fingerprint = format!("q={}", search.unwrap_or(""));
        let key = list_key(ENTITY, request.page, request.per_page, &fingerprint);
        if let Some(CacheValue::Branches(page)) = self.cache.get(&key).await {
            return Ok(page);
        }

        let mut query = self
            .client
            .table(TABLE)
            .order_desc("created_at")
            .page(request);
        if let Some(term) = search {
            query = query.search(&["name_ar", "name_en"], term);
        }

        let page = query
            .fetch_page::<Branch>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_BRANCHES, e))?;

        self.cache
            .insert(key, CacheValue::Branches(page.clone()))
            .await;
        Ok(page)
    }

    /// One branch by id.
    ///
    /// # Errors
    ///
    /// Returns the localized not-found message when the row is missing.
    pub async fn get(&self, id: Uuid) -> DataResult<Branch> {
        self.client
            .table(TABLE)
            .eq("id", id)
            .fetch_one::<Branch>()
            .await
            .map_err(|e| DataError::backend(messages::BRANCH_NOT_FOUND, e))
    }

    /// # Errors
    ///
    /// Returns the localized create message on failure.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateBranch) -> DataResult<Branch> {
        let branch: Branch = self
            .client
            .insert(TABLE, &input)
            .await
            .map_err(|e| DataError::backend(messages::CREATE_BRANCH, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(branch)
    }

    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateBranch) -> DataResult<Branch> {
        let branch: Branch = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_BRANCH, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(branch)
    }

    /// Delete a branch, then clean up its photo best-effort.
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
            .fetch_optional::<Branch>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_BRANCH, e))?;
        let Some(branch) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_BRANCH, e))?;

        if let Some(image_url) = branch.image_url {
            self.client.remove_public_urls(&[image_url]).await;
        }
        self.cache.invalidate_entity(ENTITY);
        Ok(())
    }

    /// Upload a branch photo and return its public URL.
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
        let input = UpdateBranch {
            phone: Some(Some("0501234567".to_string())),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "phone": "0501234567" }));
    }
}
