//! Banner resource.

use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{Banner, Page, PageRequest};

use crate::cache::{CacheValue, QueryCache, list_key};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "banners";
const BUCKET: &str = "banners-images";
const ENTITY: &str = "banners";

/// Payload for creating a banner.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBanner {
    pub title_ar: String,
    pub title_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub is_active: bool,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBanner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Handle over the banners table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Banners<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Banners<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// One page of banners, newest first. `active` filters on the toggle.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        request: PageRequest,
        active: Option<bool>,
    ) -> DataResult<Page<Banner>> {
        let fingerprint = active.map(|a| a.to_string()).unwrap_or_default();
        let key = list_key(ENTITY, request.page, request.per_page, &fingerprint);
        if let Some(CacheValue::Banners(page)) = self.cache.get(&key).await {
            return Ok(page);
        }

        let mut query = self
            .client
            .table(TABLE)
            .order_desc("created_at")
            .page(request);
        if let Some(flag) = active {
            query = query.eq("is_active", flag);
        }

        let page = query
            .fetch_page::<Banner>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_BANNERS, e))?;

        self.cache
            .insert(key, CacheValue::Banners(page.clone()))
            .await;
        Ok(page)
    }

    /// One banner by id.
    ///
    /// # Errors
    ///
    /// Returns the localized not-found message when the row is missing.
    pub async fn get(&self, id: Uuid) -> DataResult<Banner> {
        self.client
            .table(TABLE)
            .eq("id", id)
            .fetch_one::<Banner>()
            .await
            .map_err(|e| DataError::backend(messages::BANNER_NOT_FOUND, e))
    }

    /// # Errors
    ///
    /// Returns the localized create message on failure.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateBanner) -> DataResult<Banner> {
        let banner: Banner = self
            .client
            .insert(TABLE, &input)
            .await
            .map_err(|e| DataError::backend(messages::CREATE_BANNER, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(banner)
    }

    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateBanner) -> DataResult<Banner> {
        let banner: Banner = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_BANNER, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(banner)
    }

    /// Toggle whether the banner is shown.
    ///
    /// # Errors
    ///
    /// Returns the localized update message on failure.
    pub async fn set_active(&self, id: Uuid, active: bool) -> DataResult<Banner> {
        let banner: Banner = self
            .client
            .update(TABLE, id, &json!({ "is_active": active }))
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_BANNER, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(banner)
    }

    /// Delete a banner, then clean up its artwork best-effort.
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
            .fetch_optional::<Banner>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_BANNER, e))?;
        let Some(banner) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_BANNER, e))?;

        if let Some(image_url) = banner.image_url {
            self.client.remove_public_urls(&[image_url]).await;
        }
        self.cache.invalidate_entity(ENTITY);
        Ok(())
    }

    /// Upload banner artwork and return its public URL.
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
    fn test_update_payload_can_clear_image() {
        let input = UpdateBanner {
            image_url: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "image_url": null }));
    }

    #[test]
    fn test_partial_update_keeps_other_fields_out() {
        let input = UpdateBanner {
            is_active: Some(false),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "is_active": false }));
    }
}
