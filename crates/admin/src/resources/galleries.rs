//! Gallery resource.
//!
//! Gallery rows are thin wrappers around one storage object each, so
//! deletion always attempts the object cleanup.

use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{GalleryImage, Page, PageRequest};

use crate::cache::{CacheValue, QueryCache, list_key};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "gallery";
const BUCKET: &str = "gallery";
const ENTITY: &str = "gallery";

/// Payload for adding a gallery image (already uploaded).
#[derive(Debug, Clone, Serialize)]
pub struct CreateGalleryImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_en: Option<String>,
    pub image_url: String,
}

/// Partial caption update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateGalleryImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_ar: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_en: Option<Option<String>>,
}

/// Handle over the gallery table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Galleries<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Galleries<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// One page of gallery images, newest first.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list(&self, request: PageRequest) -> DataResult<Page<GalleryImage>> {
        let key = list_key(ENTITY, request.page, request.per_page, "-");
        if let Some(CacheValue::Gallery(page)) = self.cache.get(&key).await {
            return Ok(page);
        }

        let page = self
            .client
            .table(TABLE)
            .order_desc("created_at")
            .page(request)
            .fetch_page::<GalleryImage>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_GALLERY, e))?;

        self.cache
            .insert(key, CacheValue::Gallery(page.clone()))
            .await;
        Ok(page)
    }

    /// Upload an image and add its row in one step.
    ///
    /// # Errors
    ///
    /// Returns the localized upload message if the upload fails, and the
    /// localized create message if the row insert fails (the uploaded object
    /// is then left for the next cleanup pass).
    #[instrument(skip(self, bytes))]
    pub async fn add(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
        caption_ar: Option<String>,
        caption_en: Option<String>,
    ) -> DataResult<GalleryImage> {
        let image_url = self
            .client
            .upload_object(BUCKET, "", filename, bytes, content_type)
            .await
            .map_err(|e| DataError::backend(messages::UPLOAD_MEDIA, e))?;

        self.create(CreateGalleryImage {
            caption_ar,
            caption_en,
            image_url,
        })
        .await
    }

    /// Insert a row for an already-uploaded image.
    ///
    /// # Errors
    ///
    /// Returns the localized create message on failure.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateGalleryImage) -> DataResult<GalleryImage> {
        let image: GalleryImage = self
            .client
            .insert(TABLE, &input)
            .await
            .map_err(|e| DataError::backend(messages::CREATE_GALLERY_IMAGE, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(image)
    }

    /// Update captions.
    ///
    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateGalleryImage) -> DataResult<GalleryImage> {
        let image: GalleryImage = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_GALLERY_IMAGE, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(image)
    }

    /// Delete a gallery row, then its object best-effort.
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
            .fetch_optional::<GalleryImage>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_GALLERY_IMAGE, e))?;
        let Some(image) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_GALLERY_IMAGE, e))?;

        self.client.remove_public_urls(&[image.image_url]).await;
        self.cache.invalidate_entity(ENTITY);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_update_can_clear_one_language() {
        let input = UpdateGalleryImage {
            caption_ar: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "caption_ar": null }));
    }
}
