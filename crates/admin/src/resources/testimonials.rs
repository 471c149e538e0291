//! Testimonial resource.

use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{Page, PageRequest, Testimonial};

use crate::cache::{CacheValue, QueryCache, list_key};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "testimonials";
const BUCKET: &str = "testimonials-images";
const ENTITY: &str = "testimonials";

/// Filters accepted by the testimonials list view.
#[derive(Debug, Clone, Default)]
pub struct TestimonialFilters {
    /// Restrict to approved (or pending) entries.
    pub approved: Option<bool>,
}

impl TestimonialFilters {
    fn fingerprint(&self) -> String {
        format!("a={}", self.approved.map(|a| a.to_string()).unwrap_or_default())
    }
}

/// Payload for creating a testimonial.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTestimonial {
    pub customer_name: String,
    pub content_ar: String,
    pub content_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_approved: bool,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTestimonial {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Option<i16>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
}

/// Handle over the testimonials table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Testimonials<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Testimonials<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// One page of testimonials, newest first.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        request: PageRequest,
        filters: &TestimonialFilters,
    ) -> DataResult<Page<Testimonial>> {
        let key = list_key(ENTITY, request.page, request.per_page, &filters.fingerprint());
        if let Some(CacheValue::Testimonials(page)) = self.cache.get(&key).await {
            return Ok(page);
        }

        let mut query = self
            .client
            .table(TABLE)
            .order_desc("created_at")
            .page(request);
        if let Some(flag) = filters.approved {
            query = query.eq("is_approved", flag);
        }

        let page = query
            .fetch_page::<Testimonial>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_TESTIMONIALS, e))?;

        self.cache
            .insert(key, CacheValue::Testimonials(page.clone()))
            .await;
        Ok(page)
    }

    /// # Errors
    ///
    /// Returns the localized create message on failure.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateTestimonial) -> DataResult<Testimonial> {
        let testimonial: Testimonial = self
            .client
            .insert(TABLE, &input)
            .await
            .map_err(|e| DataError::backend(messages::CREATE_TESTIMONIAL, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(testimonial)
    }

    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateTestimonial) -> DataResult<Testimonial> {
        let testimonial: Testimonial = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_TESTIMONIAL, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(testimonial)
    }

    /// Approve or hide a testimonial.
    ///
    /// # Errors
    ///
    /// Returns the localized update message on failure.
    pub async fn set_approved(&self, id: Uuid, approved: bool) -> DataResult<Testimonial> {
        let testimonial: Testimonial = self
            .client
            .update(TABLE, id, &json!({ "is_approved": approved }))
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_TESTIMONIAL, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(testimonial)
    }

    /// Delete a testimonial, then clean up its avatar best-effort.
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
            .fetch_optional::<Testimonial>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_TESTIMONIAL, e))?;
        let Some(testimonial) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_TESTIMONIAL, e))?;

        if let Some(avatar_url) = testimonial.avatar_url {
            self.client.remove_public_urls(&[avatar_url]).await;
        }
        self.cache.invalidate_entity(ENTITY);
        Ok(())
    }

    /// Upload a customer avatar and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns the localized upload message on failure.
    pub async fn upload_avatar(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DataResult<String> {
        self.client
            .upload_object(BUCKET, "avatars", filename, bytes, content_type)
            .await
            .map_err(|e| DataError::backend(messages::UPLOAD_MEDIA, e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_toggle_payload() {
        let input = UpdateTestimonial {
            is_approved: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "is_approved": true }));
    }

    #[test]
    fn test_rating_can_be_cleared() {
        let input = UpdateTestimonial {
            rating: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "rating": null }));
    }
}
