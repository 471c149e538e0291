//! Blog resource: post queries, mutations, and image cascade.

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{BlogPost, CreatedWithin, Page, PageRequest};

use crate::cache::{CacheValue, QueryCache, detail_key, list_key};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "blog";
const BUCKET: &str = "blog-images";
const ENTITY: &str = "posts";
const DETAIL: &str = "post";

/// Filters accepted by the blog list view.
#[derive(Debug, Clone, Default)]
pub struct BlogFilters {
    /// Case-insensitive substring match across both title variants.
    pub search: Option<String>,
    /// Creation-date lower bound.
    pub created_within: Option<CreatedWithin>,
}

impl BlogFilters {
    fn fingerprint(&self) -> String {
        format!(
            "q={}|w={}",
            self.search.as_deref().unwrap_or(""),
            self.created_within
                .map(|w| format!("{w:?}"))
                .unwrap_or_default(),
        )
    }
}

/// Payload for creating a post. Both language variants are required.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePost {
    pub title_ar: String,
    pub title_en: String,
    pub content_ar: String,
    pub content_en: String,
    pub author: String,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_embed: Option<String>,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_embed: Option<Option<String>>,
}

/// Handle over the blog table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Blog<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Blog<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// One page of posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        request: PageRequest,
        filters: &BlogFilters,
    ) -> DataResult<Page<BlogPost>> {
        let key = list_key(ENTITY, request.page, request.per_page, &filters.fingerprint());
        if let Some(CacheValue::Posts(page)) = self.cache.get(&key).await {
            return Ok(page);
        }

        let mut query = self
            .client
            .table(TABLE)
            .order_desc("created_at")
            .page(request);
        if let Some(term) = filters.search.as_deref() {
            query = query.search(&["title_ar", "title_en"], term);
        }
        if let Some(window) = filters.created_within {
            query = query.gte("created_at", window.since(Utc::now()).to_rfc3339());
        }

        let page = query
            .fetch_page::<BlogPost>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_POSTS, e))?;

        self.cache.insert(key, CacheValue::Posts(page.clone())).await;
        Ok(page)
    }

    /// One post by id.
    ///
    /// # Errors
    ///
    /// Returns the localized not-found message when the row is missing.
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> DataResult<BlogPost> {
        let key = detail_key(DETAIL, id);
        if let Some(CacheValue::Post(post)) = self.cache.get(&key).await {
            return Ok(*post);
        }

        let post = self
            .client
            .table(TABLE)
            .eq("id", id)
            .fetch_one::<BlogPost>()
            .await
            .map_err(|e| DataError::backend(messages::POST_NOT_FOUND, e))?;

        self.cache
            .insert(key, CacheValue::Post(Box::new(post.clone())))
            .await;
        Ok(post)
    }

    /// Create a post.
    ///
    /// # Errors
    ///
    /// Returns the localized create message on failure.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreatePost) -> DataResult<BlogPost> {
        let post: BlogPost = self
            .client
            .insert(TABLE, &input)
            .await
            .map_err(|e| DataError::backend(messages::CREATE_POST, e))?;
        self.sync_caches(&post).await;
        Ok(post)
    }

    /// Apply a partial update and return the fresh row.
    ///
    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdatePost) -> DataResult<BlogPost> {
        let post: BlogPost = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_POST, e))?;
        self.sync_caches(&post).await;
        Ok(post)
    }

    /// Delete a post, then clean up its images best-effort.
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
            .fetch_optional::<BlogPost>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_POST, e))?;
        let Some(post) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_POST, e))?;

        self.client.remove_public_urls(&post.image_urls).await;

        self.cache.invalidate_entity(ENTITY);
        self.cache.invalidate(&detail_key(DETAIL, id)).await;
        Ok(())
    }

    /// Upload one post image and return its public URL.
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

    async fn sync_caches(&self, post: &BlogPost) {
        self.cache.invalidate_entity(ENTITY);
        self.cache
            .insert(
                detail_key(DETAIL, post.id),
                CacheValue::Post(Box::new(post.clone())),
            )
            .await;
    }
}
