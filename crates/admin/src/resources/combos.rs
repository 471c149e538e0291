//! Combo-offer resource.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{ComboOffer, Page, PageRequest};

use crate::cache::{CacheValue, QueryCache, list_key};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "combo_offers";
const BUCKET: &str = "combos-images";
const ENTITY: &str = "combos";

/// Filters accepted by the combo-offers list view.
#[derive(Debug, Clone, Default)]
pub struct ComboFilters {
    /// Case-insensitive substring match across both name variants.
    pub search: Option<String>,
}

impl ComboFilters {
    fn fingerprint(&self) -> String {
        format!("q={}", self.search.as_deref().unwrap_or(""))
    }
}

/// Payload for creating a combo offer.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCombo {
    pub name_ar: String,
    pub name_en: String,
    pub description_ar: String,
    pub description_en: String,
    pub price: Decimal,
    pub product_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCombo {
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
    pub product_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}

/// Handle over the combo-offers table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Combos<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Combos<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// One page of combo offers, newest first.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        request: PageRequest,
        filters: &ComboFilters,
    ) -> DataResult<Page<ComboOffer>> {
        let key = list_key(ENTITY, request.page, request.per_page, &filters.fingerprint());
        if let Some(CacheValue::Combos(page)) = self.cache.get(&key).await {
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

        let page = query
            .fetch_page::<ComboOffer>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_COMBOS, e))?;

        self.cache
            .insert(key, CacheValue::Combos(page.clone()))
            .await;
        Ok(page)
    }

    /// One combo offer by id.
    ///
    /// # Errors
    ///
    /// Returns the localized not-found message when the row is missing.
    pub async fn get(&self, id: Uuid) -> DataResult<ComboOffer> {
        self.client
            .table(TABLE)
            .eq("id", id)
            .fetch_one::<ComboOffer>()
            .await
            .map_err(|e| DataError::backend(messages::COMBO_NOT_FOUND, e))
    }

    /// # Errors
    ///
    /// Returns the localized create message on failure.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateCombo) -> DataResult<ComboOffer> {
        let combo: ComboOffer = self
            .client
            .insert(TABLE, &input)
            .await
            .map_err(|e| DataError::backend(messages::CREATE_COMBO, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(combo)
    }

    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateCombo) -> DataResult<ComboOffer> {
        let combo: ComboOffer = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_COMBO, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(combo)
    }

    /// Delete a combo offer, then clean up its artwork best-effort.
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
            .fetch_optional::<ComboOffer>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_COMBO, e))?;
        let Some(combo) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_COMBO, e))?;

        if let Some(image_url) = combo.image_url {
            self.client.remove_public_urls(&[image_url]).await;
        }
        self.cache.invalidate_entity(ENTITY);
        Ok(())
    }

    /// Upload combo artwork and return its public URL.
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
        let input = UpdateCombo {
            price: Some(Decimal::from(45)),
            product_ids: Some(vec![Uuid::nil()]),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
    }
}
