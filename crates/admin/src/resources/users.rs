//! User-profile resource.
//!
//! Profiles mirror the backend's auth users; this module manages the
//! profile rows only. Revoking the auth account itself is a backend console
//! operation outside the anon key's reach.

use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use sidra_core::{Page, PageRequest, Profile};

use crate::cache::{CacheValue, QueryCache, list_key};
use crate::error::{DataError, DataResult};
use crate::messages;
use crate::supabase::SupabaseClient;

pub(crate) const TABLE: &str = "profiles";
const ENTITY: &str = "profiles";

/// Filters accepted by the users list view.
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    /// Case-insensitive substring match over name and email.
    pub search: Option<String>,
    /// Role equality (`admin`, `customer`).
    pub role: Option<String>,
}

impl UserFilters {
    fn fingerprint(&self) -> String {
        format!(
            "q={}|r={}",
            self.search.as_deref().unwrap_or(""),
            self.role.as_deref().unwrap_or(""),
        )
    }
}

/// Partial profile update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Handle over the profiles table, constructed by [`crate::SidraData`].
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a SupabaseClient,
    cache: &'a QueryCache,
}

impl<'a> Users<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient, cache: &'a QueryCache) -> Self {
        Self { client, cache }
    }

    /// One page of profiles, newest first.
    ///
    /// # Errors
    ///
    /// Returns the localized fetch message on failure.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        request: PageRequest,
        filters: &UserFilters,
    ) -> DataResult<Page<Profile>> {
        let key = list_key(ENTITY, request.page, request.per_page, &filters.fingerprint());
        if let Some(CacheValue::Profiles(page)) = self.cache.get(&key).await {
            return Ok(page);
        }

        let mut query = self
            .client
            .table(TABLE)
            .order_desc("created_at")
            .page(request);
        if let Some(term) = filters.search.as_deref() {
            query = query.search(&["full_name", "email"], term);
        }
        if let Some(role) = filters.role.as_deref() {
            query = query.eq("role", role);
        }

        let page = query
            .fetch_page::<Profile>()
            .await
            .map_err(|e| DataError::backend(messages::FETCH_USERS, e))?;

        self.cache
            .insert(key, CacheValue::Profiles(page.clone()))
            .await;
        Ok(page)
    }

    /// One profile by auth user id.
    ///
    /// # Errors
    ///
    /// Returns the localized not-found message when the row is missing.
    pub async fn get(&self, id: Uuid) -> DataResult<Profile> {
        self.client
            .table(TABLE)
            .eq("id", id)
            .fetch_one::<Profile>()
            .await
            .map_err(|e| DataError::backend(messages::USER_NOT_FOUND, e))
    }

    /// Apply a partial update and return the fresh row.
    ///
    /// # Errors
    ///
    /// Returns the localized update message on failure.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateProfile) -> DataResult<Profile> {
        let profile: Profile = self
            .client
            .update(TABLE, id, &input)
            .await
            .map_err(|e| DataError::backend(messages::UPDATE_USER, e))?;
        self.cache.invalidate_entity(ENTITY);
        Ok(profile)
    }

    /// Delete a profile row, then its avatar best-effort.
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
            .fetch_optional::<Profile>()
            .await
            .map_err(|e| DataError::backend(messages::DELETE_USER, e))?;
        let Some(profile) = existing else {
            return Ok(());
        };

        self.client
            .delete_by_id(TABLE, id)
            .await
            .map_err(|e| DataError::backend(messages::DELETE_USER, e))?;

        if let Some(avatar_url) = profile.avatar_url {
            self.client.remove_public_urls(&[avatar_url]).await;
        }
        self.cache.invalidate_entity(ENTITY);
        self.cache.invalidate("stats:dashboard").await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_update_is_sparse() {
        let input = UpdateProfile {
            role: Some("admin".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, serde_json::json!({ "role": "admin" }));
    }

    #[test]
    fn test_fingerprint_distinguishes_roles() {
        let admins = UserFilters {
            role: Some("admin".to_string()),
            ..Default::default()
        };
        let everyone = UserFilters::default();
        assert_ne!(admins.fingerprint(), everyone.fingerprint());
    }
}
