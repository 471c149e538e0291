//! Site row models: branches, user profiles, and categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical branch row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Row ID.
    pub id: Uuid,
    /// Arabic branch name.
    pub name_ar: String,
    /// English branch name.
    pub name_en: String,
    /// Arabic street address.
    pub address_ar: String,
    /// English street address.
    pub address_en: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Map embed or coordinates link.
    pub map_url: Option<String>,
    /// Branch photo public URL.
    pub image_url: Option<String>,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}

/// A user profile row, mirrored from the backend's auth users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Auth user ID.
    pub id: Uuid,
    /// Display name.
    pub full_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Avatar public URL.
    pub avatar_url: Option<String>,
    /// Dashboard role (`admin` rows can sign in to this panel).
    pub role: Option<String>,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}

/// A product category row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Row ID.
    pub id: Uuid,
    /// Arabic category name.
    pub name_ar: String,
    /// English category name.
    pub name_en: String,
    /// Category artwork public URL.
    pub image_url: Option<String>,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}
