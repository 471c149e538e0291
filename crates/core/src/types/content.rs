//! Content row models: blog posts, banners, combo offers, testimonials,
//! and gallery images.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A blog post row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    /// Row ID.
    pub id: Uuid,
    /// Arabic title.
    pub title_ar: String,
    /// English title.
    pub title_en: String,
    /// Arabic body (HTML from the dashboard editor).
    pub content_ar: String,
    /// English body.
    pub content_en: String,
    /// Author display name.
    pub author: String,
    /// Public URLs of attached images.
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Optional embedded-video markup.
    pub video_embed: Option<String>,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}

/// A promotional banner row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    /// Row ID.
    pub id: Uuid,
    /// Arabic headline.
    pub title_ar: String,
    /// English headline.
    pub title_en: String,
    /// Banner artwork public URL.
    pub image_url: Option<String>,
    /// Click-through target.
    pub link_url: Option<String>,
    /// Whether the banner is currently shown.
    #[serde(default)]
    pub is_active: bool,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}

/// A combo-offer row (bundle of products at a single price).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboOffer {
    /// Row ID.
    pub id: Uuid,
    /// Arabic name.
    pub name_ar: String,
    /// English name.
    pub name_en: String,
    /// Arabic description.
    pub description_ar: String,
    /// English description.
    pub description_en: String,
    /// Bundle price.
    pub price: Decimal,
    /// Products included in the bundle.
    #[serde(default)]
    pub product_ids: Vec<Uuid>,
    /// Artwork public URL.
    pub image_url: Option<String>,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}

/// A customer testimonial row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    /// Row ID.
    pub id: Uuid,
    /// Customer display name.
    pub customer_name: String,
    /// Arabic quote.
    pub content_ar: String,
    /// English quote.
    pub content_en: String,
    /// Star rating, 1-5.
    pub rating: Option<i16>,
    /// Customer avatar public URL.
    pub avatar_url: Option<String>,
    /// Shown on the storefront only once approved.
    #[serde(default)]
    pub is_approved: bool,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}

/// A gallery image row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Row ID.
    pub id: Uuid,
    /// Arabic caption.
    pub caption_ar: Option<String>,
    /// English caption.
    pub caption_en: Option<String>,
    /// Image public URL.
    pub image_url: String,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}
