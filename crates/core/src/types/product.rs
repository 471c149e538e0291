//! Product row model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::price::display_price;

/// A product row from the backend's `products` table.
///
/// Text fields come in Arabic/English pairs; both variants are required for
/// a product to render on either storefront locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Row ID.
    pub id: Uuid,
    /// Storefront slug/title.
    pub title: String,
    /// Arabic display name.
    pub name_ar: String,
    /// English display name.
    pub name_en: String,
    /// Arabic description.
    pub description_ar: String,
    /// English description.
    pub description_en: String,
    /// Regular price.
    pub price: Decimal,
    /// Discounted price, when an offer is running.
    pub offer_price: Option<Decimal>,
    /// Units in stock. Older rows used the `stock` column name.
    #[serde(alias = "stock")]
    pub stock_quantity: i64,
    /// Public URLs of the product images, in display order.
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Owning category, if assigned.
    pub category_id: Option<Uuid>,
    /// Shown in the best-sellers strip.
    #[serde(default)]
    pub is_best_seller: bool,
    /// Part of a limited-time offer.
    #[serde(default)]
    pub is_limited_offer: bool,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price string for list views, e.g. `"80$ (100$)"` while on offer.
    #[must_use]
    pub fn price_label(&self) -> String {
        display_price(self.price, self.offer_price)
    }

    /// Whether the product currently sells below its regular price.
    #[must_use]
    pub fn on_offer(&self) -> bool {
        self.offer_price.is_some_and(|offer| offer < self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "kunafa-tray".to_string(),
            name_ar: "صينية كنافة".to_string(),
            name_en: "Kunafa Tray".to_string(),
            description_ar: "كنافة طازجة".to_string(),
            description_en: "Fresh kunafa".to_string(),
            price: Decimal::from(100),
            offer_price: Some(Decimal::from(80)),
            stock_quantity: 12,
            image_urls: vec![],
            category_id: None,
            is_best_seller: true,
            is_limited_offer: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_label_with_offer() {
        assert_eq!(sample().price_label(), "80$ (100$)");
    }

    #[test]
    fn test_on_offer() {
        let mut product = sample();
        assert!(product.on_offer());
        product.offer_price = None;
        assert!(!product.on_offer());
        product.offer_price = Some(Decimal::from(100));
        assert!(!product.on_offer());
    }

    #[test]
    fn test_legacy_stock_alias_deserializes() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "t",
            "name_ar": "ا",
            "name_en": "n",
            "description_ar": "ا",
            "description_en": "d",
            "price": "10",
            "offer_price": null,
            "stock": 7,
            "category_id": null,
            "created_at": "2025-01-01T00:00:00Z"
        });
        let product: Product = serde_json::from_value(json).expect("deserialize");
        assert_eq!(product.stock_quantity, 7);
    }
}
