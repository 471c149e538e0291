//! Order, order-item, and payment row models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{OrderStatus, PaymentStatus};

/// An order row, with its child rows embedded when fetched with the
/// detail selector (`*,order_items(*),payments(*)`).
///
/// Customer identity is mutually exclusive: an order belongs either to an
/// authenticated user (`user_id` set) or to a guest checkout (contact and
/// address fields set). [`Order::is_guest`] encodes the distinction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Row ID.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Order total.
    pub total_price: Decimal,
    /// Authenticated customer, when not a guest checkout.
    pub user_id: Option<Uuid>,
    /// Guest checkout: customer name.
    pub guest_name: Option<String>,
    /// Guest checkout: phone number.
    pub guest_phone: Option<String>,
    /// Guest checkout: email address.
    pub guest_email: Option<String>,
    /// Guest checkout: delivery address.
    pub guest_address: Option<String>,
    /// Display name of the owning profile, denormalized by the detail query.
    pub profile_name: Option<String>,
    /// Line items (present on detail reads).
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    /// Payments (present on detail reads).
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Creation timestamp (server-assigned).
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A guest order has no user reference and at least one guest contact
    /// field populated.
    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
            && (self.guest_name.is_some()
                || self.guest_phone.is_some()
                || self.guest_email.is_some()
                || self.guest_address.is_some())
    }

    /// Name shown in the orders table: guest name, then profile name, then a
    /// truncated row ID as a last resort. Also the field the free-text order
    /// search matches against.
    #[must_use]
    pub fn customer_display_name(&self) -> String {
        if let Some(name) = self.guest_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        if let Some(name) = self.profile_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        let id = self.id.simple().to_string();
        format!("#{}", id.get(..8).unwrap_or(&id))
    }
}

/// A line item belonging to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Row ID.
    pub id: Uuid,
    /// Owning order.
    pub order_id: Uuid,
    /// Purchased product.
    pub product_id: Uuid,
    /// Quantity purchased.
    pub quantity: i64,
    /// Unit price at purchase time.
    pub unit_price: Decimal,
}

/// A payment recorded against an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Row ID.
    pub id: Uuid,
    /// Owning order.
    pub order_id: Uuid,
    /// Payment method (e.g. `cash`, `card`).
    pub method: String,
    /// Amount paid.
    pub amount: Decimal,
    /// Processor status.
    pub status: PaymentStatus,
    /// Processor transaction reference, when available.
    pub transaction_id: Option<String>,
}
