//! Wire types for the order-management backend.
//!
//! Shapes mirror the backend's JSON exactly. Prices travel as decimal
//! strings and deserialize into [`Price`] via rust_decimal's string serde.
//! Unknown response fields are ignored so backend additions don't break the
//! site.

use lmw_farm_core::{CartId, CustomerId, Email, OrderNumber, PickupLocation, Price, ProductId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Products
// =============================================================================

/// A product as listed by `GET /products/category/{category}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Price,
    #[serde(default)]
    pub subcategory: Option<String>,
}

// =============================================================================
// Cart
// =============================================================================

/// One cart row as returned by `GET /cart/{session_id}`.
///
/// `line_total` is server-derived (`unit_price` x `quantity`); the site
/// mirrors it read-only and never recomputes it locally.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

/// Body for `POST /cart/add`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCartItem {
    pub session_id: String,
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Customers
// =============================================================================

/// Body for `POST /customers/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Response from `POST /customers/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerCreated {
    pub customer_id: CustomerId,
}

// =============================================================================
// Orders
// =============================================================================

/// One product-and-quantity row within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body for `POST /orders/`.
///
/// A point-in-time snapshot of the cart: mutating the cart afterwards does
/// not affect a placed order.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub location_id: PickupLocation,
    pub items: Vec<OrderItem>,
}

/// Response from `POST /orders/`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreated {
    pub order_number: OrderNumber,
}

// =============================================================================
// Newsletter & Contact
// =============================================================================

/// Body for `POST /newsletter/subscribe`.
#[derive(Debug, Clone, Serialize)]
pub struct NewsletterSignup {
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

/// Response from `POST /newsletter/subscribe`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterSubscribed {
    pub message: String,
}

/// Body for `POST /contact/submit`.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
}

/// Error body shape the backend uses for rejections: `{"detail": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_with_string_price() {
        let json = r#"{
            "product_id": 12,
            "product_name": "Fresh Eggs (Dozen)",
            "description": "Pasture-raised heritage breed eggs",
            "unit_price": "6.00",
            "subcategory": "eggs"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_id.as_i32(), 12);
        assert_eq!(product.unit_price.to_string(), "$6.00");
        assert_eq!(product.subcategory.as_deref(), Some("eggs"));
    }

    #[test]
    fn test_product_tolerates_missing_optionals_and_unknown_fields() {
        let json = r#"{
            "product_id": 3,
            "product_name": "Cream Legbar Chick",
            "unit_price": "15.00",
            "current_stock": 40
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_none());
        assert!(product.subcategory.is_none());
    }

    #[test]
    fn test_cart_item_deserializes() {
        let json = r#"{
            "cart_id": 101,
            "product_id": 12,
            "product_name": "Fresh Eggs (Dozen)",
            "unit_price": "6.00",
            "quantity": 2,
            "line_total": "12.00"
        }"#;
        let item: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.cart_id.as_i32(), 101);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.line_total.to_string(), "$12.00");
    }

    #[test]
    fn test_new_order_serializes_location_as_integer() {
        let order = NewOrder {
            customer_id: CustomerId::new(7),
            location_id: PickupLocation::FarmersMarket,
            items: vec![OrderItem {
                product_id: ProductId::new(12),
                quantity: 2,
            }],
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customer_id"], 7);
        assert_eq!(json["location_id"], 2);
        assert_eq!(json["items"][0]["product_id"], 12);
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_new_customer_serializes_null_phone() {
        let customer = NewCustomer {
            email: Email::parse("jo@example.com").unwrap(),
            first_name: "Jo".to_string(),
            last_name: "Walker".to_string(),
            phone: None,
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["email"], "jo@example.com");
        assert!(json["phone"].is_null());
    }

    #[test]
    fn test_newsletter_signup_omits_missing_first_name() {
        let signup = NewsletterSignup {
            email: Email::parse("jo@example.com").unwrap(),
            first_name: None,
        };
        let json = serde_json::to_value(&signup).unwrap();
        assert!(json.get("first_name").is_none());
    }

    #[test]
    fn test_order_created_ignores_extra_fields() {
        let json = r#"{"order_number": "LMW-2026-0042", "status": "pending", "total": "16.50"}"#;
        let created: OrderCreated = serde_json::from_str(json).unwrap();
        assert_eq!(created.order_number.as_str(), "LMW-2026-0042");
    }

    #[test]
    fn test_error_detail_shape() {
        let json = r#"{"detail": "Email already subscribed"}"#;
        let err: ErrorDetail = serde_json::from_str(json).unwrap();
        assert_eq!(err.detail, "Email already subscribed");
    }
}
