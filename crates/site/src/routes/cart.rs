//! Cart route handlers.
//!
//! The cart lives in the commerce backend, keyed by an opaque session token
//! (see [`crate::models::session`]). Every mutation posts a form, applies
//! the change against the backend, and redirects back to `/cart` so the
//! page always re-renders from freshly fetched rows.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use lmw_farm_core::{CartId, Price, ProductId};

use crate::commerce::types::{CartItem, NewCartItem};
use crate::filters;
use crate::models::session;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&[CartItem]> for CartView {
    fn from(items: &[CartItem]) -> Self {
        let subtotal = Price::total(items.iter().map(|item| item.line_total));
        let item_count = items.iter().map(|item| item.quantity).sum();

        Self {
            items: items.iter().map(CartItemView::from).collect(),
            subtotal: subtotal.to_string(),
            item_count,
        }
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            cart_id: item.cart_id,
            product_id: item.product_id,
            name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            line_total: item.line_total.to_string(),
        }
    }
}

/// Fetch the current cart rows for the session, if a token exists.
///
/// Backend failures degrade to an empty cart so the page still renders.
pub async fn load_cart(state: &AppState, session: &Session) -> Vec<CartItem> {
    let Some(token) = session::cart_token(session).await else {
        return Vec::new();
    };

    match state.commerce().cart(&token).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Failed to fetch cart for session token: {e}");
            Vec::new()
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Form data for quantity and removal actions, keyed by backend cart row.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub cart_id: CartId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let items = load_cart(&state, &session).await;

    CartShowTemplate {
        cart: CartView::from(items.as_slice()),
    }
}

/// Add a product to the cart.
///
/// Generates a session token on first use. The backend merges repeat adds
/// of the same product into one row.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let token = match session::ensure_cart_token(&session).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to persist cart token to session: {e}");
            return Redirect::to("/cart").into_response();
        }
    };

    let item = NewCartItem {
        session_id: token,
        product_id: form.product_id,
        quantity: form.quantity.unwrap_or(1).max(1),
    };

    if let Err(e) = state.commerce().add_to_cart(&item).await {
        tracing::error!("Failed to add item to cart: {e}");
    }

    Redirect::to("/cart").into_response()
}

/// Increase a cart line's quantity by one.
#[instrument(skip(state, session))]
pub async fn increase(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Redirect {
    if let Some(item) = find_line(&state, &session, form.cart_id).await {
        let result = state
            .commerce()
            .update_cart_quantity(form.cart_id, item.quantity + 1)
            .await;
        if let Err(e) = result {
            tracing::error!("Failed to increase cart quantity: {e}");
        }
    }

    Redirect::to("/cart")
}

/// Decrease a cart line's quantity by one.
///
/// Decrementing a line that is already at quantity 1 removes it; a cart
/// row never holds a zero quantity.
#[instrument(skip(state, session))]
pub async fn decrease(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Redirect {
    if let Some(item) = find_line(&state, &session, form.cart_id).await {
        let result = match decrement_action(item.quantity) {
            DecrementAction::Remove => state.commerce().remove_from_cart(form.cart_id).await,
            DecrementAction::SetQuantity(quantity) => state
                .commerce()
                .update_cart_quantity(form.cart_id, quantity)
                .await
                .map(|_| ()),
        };
        if let Err(e) = result {
            tracing::error!("Failed to decrease cart quantity: {e}");
        }
    }

    Redirect::to("/cart")
}

/// Backend action for decrementing a cart line at the given quantity.
#[derive(Debug, PartialEq, Eq)]
enum DecrementAction {
    Remove,
    SetQuantity(u32),
}

/// A line at quantity 1 gets removed rather than set to zero.
const fn decrement_action(quantity: u32) -> DecrementAction {
    if quantity <= 1 {
        DecrementAction::Remove
    } else {
        DecrementAction::SetQuantity(quantity - 1)
    }
}

/// Remove a cart line entirely.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Redirect {
    // Only act on rows that belong to this session's cart
    if find_line(&state, &session, form.cart_id).await.is_some() {
        if let Err(e) = state.commerce().remove_from_cart(form.cart_id).await {
            tracing::error!("Failed to remove cart item: {e}");
        }
    }

    Redirect::to("/cart")
}

/// Look up a cart row by ID within this session's cart.
///
/// Guards quantity and removal actions against forged row IDs from other
/// sessions.
async fn find_line(state: &AppState, session: &Session, cart_id: CartId) -> Option<CartItem> {
    load_cart(state, session)
        .await
        .into_iter()
        .find(|item| item.cart_id == cart_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn cart_item(cart_id: i32, name: &str, unit: &str, quantity: u32) -> CartItem {
        let unit_price = Price::new(Decimal::from_str(unit).unwrap());
        let line_total = Price::new(Decimal::from_str(unit).unwrap() * Decimal::from(quantity));
        CartItem {
            cart_id: CartId::new(cart_id),
            product_id: ProductId::new(cart_id + 100),
            product_name: name.to_string(),
            unit_price,
            quantity,
            line_total,
        }
    }

    #[test]
    fn test_empty_cart_view() {
        let cart = CartView::from([].as_slice());
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal, "$0.00");
        assert_eq!(cart.item_count, 0);
    }

    #[test]
    fn test_cart_view_totals() {
        let items = vec![
            cart_item(1, "Farm Fresh Eggs (Dozen)", "6.50", 2),
            cart_item(2, "Cream Legbar Chick", "12.00", 3),
        ];
        let cart = CartView::from(items.as_slice());

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.item_count, 5);
        // 2 * 6.50 + 3 * 12.00
        assert_eq!(cart.subtotal, "$49.00");
        assert_eq!(cart.items[0].line_total, "$13.00");
        assert_eq!(cart.items[0].unit_price, "$6.50");
    }

    #[test]
    fn test_cart_view_formats_exact_cents() {
        let items = vec![cart_item(1, "Olive Egger Chick", "12.25", 1)];
        let cart = CartView::from(items.as_slice());
        assert_eq!(cart.subtotal, "$12.25");
    }

    #[test]
    fn test_decrement_at_one_removes_the_line() {
        assert_eq!(decrement_action(1), DecrementAction::Remove);
        assert_eq!(decrement_action(0), DecrementAction::Remove);
    }

    #[test]
    fn test_decrement_above_one_lowers_quantity() {
        assert_eq!(decrement_action(3), DecrementAction::SetQuantity(2));
        assert_eq!(decrement_action(2), DecrementAction::SetQuantity(1));
    }
}
