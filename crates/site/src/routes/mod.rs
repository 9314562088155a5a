//! HTTP route handlers for the farm website.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Pages
//! GET  /about                  - About the farm
//! GET  /animals                - Animals & shop (eggs and chicks)
//! GET  /future                 - Future plans
//!
//! # Blog
//! GET  /blog                   - Blog index
//! GET  /blog/:slug             - Blog post
//!
//! # Cart (form posts, 303 back to /cart)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add product to cart
//! POST /cart/increase          - Increase line quantity
//! POST /cart/decrease          - Decrease line quantity (removes at 1)
//! POST /cart/remove            - Remove line
//!
//! # Checkout
//! GET  /checkout               - Checkout form (redirects if cart empty)
//! POST /checkout/submit        - Submit order
//!
//! # Forms (rate limited)
//! GET  /contact                - Contact page
//! POST /contact/submit         - Submit contact message
//! POST /newsletter/subscribe   - Newsletter signup
//! ```

pub mod blog;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod home;
pub mod newsletter;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::form_rate_limiter;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{slug}", get(blog::show))
}

/// Create the form-submission routes router.
///
/// These are the abuse-prone POST endpoints; they sit behind the per-IP
/// rate limiter.
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout/submit", post(checkout::submit))
        .route("/contact/submit", post(contact::submit))
        .route("/newsletter/subscribe", post(newsletter::subscribe))
        .route_layer(form_rate_limiter())
}

/// Create the combined public routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/about", get(pages::about))
        .route("/animals", get(products::index))
        .route("/future", get(pages::future))
        .route("/contact", get(contact::page))
        .route("/checkout", get(checkout::page))
        .nest("/cart", cart_routes())
        .nest("/blog", blog_routes())
        .merge(form_routes())
}
