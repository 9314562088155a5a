//! Commerce backend client implementation.
//!
//! Thin REST wrapper over `reqwest`. Product listings are cached with `moka`
//! (5-minute TTL); cart, customer, and order calls always go to the backend
//! so the rendered cart state stays authoritative.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use lmw_farm_core::CartId;

use super::CommerceError;
use super::types::{
    CartItem, ContactMessage, CustomerCreated, ErrorDetail, NewCartItem, NewCustomer, NewOrder,
    NewsletterSignup, NewsletterSubscribed, OrderCreated, Product,
};
use crate::config::CommerceConfig;

/// Product cache TTL.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Client for the order-management backend.
///
/// Cheaply cloneable via `Arc`. Stateless apart from the connection pool and
/// the product cache: every call maps to exactly one HTTP request.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: String,
    product_cache: Cache<String, Arc<Vec<Product>>>,
}

impl CommerceClient {
    /// Create a new commerce client.
    ///
    /// The underlying `reqwest::Client` carries an explicit per-request
    /// timeout so a hung backend call resolves to an error instead of
    /// leaving the page loading indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &CommerceConfig) -> Result<Self, CommerceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let product_cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                product_cache,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Read a JSON response body, mapping non-2xx statuses to
    /// [`CommerceError::Status`].
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CommerceError> {
        let status = convert_status(response.status());

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Check a response that carries no useful body.
    async fn read_empty(response: reqwest::Response) -> Result<(), CommerceError> {
        let status = convert_status(response.status());
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(status_error(status, &body))
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products in a category.
    ///
    /// `GET /products/category/{category}`. Results are cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn products_by_category(
        &self,
        category: &str,
    ) -> Result<Arc<Vec<Product>>, CommerceError> {
        let cache_key = format!("category:{category}");

        if let Some(products) = self.inner.product_cache.get(&cache_key).await {
            debug!("Cache hit for product category");
            return Ok(products);
        }

        let response = self
            .inner
            .client
            .get(self.url(&format!("/products/category/{category}")))
            .send()
            .await?;
        let products: Vec<Product> = Self::read_json(response).await?;
        let products = Arc::new(products);

        self.inner
            .product_cache
            .insert(cache_key, Arc::clone(&products))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the cart rows for a session token.
    ///
    /// `GET /cart/{session_id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, session_token))]
    pub async fn cart(&self, session_token: &str) -> Result<Vec<CartItem>, CommerceError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/cart/{session_token}")))
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Add a line item to a cart.
    ///
    /// `POST /cart/add`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub async fn add_to_cart(&self, item: &NewCartItem) -> Result<CartItem, CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/cart/add"))
            .json(item)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Remove a cart row.
    ///
    /// `DELETE /cart/{cart_id}`. The backend returns no content.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, cart_id: CartId) -> Result<(), CommerceError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/cart/{cart_id}")))
            .send()
            .await?;
        Self::read_empty(response).await
    }

    /// Set the quantity on a cart row.
    ///
    /// `PUT /cart/{cart_id}/quantity?quantity=N`. Quantities below 1 are
    /// invalid here; callers remove the row instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn update_cart_quantity(
        &self,
        cart_id: CartId,
        quantity: u32,
    ) -> Result<CartItem, CommerceError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/cart/{cart_id}/quantity")))
            .query(&[("quantity", quantity)])
            .send()
            .await?;
        Self::read_json(response).await
    }

    // =========================================================================
    // Customers & Orders
    // =========================================================================

    /// Create a customer record at checkout time.
    ///
    /// `POST /customers/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, customer), fields(email = %customer.email))]
    pub async fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> Result<CustomerCreated, CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/customers/"))
            .json(customer)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Submit an order referencing a previously created customer.
    ///
    /// `POST /orders/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, order), fields(customer_id = %order.customer_id))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderCreated, CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/orders/"))
            .json(order)
            .send()
            .await?;
        Self::read_json(response).await
    }

    // =========================================================================
    // Newsletter & Contact
    // =========================================================================

    /// Subscribe an email to the newsletter.
    ///
    /// `POST /newsletter/subscribe`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, signup), fields(email = %signup.email))]
    pub async fn subscribe_newsletter(
        &self,
        signup: &NewsletterSignup,
    ) -> Result<NewsletterSubscribed, CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/newsletter/subscribe"))
            .json(signup)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Submit a contact-form message.
    ///
    /// `POST /contact/submit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, message), fields(email = %message.email))]
    pub async fn submit_contact(&self, message: &ContactMessage) -> Result<(), CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/contact/submit"))
            .json(message)
            .send()
            .await?;
        Self::read_empty(response).await
    }
}

/// Convert a reqwest status to the axum/http `StatusCode` used everywhere
/// else in the crate.
fn convert_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Build a [`CommerceError::Status`] from a rejection body.
///
/// The backend reports rejections as `{"detail": "..."}`; fall back to the
/// canonical reason when the body is something else.
fn status_error(status: StatusCode, body: &str) -> CommerceError {
    tracing::warn!(
        status = %status,
        body = %body.chars().take(500).collect::<String>(),
        "commerce backend returned non-success status"
    );

    let message = serde_json::from_str::<ErrorDetail>(body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        },
        |detail| detail.detail,
    );

    CommerceError::Status { status, message }
}
