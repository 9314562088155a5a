//! Checkout route handlers.
//!
//! Checkout is a two-phase submit against the commerce backend: create the
//! customer record, then create the order referencing it. Validation
//! short-circuits before any backend call, and the cart token is cleared
//! from the session only after the order succeeds, so a failed submit
//! leaves the cart intact for retry.

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

use lmw_farm_core::{Email, PickupLocation};

use crate::commerce::types::{CartItem, NewCustomer, NewOrder, OrderItem};
use crate::filters;
use crate::models::session;
use crate::routes::cart::{CartView, load_cart};
use crate::state::AppState;

/// Checkout form data as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location_id: Option<i32>,
}

impl CheckoutForm {
    /// Whether this pickup location id is the one the visitor chose, for
    /// re-checking the right radio button on a redisplayed form.
    #[must_use]
    pub fn is_selected(&self, id: i32) -> bool {
        self.location_id == Some(id)
    }
}

/// Validated checkout details, ready to send to the backend.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub location: PickupLocation,
}

/// Validate a submitted checkout form.
///
/// Collects every problem rather than stopping at the first, so the
/// redisplayed form can flag all fields at once.
pub fn validate_checkout(form: &CheckoutForm) -> Result<CheckoutDetails, Vec<String>> {
    let mut errors = Vec::new();

    let first_name = form.first_name.trim().to_string();
    if first_name.is_empty() {
        errors.push("First name is required.".to_string());
    }

    let last_name = form.last_name.trim().to_string();
    if last_name.is_empty() {
        errors.push("Last name is required.".to_string());
    }

    let email = match Email::parse(form.email.trim()) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push("Please enter a valid email address.".to_string());
            None
        }
    };

    let location = match form.location_id {
        Some(id) => match PickupLocation::try_from(id) {
            Ok(location) => Some(location),
            Err(_) => {
                errors.push("Please choose a pickup option.".to_string());
                None
            }
        },
        None => {
            errors.push("Please choose a pickup option.".to_string());
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let phone = form.phone.trim();
    let phone = if phone.is_empty() {
        None
    } else {
        Some(phone.to_string())
    };

    // Both are Some whenever errors is empty
    match (email, location) {
        (Some(email), Some(location)) => Ok(CheckoutDetails {
            first_name,
            last_name,
            email,
            phone,
            location,
        }),
        _ => Err(vec!["Invalid checkout details.".to_string()]),
    }
}

/// Collapse cart rows into the order line items the backend expects.
pub fn order_items(items: &[CartItem]) -> Vec<OrderItem> {
    items
        .iter()
        .map(|item| OrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect()
}

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutFormTemplate {
    pub cart: CartView,
    pub form: CheckoutForm,
    pub errors: Vec<String>,
    pub locations: Vec<PickupLocation>,
}

impl CheckoutFormTemplate {
    fn new(cart: CartView, form: CheckoutForm, errors: Vec<String>) -> Self {
        Self {
            cart,
            form,
            errors,
            locations: PickupLocation::ALL.to_vec(),
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub order_number: String,
    pub first_name: String,
    pub pickup_label: String,
}

/// Display the checkout form.
///
/// An empty cart has nothing to check out; redirect back to the cart page.
#[instrument(skip(state, session))]
pub async fn page(State(state): State<AppState>, session: Session) -> Response {
    let items = load_cart(&state, &session).await;
    if items.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutFormTemplate::new(
        CartView::from(items.as_slice()),
        CheckoutForm::default(),
        Vec::new(),
    )
    .into_response()
}

/// Submit the checkout form.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    // Validation failures never reach the backend, not even for the cart
    // summary; the redisplayed form skips it rather than refetch.
    let details = match validate_checkout(&form) {
        Ok(details) => details,
        Err(errors) => {
            return CheckoutFormTemplate::new(CartView::from([].as_slice()), form, errors)
                .into_response();
        }
    };

    let items = load_cart(&state, &session).await;
    if items.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let customer = NewCustomer {
        email: details.email,
        first_name: details.first_name.clone(),
        last_name: details.last_name,
        phone: details.phone,
    };

    let created = match state.commerce().create_customer(&customer).await {
        Ok(created) => created,
        Err(e) => {
            tracing::error!("Failed to create customer at checkout: {e}");
            sentry::capture_error(&e);
            return CheckoutFormTemplate::new(
                CartView::from(items.as_slice()),
                form,
                vec![submit_error_message(&e)],
            )
            .into_response();
        }
    };

    let order = NewOrder {
        customer_id: created.customer_id,
        location_id: details.location,
        items: order_items(&items),
    };

    match state.commerce().create_order(&order).await {
        Ok(placed) => {
            tracing::info!(order_number = %placed.order_number, "Order placed");

            // The backend clears the cart rows; drop our token so the next
            // add starts a fresh cart.
            session::clear_cart_token(&session).await;

            CheckoutSuccessTemplate {
                order_number: placed.order_number.into_inner(),
                first_name: details.first_name,
                pickup_label: details.location.label().to_string(),
            }
            .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create order at checkout: {e}");
            sentry::capture_error(&e);
            // Cart and token are untouched, so the visitor can retry
            CheckoutFormTemplate::new(
                CartView::from(items.as_slice()),
                form,
                vec![submit_error_message(&e)],
            )
            .into_response()
        }
    }
}

/// User-facing message for a failed backend call during checkout.
///
/// Backend rejections carry a `detail` string worth surfacing (sold-out
/// items, bad references). Transport failures get a generic retry message.
fn submit_error_message(e: &crate::commerce::CommerceError) -> String {
    e.detail().map_or_else(
        || "We couldn't place your order right now. Please try again in a moment.".to_string(),
        |detail| format!("Your order couldn't be placed: {detail}"),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use lmw_farm_core::{CartId, Price, ProductId};
    use rust_decimal::Decimal;
    use tower_sessions::MemoryStore;

    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Lydia".to_string(),
            last_name: "Mae".to_string(),
            email: "lydia@example.com".to_string(),
            phone: String::new(),
            location_id: Some(1),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let details = validate_checkout(&valid_form()).unwrap();
        assert_eq!(details.first_name, "Lydia");
        assert_eq!(details.email.as_ref(), "lydia@example.com");
        assert_eq!(details.location, PickupLocation::FarmPickup);
        assert!(details.phone.is_none());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let mut form = valid_form();
        form.first_name = "  Lydia  ".to_string();
        form.phone = " 336-555-0101 ".to_string();

        let details = validate_checkout(&form).unwrap();
        assert_eq!(details.first_name, "Lydia");
        assert_eq!(details.phone.as_deref(), Some("336-555-0101"));
    }

    #[test]
    fn test_all_problems_reported_at_once() {
        let form = CheckoutForm {
            first_name: "   ".to_string(),
            last_name: String::new(),
            email: "not-an-email".to_string(),
            phone: String::new(),
            location_id: None,
        };

        let errors = validate_checkout(&form).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("First name")));
        assert!(errors.iter().any(|e| e.contains("Last name")));
        assert!(errors.iter().any(|e| e.contains("email")));
        assert!(errors.iter().any(|e| e.contains("pickup")));
    }

    #[test]
    fn test_unknown_pickup_location_rejected() {
        let mut form = valid_form();
        form.location_id = Some(9);

        let errors = validate_checkout(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("pickup"));
    }

    #[test]
    fn test_order_items_carry_product_and_quantity_only() {
        let items = vec![CartItem {
            cart_id: CartId::new(7),
            product_id: ProductId::new(42),
            product_name: "Farm Fresh Eggs (Dozen)".to_string(),
            unit_price: Price::new(Decimal::new(650, 2)),
            quantity: 3,
            line_total: Price::new(Decimal::new(1950, 2)),
        }];

        let lines = order_items(&items);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, ProductId::new(42));
        assert_eq!(lines[0].quantity, 3);
    }

    #[test]
    fn test_is_selected_matches_submitted_location() {
        let form = valid_form();
        assert!(form.is_selected(1));
        assert!(!form.is_selected(2));
        assert!(!CheckoutForm::default().is_selected(1));
    }

    #[test]
    fn test_submit_error_message_surfaces_backend_detail() {
        use crate::commerce::CommerceError;
        use axum::http::StatusCode;

        let err = CommerceError::Status {
            status: StatusCode::CONFLICT,
            message: "Product 42 is sold out".to_string(),
        };
        assert_eq!(
            submit_error_message(&err),
            "Your order couldn't be placed: Product 42 is sold out"
        );
    }

    // A bare tokio listener standing in for the commerce backend, recording
    // every request it sees. `connection: close` keeps one request per
    // connection so the accept loop stays trivial.
    async fn spawn_backend(
        respond: fn(&str, &str) -> String,
    ) -> (std::net::SocketAddr, Arc<Mutex<Vec<String>>>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&calls);

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&buf).into_owned();
                    let mut request_line = head.lines().next().unwrap_or("").split(' ');
                    let method = request_line.next().unwrap_or("").to_string();
                    let path = request_line.next().unwrap_or("").to_string();

                    let content_length = head
                        .lines()
                        .find(|line| line.to_ascii_lowercase().starts_with("content-length:"))
                        .and_then(|line| line.split(':').nth(1))
                        .and_then(|value| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    let header_end = buf
                        .windows(4)
                        .position(|w| w == b"\r\n\r\n")
                        .map_or(buf.len(), |p| p + 4);
                    let mut body_read = buf.len() - header_end;
                    while body_read < content_length {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => body_read += n,
                        }
                    }

                    log.lock().unwrap().push(format!("{method} {path}"));
                    let body = respond(&method, &path);
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        (addr, calls)
    }

    fn backend_state(addr: std::net::SocketAddr) -> AppState {
        use crate::config::{CommerceConfig, SiteConfig};

        let config = SiteConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            commerce: CommerceConfig {
                api_url: url::Url::parse(&format!("http://{addr}")).unwrap(),
                timeout: std::time::Duration::from_secs(5),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        AppState::new(config, std::path::Path::new("missing-content-dir")).unwrap()
    }

    fn fresh_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn order_flow_routes(method: &str, path: &str) -> String {
        let path = path.split('?').next().unwrap_or(path);
        match (method, path) {
            ("GET", p) if p.starts_with("/cart/") => concat!(
                r#"[{"cart_id":1,"product_id":12,"product_name":"Farm Fresh Eggs (Dozen)","#,
                r#""unit_price":"6.50","quantity":2,"line_total":"13.00"}]"#
            )
            .to_string(),
            ("POST", "/customers/") => r#"{"customer_id":7}"#.to_string(),
            ("POST", "/orders/") => r#"{"order_number":"LMW-1042"}"#.to_string(),
            _ => "{}".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_submit_makes_no_backend_calls() {
        let (addr, calls) = spawn_backend(|_, _| "[]".to_string()).await;
        let state = backend_state(addr);
        let session = fresh_session();
        session::ensure_cart_token(&session).await.unwrap();

        let form = CheckoutForm {
            email: String::new(),
            ..valid_form()
        };
        let response = submit(State(state), session, Form(form)).await;

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_creates_customer_then_order() {
        let (addr, calls) = spawn_backend(order_flow_routes).await;
        let state = backend_state(addr);
        let session = fresh_session();
        let token = session::ensure_cart_token(&session).await.unwrap();

        let response = submit(State(state), session.clone(), Form(valid_form())).await;

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let recorded = calls.lock().unwrap().clone();
        assert_eq!(
            recorded,
            vec![
                format!("GET /cart/{token}"),
                "POST /customers/".to_string(),
                "POST /orders/".to_string(),
            ]
        );
        // Token dropped only once the order went through
        assert!(session::cart_token(&session).await.is_none());
    }
}
