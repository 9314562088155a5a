//! Typed client for the order-management backend.
//!
//! # Architecture
//!
//! - Plain REST/JSON over `reqwest` - the backend is source of truth, NO
//!   local sync, direct API calls
//! - One method per remote operation, no retries; transport timeouts are the
//!   only bounded-wait policy (configured on the `reqwest::Client`)
//! - In-memory caching via `moka` for product listings (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use lmw_farm_site::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(&config.commerce)?;
//!
//! // Browse products
//! let products = client.products_by_category("animal").await?;
//!
//! // Cart operations are scoped by the opaque session token
//! let items = client.cart("session_1700000000000_a1b2c3d4e").await?;
//! ```

mod client;
pub mod types;

pub use client::CommerceClient;
pub use types::*;

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the commerce backend.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Transport failure: connection refused, DNS, timeout - no usable
    /// response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code from the backend.
        status: StatusCode,
        /// Error detail from the response body, or the canonical reason.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CommerceError {
    /// The backend-reported message, if this is a status error.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = CommerceError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "email already subscribed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "backend returned 422 Unprocessable Entity: email already subscribed"
        );
    }

    #[test]
    fn test_detail() {
        let err = CommerceError::Status {
            status: StatusCode::BAD_REQUEST,
            message: "quantity must be positive".to_string(),
        };
        assert_eq!(err.detail(), Some("quantity must be positive"));

        let parse_err: CommerceError =
            serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(parse_err.detail(), None);
    }
}
