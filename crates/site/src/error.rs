//! Request-level error handling.
//!
//! The site's failure policy is to degrade in place: commerce backend
//! errors are caught at their call sites, captured to Sentry there, and
//! rendered as inline notices so the visitor always lands back on an
//! editable page. The only error that propagates out of a handler is a
//! missing resource, which renders the 404 page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::filters;

/// Errors a route handler can return.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(what) => {
                tracing::debug!("Not found: {what}");
                (StatusCode::NOT_FOUND, NotFoundTemplate).into_response()
            }
        }
    }
}

/// Fallback handler for unmatched routes.
pub async fn not_found_fallback(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("blog post: coop-tour".to_string());
        assert_eq!(err.to_string(), "Not found: blog post: coop-tour");
    }

    #[test]
    fn test_not_found_renders_404() {
        let response = AppError::NotFound("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fallback_is_not_found() {
        let response = not_found_fallback(axum::http::Uri::from_static("/no-such-page"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
