//! Newsletter subscription route handler.
//!
//! The backend owns the subscriber list; the site just forwards the signup
//! and renders the outcome. An already-subscribed address is not an error
//! worth alarming the visitor over.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use lmw_farm_core::Email;

use crate::commerce::types::NewsletterSignup;
use crate::filters;
use crate::state::AppState;

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
}

/// Subscription result page template.
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/result.html")]
pub struct SubscribeResultTemplate {
    pub success: bool,
    pub message: String,
}

/// Subscribe to the newsletter.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Form(form): Form<SubscribeForm>,
) -> impl IntoResponse {
    let email = match Email::parse(form.email.trim()) {
        Ok(email) => email,
        Err(_) => {
            return SubscribeResultTemplate {
                success: false,
                message: "Please enter a valid email address.".to_string(),
            };
        }
    };

    let first_name = form.first_name.trim();
    let signup = NewsletterSignup {
        email,
        first_name: if first_name.is_empty() {
            None
        } else {
            Some(first_name.to_string())
        },
    };

    match state.commerce().subscribe_newsletter(&signup).await {
        Ok(subscribed) => {
            tracing::info!("Newsletter subscription accepted");
            SubscribeResultTemplate {
                success: true,
                message: subscribed.message,
            }
        }
        Err(e) => {
            // Duplicate signups come back as a rejection with a detail
            // message; treat those as success so resubscribing is painless.
            if let Some(detail) = e.detail() {
                if detail.to_lowercase().contains("already") {
                    tracing::info!("Email already subscribed");
                    return SubscribeResultTemplate {
                        success: true,
                        message: "You're already on the list!".to_string(),
                    };
                }
            }

            tracing::error!("Newsletter subscription failed: {e}");
            sentry::capture_error(&e);
            SubscribeResultTemplate {
                success: false,
                message: "Something went wrong. Please try again.".to_string(),
            }
        }
    }
}
