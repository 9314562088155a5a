//! Contact page route handlers.
//!
//! The contact page shows farm location and hours with a message form. A
//! submit re-renders the same page with either a thank-you banner or the
//! entered values preserved alongside the error.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use lmw_farm_core::Email;

use crate::commerce::types::ContactMessage;
use crate::filters;
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome banner shown after a submit.
pub enum ContactOutcome {
    None,
    Sent,
    Failed(String),
}

impl ContactOutcome {
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub form: ContactForm,
    pub outcome: ContactOutcome,
}

/// Display the contact page.
#[instrument]
pub async fn page() -> impl IntoResponse {
    ContactTemplate {
        form: ContactForm::default(),
        outcome: ContactOutcome::None,
    }
}

/// Submit a contact message.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let Some(message) = build_message(&form) else {
        return ContactTemplate {
            form,
            outcome: ContactOutcome::Failed(
                "Please fill in your name, a valid email address, and a message.".to_string(),
            ),
        };
    };

    match state.commerce().submit_contact(&message).await {
        Ok(()) => {
            tracing::info!("Contact message submitted");
            ContactTemplate {
                form: ContactForm::default(),
                outcome: ContactOutcome::Sent,
            }
        }
        Err(e) => {
            tracing::error!("Contact message failed: {e}");
            sentry::capture_error(&e);
            let banner = e.detail().map_or_else(
                || "We couldn't send your message right now. Please try again.".to_string(),
                str::to_string,
            );
            ContactTemplate {
                form,
                outcome: ContactOutcome::Failed(banner),
            }
        }
    }
}

/// Validate the form into a backend message, or `None` if it is unusable.
fn build_message(form: &ContactForm) -> Option<ContactMessage> {
    let name = form.name.trim();
    let body = form.message.trim();
    if name.is_empty() || body.is_empty() {
        return None;
    }

    let email = Email::parse(form.email.trim()).ok()?;
    let phone = form.phone.trim();

    Some(ContactMessage {
        name: name.to_string(),
        email,
        phone: if phone.is_empty() {
            None
        } else {
            Some(phone.to_string())
        },
        message: body.to_string(),
    })
}
