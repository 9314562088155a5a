//! Cart session token storage.
//!
//! An anonymous cart is scoped by an opaque token the site generates on
//! first use and keeps in the visitor's session. The commerce backend knows
//! nothing about sessions beyond this string. The token is cleared only
//! after a successful order.
//!
//! Session storage failures degrade to "no session": the cart renders empty
//! rather than the request failing.

use rand::Rng;
use rand::distr::Alphanumeric;
use tower_sessions::Session;

/// Session keys for cart data.
pub mod keys {
    /// Key for storing the cart session token.
    pub const CART_TOKEN: &str = "cart_token";
}

/// Length of the random suffix on generated tokens.
const TOKEN_SUFFIX_LEN: usize = 9;

/// Generate a fresh cart token: `session_{unix_millis}_{random suffix}`.
///
/// Unique enough to scope an anonymous cart; not cryptographic.
fn generate_token() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("session_{millis}_{suffix}")
}

/// Get the cart token from the session, if one exists.
///
/// Returns `None` both when no token was ever issued and when session
/// storage is unavailable.
pub async fn cart_token(session: &Session) -> Option<String> {
    session
        .get::<String>(keys::CART_TOKEN)
        .await
        .ok()
        .flatten()
}

/// Get the cart token, generating and persisting a new one if absent.
///
/// # Errors
///
/// Returns the session-store error if the new token cannot be persisted;
/// callers treat this as the degraded empty-cart state.
pub async fn ensure_cart_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = cart_token(session).await {
        return Ok(token);
    }

    let token = generate_token();
    session.insert(keys::CART_TOKEN, token.clone()).await?;
    Ok(token)
}

/// Remove the cart token. Called only after a successful order.
pub async fn clear_cart_token(session: &Session) {
    if let Err(e) = session.remove::<String>(keys::CART_TOKEN).await {
        tracing::warn!("Failed to clear cart token from session: {e}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::{MemoryStore, Session};

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_generated_token_format() {
        let token = generate_token();
        let mut parts = token.splitn(3, '_');
        assert_eq!(parts.next(), Some("session"));

        let millis = parts.next().unwrap();
        assert!(millis.parse::<i64>().is_ok());

        let suffix = parts.next().unwrap();
        assert_eq!(suffix.len(), TOKEN_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }

    #[tokio::test]
    async fn test_token_absent_by_default() {
        let session = test_session();
        assert!(cart_token(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_token_stable_across_reads() {
        let session = test_session();
        let token = ensure_cart_token(&session).await.unwrap();

        // Repeated reads return the same token until it is cleared
        assert_eq!(cart_token(&session).await.as_deref(), Some(token.as_str()));
        assert_eq!(ensure_cart_token(&session).await.unwrap(), token);
    }

    #[tokio::test]
    async fn test_clear_removes_token() {
        let session = test_session();
        let first = ensure_cart_token(&session).await.unwrap();

        clear_cart_token(&session).await;
        assert!(cart_token(&session).await.is_none());

        // A new token is generated afterwards
        let second = ensure_cart_token(&session).await.unwrap();
        assert_ne!(first, second);
    }
}
