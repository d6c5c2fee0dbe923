//! Server-side login sessions, flash messages and the per-request context.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::AppState;
use crate::ids::IdGenerator;
use crate::inventory::Inventory;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// The logged-in user attached to a session
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SessionUser {
    pub user_id: i32,
    pub username: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot status message, shown on the next rendered page
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

struct Session {
    user: SessionUser,
    expires_at: Instant,
    flash: Option<Flash>,
}

/// In-process session store keyed by cookie token
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a session for a user, returning its token
    pub fn create(&self, user: SessionUser) -> String {
        let token = generate_token();
        let session = Session {
            user,
            expires_at: Instant::now() + self.ttl,
            flash: None,
        };
        self.sessions.write().insert(token.clone(), session);
        token
    }

    /// Look up a live session; expired sessions are dropped
    pub fn get(&self, token: &str) -> Option<SessionUser> {
        {
            let sessions = self.sessions.read();
            match sessions.get(token) {
                Some(s) if s.expires_at > Instant::now() => return Some(s.user.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().remove(token);
        None
    }

    pub fn destroy(&self, token: &str) {
        self.sessions.write().remove(token);
    }

    /// Replace the pending flash message
    pub fn set_flash(&self, token: &str, flash: Flash) {
        if let Some(session) = self.sessions.write().get_mut(token) {
            session.flash = Some(flash);
        }
    }

    /// Read and clear the pending flash message
    pub fn take_flash(&self, token: &str) -> Option<Flash> {
        self.sessions
            .write()
            .get_mut(token)
            .and_then(|s| s.flash.take())
    }

    /// Cleanup expired sessions
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.sessions.write().retain(|_, s| s.expires_at > now);
    }
}

/// Generate an unguessable session token
fn generate_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    hasher.update(nanos.to_le_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Extract the session token from the cookie header
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);
    for value in headers.get_all(header::COOKIE) {
        let Ok(cookies) = value.to_str() else { continue };
        for part in cookies.split(';') {
            if let Some(token) = part.trim().strip_prefix(prefix.as_str()) {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Everything a page handler needs: the authenticated user and a database handle.
///
/// Extracting it is the login guard; requests without a live session are
/// redirected to the login page.
pub struct RequestContext {
    pub user: SessionUser,
    pub db: Arc<DatabaseConnection>,
    pub ids: IdGenerator,
    token: String,
    sessions: Arc<SessionStore>,
}

impl RequestContext {
    pub fn inventory(&self) -> Inventory<'_> {
        Inventory::new(self.db.as_ref())
    }

    pub fn flash(&self, flash: Flash) {
        self.sessions.set_flash(&self.token, flash);
    }

    pub fn take_flash(&self) -> Option<Flash> {
        self.sessions.take_flash(&self.token)
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = session_token_from_headers(&parts.headers)
            .and_then(|token| state.sessions.get(&token).map(|user| (token, user)));

        match session {
            Some((token, user)) => Ok(Self {
                user,
                db: state.db.clone(),
                ids: state.ids.clone(),
                token,
                sessions: state.sessions.clone(),
            }),
            None => {
                tracing::debug!("No session for {}, redirecting to login", parts.uri.path());
                Err(Redirect::to("/login?error=Please+log+in+to+continue").into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user() -> SessionUser {
        SessionUser {
            user_id: 1,
            username: "admin".to_string(),
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(user());
        assert_eq!(store.get(&token), Some(user()));

        store.destroy(&token);
        assert_eq!(store.get(&token), None);
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create(user());
        assert_eq!(store.get(&token), None);
        // Dropped on lookup, so a later cleanup has nothing to do
        store.cleanup_expired();
        assert!(store.sessions.read().is_empty());
    }

    #[test]
    fn test_flash_is_one_shot() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(user());

        store.set_flash(&token, Flash::error("first"));
        store.set_flash(&token, Flash::success("Nutritional analysis added"));
        assert_eq!(
            store.take_flash(&token),
            Some(Flash::success("Nutritional analysis added"))
        );
        assert_eq!(store.take_flash(&token), None);
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create(user());
        let b = store.create(user());
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn test_cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc123; other=1"),
        );
        assert_eq!(session_token_from_headers(&headers), Some("abc123".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(session_token_from_headers(&headers), None);
        assert_eq!(session_token_from_headers(&HeaderMap::new()), None);
    }
}
