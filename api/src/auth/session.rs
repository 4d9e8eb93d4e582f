//! Cookie-backed sessions
//!
//! Session data lives entirely in the client's `session` cookie, signed
//! through axum-extra's `SignedCookieJar`. A cookie that fails verification
//! or does not parse is treated as an empty session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    body::Body,
    extract::FromRef,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

use crate::domain::entities::UserId;

pub const SESSION_COOKIE: &str = "session";

/// Data stored in the session cookie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Option<UserId>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
    }

    fn from_cookie(cookie: &Cookie<'_>) -> Self {
        match cookie.value().parse() {
            Ok(id) => Self {
                user_id: Some(UserId(id)),
            },
            Err(_) => {
                tracing::debug!("Session cookie holds no user id");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    data: SessionData,
    dirty: bool,
}

/// Per-request session handle
///
/// Clones share the same state, so a handler's changes are visible to the
/// middleware that writes the cookie back.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState { data, dirty: false })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.state().data.user_id
    }

    pub fn set_user_id(&self, user_id: Option<UserId>) {
        let mut state = self.state();
        state.data.user_id = user_id;
        state.dirty = true;
    }

    /// Session data if it changed since the request came in
    pub fn changes(&self) -> Option<SessionData> {
        let state = self.state();
        state.dirty.then(|| state.data.clone())
    }
}

/// Key used to sign session cookies
///
/// The configured secret may have any length; the signing key is its
/// SHA-512 digest, which gives the 64 bytes `Key` expects.
#[derive(Clone)]
pub struct SessionKey(Key);

impl SessionKey {
    pub fn new(secret: &str) -> Self {
        let digest = Sha512::digest(secret.as_bytes());
        Self(Key::from(&digest[..]))
    }
}

impl FromRef<SessionKey> for Key {
    fn from_ref(key: &SessionKey) -> Self {
        key.0.clone()
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

fn session_cookie(data: &SessionData) -> Cookie<'static> {
    let value = data.user_id.map(|id| id.to_string()).unwrap_or_default();

    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Session middleware
///
/// Loads the session from the signed cookie, injects a `Session` into
/// request extensions and writes the cookie back if the handler changed it.
/// An emptied session removes the cookie.
pub async fn session_middleware(
    jar: SignedCookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let data = jar
        .get(SESSION_COOKIE)
        .map(|cookie| SessionData::from_cookie(&cookie))
        .unwrap_or_default();

    let session = Session::new(data);
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    match session.changes() {
        Some(data) if data.is_empty() => {
            let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
            (jar, response).into_response()
        }
        Some(data) => (jar.add(session_cookie(&data)), response).into_response(),
        None => response,
    }
}
