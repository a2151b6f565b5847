use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "sid";

/// Per-session state. `user_id` is `None` only for the fixed-credential
/// admin, which is not backed by a user record.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Option<Uuid>,
    pub username: String,
    pub is_admin: bool,
}

/// Process-wide session map keyed by an opaque id carried in the `sid`
/// cookie. Created at login, destroyed at logout.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the session and returns its fresh opaque id.
    pub fn create(&self, session: Session) -> String {
        let sid = Uuid::new_v4().to_string();
        self.inner
            .write()
            .expect("session lock poisoned")
            .insert(sid.clone(), session);
        sid
    }

    pub fn get(&self, sid: &str) -> Option<Session> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .get(sid)
            .cloned()
    }

    pub fn destroy(&self, sid: &str) {
        self.inner
            .write()
            .expect("session lock poisoned")
            .remove(sid);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.read().expect("session lock poisoned").len()
    }
}

fn session_from_parts(parts: &Parts, state: &AppState) -> Option<Session> {
    let jar = CookieJar::from_headers(&parts.headers);
    let sid = jar.get(SESSION_COOKIE)?.value().to_string();
    state.sessions.get(&sid)
}

/// Optional session — for routes that render differently for visitors and
/// signed-in users but reject nobody.
pub struct MaybeUser(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_from_parts(parts, state)))
    }
}

/// Requires a session backed by a user record; anonymous requests are
/// redirected to the login view.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).ok_or(LoginRedirect)?;
        let user_id = session.user_id.ok_or(LoginRedirect)?;
        Ok(CurrentUser {
            user_id,
            username: session.username,
            is_admin: session.is_admin,
        })
    }
}

/// Requires an admin session. Anything else gets the fixed "Access Denied"
/// status, never a structured body.
pub struct AdminUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state) {
            Some(session) if session.is_admin => Ok(AdminUser(session)),
            _ => Err((StatusCode::FORBIDDEN, "Access Denied")),
        }
    }
}
