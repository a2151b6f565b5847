use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, LoginQuery, SignupForm},
        password::encode_password,
    },
    session::SESSION_COOKIE,
    state::AppState,
    store::NewUser,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_post))
        .route("/logout", get(logout))
        .route("/signup", get(signup_page).post(signup_post))
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".into())
}

#[instrument]
pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    views::login(query.message.as_deref(), None)
}

#[instrument(skip(state, jar, form))]
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, (StatusCode, String)> {
    let session = state
        .policy
        .authenticate(state.store.as_ref(), &form.username, &form.password)
        .await
        .map_err(internal)?;

    let Some(session) = session else {
        // failed logins never touch the session store
        return Ok(views::login(None, Some("Invalid username or password")).into_response());
    };

    let target = if session.is_admin { "/admin" } else { "/" };
    info!(username = %session.username, is_admin = session.is_admin, "user logged in");
    let sid = state.sessions.create(session);
    let cookie = Cookie::build((SESSION_COOKIE, sid))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    Ok((jar.add(cookie), Redirect::to(target)).into_response())
}

#[instrument(skip(state, jar))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value());
    }
    (jar.remove(Cookie::from(SESSION_COOKIE)), Redirect::to("/login"))
}

#[instrument]
pub async fn signup_page() -> Html<String> {
    views::signup(None)
}

#[instrument(skip(state, form))]
pub async fn signup_post(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let username = form.username.trim().to_string();
    if !is_valid_username(&username) {
        warn!(%username, "signup with invalid username");
        return Err((StatusCode::BAD_REQUEST, "Invalid username".into()));
    }

    let password = encode_password(&form.password, state.config.legacy_plaintext_passwords)
        .map_err(internal)?;

    match state
        .store
        .create_user(NewUser {
            username,
            password,
            is_admin: false,
        })
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "user signed up");
            Ok(Redirect::to("/login"))
        }
        Err(e) => {
            error!(error = %e, "signup failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error registering new user, please try again.".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    use crate::store::Store;
    use crate::testing::{body_string, form_post, get, seed_user, test_state};

    #[test]
    fn username_validation() {
        assert!(super::is_valid_username("alice"));
        assert!(super::is_valid_username("alice.b-92"));
        assert!(!super::is_valid_username("al"));
        assert!(!super::is_valid_username("has spaces"));
        assert!(!super::is_valid_username("<script>"));
    }

    #[tokio::test]
    async fn signup_then_login_round_trip() {
        let (state, store) = test_state();
        let app = crate::app::build_app(state.clone());

        let response = app
            .clone()
            .oneshot(form_post("/signup", "username=alice&password=pw123", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let created = store
            .find_active_user_by_username("alice")
            .await
            .unwrap()
            .expect("user should exist");
        assert!(!created.is_admin);
        // stored credential is hashed, not the submitted plaintext
        assert_ne!(created.password, "pw123");

        let response = app
            .oneshot(form_post("/login", "username=alice&password=pw123", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("sid="));
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn wrong_password_rerenders_login_without_a_session() {
        let (state, store) = test_state();
        seed_user(&store, "alice", "pw123", false).await;
        let app = crate::app::build_app(state.clone());

        let response = app
            .oneshot(form_post("/login", "username=alice&password=nope", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(state.sessions.len(), 0);

        let body = body_string(response).await;
        assert!(body.contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn admin_login_redirects_to_the_console() {
        let (state, store) = test_state();
        seed_user(&store, "root", "pw123", true).await;
        let app = crate::app::build_app(state);

        let response = app
            .oneshot(form_post("/login", "username=root&password=pw123", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
    }

    #[tokio::test]
    async fn duplicate_signup_fails_with_the_generic_message() {
        let (state, store) = test_state();
        seed_user(&store, "alice", "pw123", false).await;
        let app = crate::app::build_app(state);

        let response = app
            .oneshot(form_post("/signup", "username=alice&password=other", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("Error registering new user"));
    }

    #[tokio::test]
    async fn logout_destroys_the_session() {
        let (state, store) = test_state();
        let user = seed_user(&store, "alice", "pw123", false).await;
        let sid = crate::testing::login_session(&state, &user);
        let app = crate::app::build_app(state.clone());

        let response = app
            .oneshot(get("/logout", Some(&sid)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert!(state.sessions.get(&sid).is_none());
    }

    #[tokio::test]
    async fn fixed_credential_pair_logs_in_as_admin() {
        use std::sync::Arc;

        use crate::config::AdminCredentials;
        use crate::testing::{test_state_with, FailingFetcher};

        let (state, _store) = test_state_with(
            Arc::new(FailingFetcher(503)),
            Some(AdminCredentials {
                username: "root".into(),
                password: "s3cret".into(),
            }),
        );
        let app = crate::app::build_app(state.clone());

        let response = app
            .oneshot(form_post("/login", "username=root&password=s3cret", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn login_page_shows_the_redirect_notice() {
        let (state, _store) = test_state();
        let app = crate::app::build_app(state);

        let response = app
            .oneshot(get("/login?message=Please%20log%20in", None))
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(body.contains("Please log in"));
    }
}
