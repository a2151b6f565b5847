use axum::{extract::State, response::Html, routing::get, Router};
use tracing::{error, instrument};

use crate::{providers::news, session::MaybeUser, state::AppState, views};

const LOOKUP_ERROR: &str = "Failed to fetch data. Please try again.";

pub fn router() -> Router<AppState> {
    Router::new().route("/news", get(headlines))
}

/// Open to visitors; headlines are never persisted.
#[instrument(skip(state, session))]
pub async fn headlines(
    State(state): State<AppState>,
    MaybeUser(session): MaybeUser,
) -> Html<String> {
    let (username, is_admin) = match &session {
        Some(s) => (Some(s.username.as_str()), s.is_admin),
        None => (None, false),
    };

    let fetched = news::url(&state.config.providers.news);
    let headlines = match fetched {
        Ok(url) => state
            .fetcher
            .get_json(url)
            .await
            .and_then(|payload| news::extract(&payload)),
        Err(e) => Err(e),
    };

    match headlines {
        Ok(headlines) => views::news(username, is_admin, &headlines, None),
        Err(e) => {
            error!(error = %e, "news lookup failed");
            views::news(username, is_admin, &[], Some(LOOKUP_ERROR))
        }
    }
}
