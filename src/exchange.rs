use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{error, instrument};

use crate::{
    providers::exchange_rate,
    session::{CurrentUser, MaybeUser},
    state::AppState,
    store::NewExchangeRateRecord,
    views,
};

const LOOKUP_ERROR: &str = "Error, please try again";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/exchange-rate", get(lookup))
        .route("/exchange-rate-history", get(history))
}

#[derive(Debug, Deserialize)]
pub struct RateQuery {
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: String,
}

fn default_from() -> String {
    "KZT".into()
}

fn default_to() -> String {
    "USD".into()
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".into())
}

/// Lookup is open to visitors; only authenticated lookups leave a record.
#[instrument(skip(state, session), fields(from = %query.from, to = %query.to))]
pub async fn lookup(
    State(state): State<AppState>,
    MaybeUser(session): MaybeUser,
    Query(query): Query<RateQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let (username, is_admin) = match &session {
        Some(s) => (Some(s.username.as_str()), s.is_admin),
        None => (None, false),
    };

    let fetched = exchange_rate::url(&query.from, &state.config.providers.exchange_rate);
    let rate = match fetched {
        Ok(url) => state
            .fetcher
            .get_json(url)
            .await
            .and_then(|payload| exchange_rate::extract(&payload, &query.to)),
        Err(e) => Err(e),
    };

    let rate = match rate {
        Ok(rate) => rate,
        Err(e) => {
            error!(error = %e, from = %query.from, to = %query.to, "exchange rate lookup failed");
            return Ok(views::exchange_rate(
                username,
                is_admin,
                &query.from,
                &query.to,
                None,
                Some(LOOKUP_ERROR),
            ));
        }
    };

    if let Some(user_id) = session.as_ref().and_then(|s| s.user_id) {
        state
            .store
            .insert_exchange_rate(NewExchangeRateRecord {
                from_currency: query.from.clone(),
                to_currency: query.to.clone(),
                rate,
                user_id,
            })
            .await
            .map_err(internal)?;
    }

    Ok(views::exchange_rate(
        username,
        is_admin,
        &query.from,
        &query.to,
        Some(rate),
        None,
    ))
}

#[instrument(skip(state, user))]
pub async fn history(State(state): State<AppState>, user: CurrentUser) -> Html<String> {
    match state.store.exchange_rate_history(user.user_id).await {
        Ok(records) => views::exchange_rate_history(&user.username, user.is_admin, &records, None),
        Err(e) => {
            error!(error = %e, user_id = %user.user_id, "exchange rate history failed");
            views::exchange_rate_history(
                &user.username,
                user.is_admin,
                &[],
                Some("Error retrieving your exchange rate history."),
            )
        }
    }
}
