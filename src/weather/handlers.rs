use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{error, instrument};

use crate::{
    providers::weather,
    session::{CurrentUser, MaybeUser},
    state::AppState,
    store::NewWeatherRecord,
    views,
};

const LOOKUP_ERROR: &str = "Failed to fetch data. Please try again.";
const LOGIN_NOTICE: &str =
    "/login?message=Please%20log%20in%20or%20sign%20up%20to%20view%20weather%20history";

#[derive(Debug, Deserialize)]
pub struct CityForm {
    pub city: String,
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".into())
}

#[instrument(skip(session))]
pub async fn index(MaybeUser(session): MaybeUser) -> Html<String> {
    let (username, is_admin) = match &session {
        Some(s) => (Some(s.username.as_str()), s.is_admin),
        None => (None, false),
    };
    views::index(username, is_admin, None, None)
}

#[instrument(skip(state, session, form), fields(city = %form.city))]
pub async fn lookup(
    State(state): State<AppState>,
    MaybeUser(session): MaybeUser,
    Form(form): Form<CityForm>,
) -> Result<Response, (StatusCode, String)> {
    let Some(session) = session else {
        return Ok(Redirect::to(LOGIN_NOTICE).into_response());
    };
    // the fixed-credential admin has no user record to own lookups
    let Some(user_id) = session.user_id else {
        return Ok(Redirect::to(LOGIN_NOTICE).into_response());
    };
    let username = Some(session.username.as_str());

    let fetched = weather::url(&form.city, &state.config.providers.openweather);
    let conditions = match fetched {
        Ok(url) => state
            .fetcher
            .get_json(url)
            .await
            .and_then(|payload| weather::extract(&payload)),
        Err(e) => Err(e),
    };

    let conditions = match conditions {
        Ok(conditions) => conditions,
        Err(e) => {
            error!(error = %e, city = %form.city, "weather lookup failed");
            return Ok(
                views::index(username, session.is_admin, None, Some(LOOKUP_ERROR)).into_response(),
            );
        }
    };

    let record = state
        .store
        .insert_weather(NewWeatherRecord {
            city: form.city.clone(),
            temperature: conditions.temperature,
            description: conditions.description,
            icon: conditions.icon_url,
            user_id,
            sunrise: conditions.sunrise,
            sunset: conditions.sunset,
            lon: conditions.lon,
            lat: conditions.lat,
        })
        .await
        .map_err(internal)?;

    Ok(views::index(username, session.is_admin, Some(&record), None).into_response())
}

#[instrument(skip(state, user))]
pub async fn history(State(state): State<AppState>, user: CurrentUser) -> Html<String> {
    match state.store.weather_history(user.user_id).await {
        Ok(records) => views::weather_history(&user.username, user.is_admin, &records, None),
        Err(e) => {
            error!(error = %e, user_id = %user.user_id, "weather history failed");
            views::weather_history(
                &user.username,
                user.is_admin,
                &[],
                Some("Error fetching weather history"),
            )
        }
    }
}
