use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use tracing::{error, instrument};

use crate::{
    providers::air_quality,
    session::CurrentUser,
    state::AppState,
    store::NewAirQualityRecord,
    views,
};

const LOOKUP_ERROR: &str = "Failed to fetch data. Please try again.";

pub fn router() -> Router<AppState> {
    Router::new().route("/air-quality/:city", get(lookup))
}

#[instrument(skip(state, user))]
pub async fn lookup(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(city): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    let fetched = air_quality::url(&city, &state.config.providers.air_quality);
    let reading = match fetched {
        Ok(url) => state
            .fetcher
            .get_json(url)
            .await
            .and_then(|payload| air_quality::extract(&payload)),
        Err(e) => Err(e),
    };

    let reading = match reading {
        Ok(reading) => reading,
        Err(e) => {
            error!(error = %e, %city, "air quality lookup failed");
            return Ok(views::air_quality(
                &user.username,
                user.is_admin,
                None,
                Some(LOOKUP_ERROR),
            ));
        }
    };

    let record = state
        .store
        .insert_air_quality(NewAirQualityRecord {
            city,
            aqi: reading.value,
            main_pollutant: air_quality::POLLUTANT.into(),
            user_id: user.user_id,
        })
        .await
        .map_err(|e| {
            error!(error = %e, "air quality insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error".to_string(),
            )
        })?;

    Ok(views::air_quality(
        &user.username,
        user.is_admin,
        Some(&record),
        None,
    ))
}
