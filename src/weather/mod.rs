pub mod handlers;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index).post(handlers::lookup))
        .route("/weather-history", get(handlers::history))
}
