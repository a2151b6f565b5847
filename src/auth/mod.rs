mod dto;
pub mod handlers;
pub mod password;
pub mod policy;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::router()
}
