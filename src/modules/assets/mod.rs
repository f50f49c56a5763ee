use crate::state::AppState;
use axum::Router;
use axum::routing::get;

pub mod handler;

pub fn router() -> Router<AppState> {
    Router::new().route("/{*key}", get(handler::get_asset))
}
