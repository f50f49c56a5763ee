use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    let video_limit = body_limit(state.config.max_video_bytes);
    let thumbnail_limit = body_limit(state.config.max_thumbnail_bytes);

    let public_routes = Router::new().route("/{id}", get(handler::get_video));

    let protected_routes = Router::new()
        .route(
            "/{id}/video",
            post(handler::upload_video).layer(DefaultBodyLimit::max(video_limit)),
        )
        .route(
            "/{id}/thumbnail",
            post(handler::upload_thumbnail).layer(DefaultBodyLimit::max(thumbnail_limit)),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth::auth_middleware,
        ));

    public_routes.merge(protected_routes)
}

// The ceiling covers the field payload plus multipart framing.
fn body_limit(max_payload: u64) -> usize {
    usize::try_from(max_payload.saturating_add(64 * 1024)).unwrap_or(usize::MAX)
}
