use super::model::Video;
use super::service::VideoService;
use crate::common::error::AppError;
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Extension, Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid ID".to_string()))
}

fn multipart_body(multipart: Result<Multipart, MultipartRejection>) -> Result<Multipart, AppError> {
    multipart.map_err(|e| AppError::Validation(format!("Couldn't parse form: {}", e.body_text())))
}

/// Get a video's metadata
#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video metadata", body = Video),
        (status = 400, description = "Invalid ID", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody)
    ),
    tag = "Videos"
)]
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<Video>, AppError> {
    let video_id = parse_video_id(&id)?;
    let video = VideoService::get_video(&state, video_id).await?;
    Ok(ApiSuccess(video, StatusCode::OK))
}

/// Upload a video file
///
/// The `video` part must be `video/mp4`. The file is remuxed for fast start,
/// classified by orientation and stored; the video's URL is updated.
#[utoipa::path(
    post,
    path = "/api/v1/videos/{id}/video",
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video stored", body = Video),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody),
        (status = 413, description = "Upload too large", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiSuccess<Video>, AppError> {
    let video_id = parse_video_id(&id)?;
    let multipart = multipart_body(multipart)?;

    info!(%video_id, user_id = %user.id, "uploading video");
    let video = VideoService::upload_video(&state, video_id, user.id, multipart).await?;

    Ok(ApiSuccess(video, StatusCode::OK))
}

/// Upload a thumbnail image
///
/// The `thumbnail` part must be `image/jpeg` or `image/png`.
#[utoipa::path(
    post,
    path = "/api/v1/videos/{id}/thumbnail",
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored", body = Video),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Video not found", body = ErrorBody),
        (status = 413, description = "Upload too large", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tag = "Videos",
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiSuccess<Video>, AppError> {
    let video_id = parse_video_id(&id)?;
    let multipart = multipart_body(multipart)?;

    info!(%video_id, user_id = %user.id, "uploading thumbnail");
    let video = VideoService::upload_thumbnail(&state, video_id, user.id, multipart).await?;

    Ok(ApiSuccess(video, StatusCode::OK))
}
