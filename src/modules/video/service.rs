use super::model::Video;
use crate::common::error::AppError;
use crate::common::{keys, media_type, upload};
use crate::state::AppState;
use axum::extract::Multipart;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

const VIDEO_FIELD: &str = "video";
const THUMBNAIL_FIELD: &str = "thumbnail";
const THUMBNAIL_PREFIX: &str = "thumbnails";

/// Where an upload stopped. A request that fails is reported with the last
/// stage it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Received,
    Authorized,
    Staged,
    Remuxed,
    Classified,
    Uploaded,
    Recorded,
}

pub struct VideoService;

impl VideoService {
    pub async fn get_video(state: &AppState, video_id: Uuid) -> Result<Video, AppError> {
        state
            .videos
            .get(video_id)
            .await
            .map_err(AppError::Metadata)?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Stage, remux, classify and store a video, then record its URL.
    ///
    /// Temporary files are owned by this call and removed however it ends.
    pub async fn upload_video(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        mut multipart: Multipart,
    ) -> Result<Video, AppError> {
        let mut stage = UploadStage::Received;
        let result =
            Self::run_video_pipeline(state, video_id, user_id, &mut multipart, &mut stage).await;
        if let Err(e) = &result {
            warn!(%video_id, %user_id, ?stage, error = %e, "video upload failed");
        }
        result
    }

    /// Store an image and record its URL. No staging or external tools.
    pub async fn upload_thumbnail(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        mut multipart: Multipart,
    ) -> Result<Video, AppError> {
        let mut stage = UploadStage::Received;
        let result =
            Self::run_thumbnail_pipeline(state, video_id, user_id, &mut multipart, &mut stage)
                .await;
        if let Err(e) = &result {
            warn!(%video_id, %user_id, ?stage, error = %e, "thumbnail upload failed");
        }
        result
    }

    async fn run_video_pipeline(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        multipart: &mut Multipart,
        stage: &mut UploadStage,
    ) -> Result<Video, AppError> {
        let video = Self::authorize(state, video_id, user_id).await?;
        advance(stage, UploadStage::Authorized, video_id);

        let field = loop {
            match multipart.next_field().await? {
                Some(field) if field.name() == Some(VIDEO_FIELD) => break field,
                Some(_) => continue,
                None => return Err(missing_field(VIDEO_FIELD)),
            }
        };
        let media_type = media_type::validate(field.content_type(), media_type::VIDEO_TYPES)?;
        let extension = media_type::extension(&media_type);

        let staged = upload::stage(
            field,
            &state.config.staging_dir,
            &format!(".{}", extension),
            state.config.max_video_bytes,
        )
        .await?;
        debug!(%video_id, size = staged.size(), "video staged");
        advance(stage, UploadStage::Staged, video_id);

        let processed = state.toolchain.remux(staged.path()).await?;
        advance(stage, UploadStage::Remuxed, video_id);

        let orientation = state.toolchain.inspect(processed.path()).await?;
        advance(stage, UploadStage::Classified, video_id);

        let key = keys::storage_key(orientation.prefix(), extension);
        state
            .storage
            .put_file(&key, processed.path(), media_type.essence_str())
            .await?;
        info!(%video_id, %key, %orientation, "video stored");
        advance(stage, UploadStage::Uploaded, video_id);

        // Local copies are no longer needed once the object store has them.
        drop(processed);
        drop(staged);

        let url = state.storage.public_url(&key);
        let updated = video.with_video_url(url, OffsetDateTime::now_utc());
        state
            .videos
            .update(&updated)
            .await
            .map_err(AppError::Metadata)?;
        advance(stage, UploadStage::Recorded, video_id);

        Ok(updated)
    }

    async fn run_thumbnail_pipeline(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        multipart: &mut Multipart,
        stage: &mut UploadStage,
    ) -> Result<Video, AppError> {
        let video = Self::authorize(state, video_id, user_id).await?;
        advance(stage, UploadStage::Authorized, video_id);

        let field = loop {
            match multipart.next_field().await? {
                Some(field) if field.name() == Some(THUMBNAIL_FIELD) => break field,
                Some(_) => continue,
                None => return Err(missing_field(THUMBNAIL_FIELD)),
            }
        };
        let media_type = media_type::validate(field.content_type(), media_type::THUMBNAIL_TYPES)?;

        let data = upload::read_capped(field, state.config.max_thumbnail_bytes).await?;

        let key = keys::storage_key(THUMBNAIL_PREFIX, media_type::extension(&media_type));
        state
            .storage
            .put_bytes(&key, data, media_type.essence_str())
            .await?;
        info!(%video_id, %key, "thumbnail stored");
        advance(stage, UploadStage::Uploaded, video_id);

        let url = state.storage.public_url(&key);
        let updated = video.with_thumbnail_url(url, OffsetDateTime::now_utc());
        state
            .videos
            .update(&updated)
            .await
            .map_err(AppError::Metadata)?;
        advance(stage, UploadStage::Recorded, video_id);

        Ok(updated)
    }

    async fn authorize(state: &AppState, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = Self::get_video(state, video_id).await?;
        if video.user_id != user_id {
            return Err(AppError::Unauthorized("You don't own this video".to_string()));
        }
        Ok(video)
    }
}

fn advance(stage: &mut UploadStage, next: UploadStage, video_id: Uuid) {
    debug!(%video_id, from = ?*stage, to = ?next, "upload stage");
    *stage = next;
}

fn missing_field(name: &str) -> AppError {
    AppError::Validation(format!("Couldn't find {} field", name))
}
