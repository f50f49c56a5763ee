use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl Video {
    /// Copy with a new video location. Owner and creation time are kept.
    pub fn with_video_url(&self, url: String, now: OffsetDateTime) -> Self {
        Self {
            video_url: Some(url),
            updated_at: now,
            ..self.clone()
        }
    }

    /// Copy with a new thumbnail location. Owner and creation time are kept.
    pub fn with_thumbnail_url(&self, url: String, now: OffsetDateTime) -> Self {
        Self {
            thumbnail_url: Some(url),
            updated_at: now,
            ..self.clone()
        }
    }
}
