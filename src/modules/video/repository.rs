use super::model::Video;
use crate::infrastructure::db::pool::DbPool;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Read-then-update access to video records.
///
/// The upload pipeline never creates or deletes videos. `update` writes
/// everything except `user_id` and `created_at`.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Video>>;

    async fn update(&self, video: &Video) -> Result<()>;
}

pub struct PgVideoRepository {
    pool: DbPool,
}

impl PgVideoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    async fn update(&self, video: &Video) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $1, description = $2, thumbnail_url = $3, video_url = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.updated_at)
        .bind(video.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("video {} disappeared before update", video.id));
        }
        Ok(())
    }
}

/// In-process repository for tests and local runs without Postgres.
#[derive(Default)]
pub struct MemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, Video>>,
}

impl MemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record, as the (external) create endpoint would.
    pub async fn insert(&self, video: Video) {
        self.videos.write().await.insert(video.id, video);
    }
}

#[async_trait]
impl VideoRepository for MemoryVideoRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Video>> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update(&self, video: &Video) -> Result<()> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&video.id)
            .ok_or_else(|| anyhow!("video {} disappeared before update", video.id))?;

        *stored = Video {
            user_id: stored.user_id,
            created_at: stored.created_at,
            ..video.clone()
        };
        Ok(())
    }
}
