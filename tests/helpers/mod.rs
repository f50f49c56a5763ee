#![allow(dead_code)]

pub mod tools;

use anyhow::Result;
use async_trait::async_trait;
use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use time::macros::datetime;
use tubecast::app::create_app;
use tubecast::config::settings::{AppConfig, StorageBackend};
use tubecast::infrastructure::storage::MemoryObjectStore;
use tubecast::middleware::auth::TokenClaims;
use tubecast::modules::video::model::Video;
use tubecast::modules::video::repository::{MemoryVideoRepository, VideoRepository};
use tubecast::state::AppState;
use tubecast::transcode::Toolchain;
use uuid::Uuid;

pub use tools::{FakeTools, Remux};

pub const JWT_SECRET: &str = "test-secret";
pub const PUBLIC_BASE_URL: &str = "http://localhost:8091";
pub const MAX_VIDEO_BYTES: u64 = 256 * 1024;
pub const MAX_THUMBNAIL_BYTES: u64 = 4 * 1024;

/// Memory repository that also counts writes.
#[derive(Default)]
pub struct CountingRepository {
    inner: MemoryVideoRepository,
    updates: AtomicUsize,
}

impl CountingRepository {
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub async fn insert(&self, video: Video) {
        self.inner.insert(video).await;
    }
}

#[async_trait]
impl VideoRepository for CountingRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Video>> {
        self.inner.get(id).await
    }

    async fn update(&self, video: &Video) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(video).await
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<CountingRepository>,
    pub storage: Arc<MemoryObjectStore>,
    pub staging: TempDir,
    pub owner: Uuid,
    pub video: Video,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn owner_token(&self) -> String {
        token_for(self.owner)
    }

    /// Files left behind in the staging directory.
    pub fn staged_files(&self) -> Vec<String> {
        std::fs::read_dir(self.staging.path())
            .expect("staging dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect()
    }

    pub async fn stored_video(&self) -> Video {
        self.videos
            .get(self.video.id)
            .await
            .expect("repository")
            .expect("seeded video")
    }
}

pub fn token_for(user_id: Uuid) -> String {
    let now = get_current_timestamp() as usize;
    let claims = TokenClaims {
        sub: user_id,
        iat: now,
        exp: now + 15 * 60,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn test_config(staging: &TempDir) -> AppConfig {
    AppConfig {
        server_port: 0,
        database_url: String::new(),
        jwt_secret: JWT_SECRET.to_string(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        storage_backend: StorageBackend::Memory,
        s3: None,
        staging_dir: staging.path().to_path_buf(),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        tool_timeout: Duration::from_millis(500),
        max_video_bytes: MAX_VIDEO_BYTES,
        max_thumbnail_bytes: MAX_THUMBNAIL_BYTES,
    }
}

/// Router over in-memory collaborators, with one video owned by `owner`.
pub async fn setup_test_app(tools: FakeTools) -> TestApp {
    let staging = tempfile::tempdir().expect("Failed to create staging directory");
    let config = test_config(&staging);

    let owner = Uuid::new_v4();
    let video = Video {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Boots on the ground".to_string(),
        description: "Episode one".to_string(),
        thumbnail_url: None,
        video_url: None,
        created_at: datetime!(2024-01-01 09:00 UTC),
        updated_at: datetime!(2024-01-01 09:00 UTC),
    };

    let videos = Arc::new(CountingRepository::default());
    videos.insert(video.clone()).await;
    let storage = Arc::new(MemoryObjectStore::new(&config.public_base_url));

    let toolchain = Toolchain::new(
        Arc::new(tools),
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
        config.tool_timeout,
    );
    let state = AppState::new(config, videos.clone(), storage.clone(), toolchain);

    let server = TestServer::new(create_app(state)).expect("Failed to start test server");

    TestApp {
        server,
        videos,
        storage,
        staging,
        owner,
        video,
    }
}
