use crate::config::settings::AppConfig;
use crate::infrastructure::storage::ObjectStore;
use crate::modules::video::repository::VideoRepository;
use crate::transcode::Toolchain;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn ObjectStore>,
    pub toolchain: Toolchain,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn ObjectStore>,
        toolchain: Toolchain,
    ) -> Self {
        Self {
            config,
            videos,
            storage,
            toolchain,
        }
    }
}
