use crate::config::env::{self, EnvKey};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_VIDEO_BYTES: u64 = 1 << 30;
const DEFAULT_MAX_THUMBNAIL_BYTES: u64 = 10 << 20;
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Where finished assets are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid {
                key: EnvKey::StorageBackend.as_str(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub distribution: Option<String>,
    pub access_key: String,
    pub secret_key: String,
}

impl S3Settings {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: required(EnvKey::S3Bucket)?,
            region: env::get_or(EnvKey::S3Region, "us-east-1"),
            endpoint: env::get_opt(EnvKey::S3Endpoint),
            distribution: env::get_opt(EnvKey::S3Distribution),
            access_key: required(EnvKey::S3AccessKey)?,
            secret_key: required(EnvKey::S3SecretKey)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub public_base_url: String,
    pub storage_backend: StorageBackend,
    pub s3: Option<S3Settings>,
    pub staging_dir: PathBuf,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub tool_timeout: Duration,
    pub max_video_bytes: u64,
    pub max_thumbnail_bytes: u64,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let server_port = env::get_parsed(EnvKey::ServerPort, 3000)?;

        let public_base_url = env::get_or(
            EnvKey::PublicBaseUrl,
            &format!("http://localhost:{}", server_port),
        );
        url::Url::parse(&public_base_url).map_err(|_| ConfigError::Invalid {
            key: EnvKey::PublicBaseUrl.as_str(),
            value: public_base_url.clone(),
        })?;

        let storage_backend = match env::get_opt(EnvKey::StorageBackend) {
            Some(raw) => raw.parse()?,
            None => StorageBackend::S3,
        };
        let s3 = match storage_backend {
            StorageBackend::S3 => Some(S3Settings::from_env()?),
            StorageBackend::Memory => None,
        };

        let tool_timeout_secs =
            env::get_parsed(EnvKey::ToolTimeoutSecs, DEFAULT_TOOL_TIMEOUT_SECS)?;
        let max_video_bytes = env::get_parsed(EnvKey::MaxVideoBytes, DEFAULT_MAX_VIDEO_BYTES)?;
        let max_thumbnail_bytes =
            env::get_parsed(EnvKey::MaxThumbnailBytes, DEFAULT_MAX_THUMBNAIL_BYTES)?;

        let staging_dir = env::get_opt(EnvKey::StagingDir)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("tubecast-staging"));

        Ok(Self {
            server_port,
            database_url: required(EnvKey::DatabaseUrl)?,
            jwt_secret: required(EnvKey::JwtSecret)?,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            storage_backend,
            s3,
            staging_dir,
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            ffprobe_path: env::get_or(EnvKey::FfprobePath, "ffprobe"),
            tool_timeout: Duration::from_secs(tool_timeout_secs),
            max_video_bytes,
            max_thumbnail_bytes,
        })
    }
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    env::get_opt(key).ok_or(ConfigError::Missing(key.as_str()))
}
