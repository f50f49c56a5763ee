use crate::config::settings::ConfigError;
use std::env;
use std::str::FromStr;

#[derive(Clone, Copy, Debug)]
pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    JwtSecret,
    PublicBaseUrl,
    StorageBackend,
    S3Bucket,
    S3Region,
    S3Endpoint,
    S3Distribution,
    S3AccessKey,
    S3SecretKey,
    StagingDir,
    FfmpegPath,
    FfprobePath,
    ToolTimeoutSecs,
    MaxVideoBytes,
    MaxThumbnailBytes,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::JwtSecret => "JWT_SECRET",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
            EnvKey::StorageBackend => "STORAGE_BACKEND",
            EnvKey::S3Bucket => "S3_BUCKET",
            EnvKey::S3Region => "S3_REGION",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3Distribution => "S3_CF_DISTRIBUTION",
            EnvKey::S3AccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::S3SecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::StagingDir => "STAGING_DIR",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::FfprobePath => "FFPROBE_PATH",
            EnvKey::ToolTimeoutSecs => "TOOL_TIMEOUT_SECS",
            EnvKey::MaxVideoBytes => "MAX_VIDEO_BYTES",
            EnvKey::MaxThumbnailBytes => "MAX_THUMBNAIL_BYTES",
        }
    }
}

/// Reads `key`, treating an unset or blank variable as absent.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str())
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    get_opt(key).unwrap_or_else(|| default.to_string())
}

/// Parses `key`, falling back to `default` only when it is unset or blank.
pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> Result<T, ConfigError> {
    parse_or(key, get_opt(key), default)
}

fn parse_or<T: FromStr>(key: EnvKey, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::Invalid {
            key: key.as_str(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_value_uses_the_default() {
        assert_eq!(parse_or(EnvKey::MaxVideoBytes, None, 1024u64).unwrap(), 1024);
    }

    #[test]
    fn set_value_is_parsed() {
        let parsed = parse_or(EnvKey::ToolTimeoutSecs, Some("30".to_string()), 600u64).unwrap();
        assert_eq!(parsed, 30);
    }

    #[test]
    fn unparsable_value_is_an_error_not_the_default() {
        let err = parse_or(EnvKey::MaxVideoBytes, Some("512MiB".to_string()), 1u64).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "MAX_VIDEO_BYTES", ref value } if value == "512MiB"
        ));

        let err = parse_or(EnvKey::ToolTimeoutSecs, Some("30s".to_string()), 600u64).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TOOL_TIMEOUT_SECS", .. }));

        let err = parse_or(EnvKey::ServerPort, Some("70000".to_string()), 3000u16).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "APP_PORT", .. }));
    }
}
