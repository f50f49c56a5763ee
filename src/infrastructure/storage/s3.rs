use super::{ObjectStore, StorageError, StorageResult, StoredObject};
use crate::config::settings::S3Settings;
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use futures_util::StreamExt;
use std::path::Path;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    distribution: Option<String>,
}

impl S3ObjectStore {
    pub fn new(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key,
            &settings.secret_key,
            None,
            None,
            "static",
        );

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &settings.endpoint {
            // S3-compatible services (MinIO) want path-style addressing
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        info!(bucket = %settings.bucket, region = %settings.region, "S3 object store configured");

        Self {
            client,
            bucket: settings.bucket.clone(),
            region: settings.region.clone(),
            endpoint: settings.endpoint.clone(),
            distribution: settings.distribution.clone(),
        }
    }

    async fn put(&self, key: &str, body: ByteStream, content_type: &str) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        debug!(bucket = %self.bucket, key, "object stored");
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                message: format!("couldn't open {}: {}", path.display(), e),
            })?;
        self.put(key, body, content_type).await
    }

    async fn put_bytes(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.put(key, ByteStream::from(data), content_type).await
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredObject>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::Get {
                    key: key.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                });
            }
        };

        let content_type = output
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let content_length = output.content_length().and_then(|n| u64::try_from(n).ok());
        let body = ReaderStream::new(output.body.into_async_read()).boxed();

        Ok(Some(StoredObject {
            body,
            content_type,
            content_length,
        }))
    }

    fn public_url(&self, key: &str) -> String {
        object_url(
            self.distribution.as_deref(),
            self.endpoint.as_deref(),
            &self.bucket,
            &self.region,
            key,
        )
    }
}

/// CDN host wins, then a custom endpoint, then the regional AWS host.
pub fn object_url(
    distribution: Option<&str>,
    endpoint: Option<&str>,
    bucket: &str,
    region: &str,
    key: &str,
) -> String {
    match (distribution, endpoint) {
        (Some(cdn), _) => {
            let host = cdn
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/');
            format!("https://{}/{}", host, key)
        }
        (None, Some(endpoint)) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        (None, None) => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}
