use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use std::path::Path;
use thiserror::Error;

pub mod memory;
pub mod s3;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("couldn't read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("put {key} failed: {message}")]
    Put { key: String, message: String },

    #[error("get {key} failed: {message}")]
    Get { key: String, message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Object contents, pulled chunk by chunk as the response is written.
pub type ObjectBody = BoxStream<'static, Result<Bytes, std::io::Error>>;

pub struct StoredObject {
    pub body: ObjectBody,
    pub content_type: String,
    pub content_length: Option<u64>,
}

/// Durable home for finished assets.
///
/// Every put is a single, whole-object write. Nothing is retried here.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<()>;

    async fn put_bytes(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    async fn get(&self, key: &str) -> StorageResult<Option<StoredObject>>;

    /// Where clients fetch the object stored under `key`.
    fn public_url(&self, key: &str) -> String;
}
