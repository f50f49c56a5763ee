use super::{ObjectStore, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{StreamExt, stream};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Clone)]
struct MemoryObject {
    data: Bytes,
    content_type: String,
}

/// Process-local object store, served back through `/assets/{key}`.
///
/// Objects are inserted whole under the lock, so readers see either the old
/// object or the new one. Concurrent writes to one key: last write wins.
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, MemoryObject>>,
    base_url: String,
}

impl MemoryObjectStore {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    async fn insert(&self, key: &str, data: Bytes, content_type: &str) {
        let object = MemoryObject {
            data,
            content_type: content_type.to_string(),
        };
        self.objects.write().await.insert(key.to_string(), object);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<()> {
        let data = tokio::fs::read(path).await.map_err(|e| StorageError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        self.insert(key, Bytes::from(data), content_type).await;
        Ok(())
    }

    async fn put_bytes(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.insert(key, data, content_type).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredObject>> {
        let Some(object) = self.objects.read().await.get(key).cloned() else {
            return Ok(None);
        };

        // Slices share the stored buffer; nothing is copied per request.
        let data = object.data;
        let chunks: Vec<Bytes> = (0..data.len())
            .step_by(CHUNK_SIZE)
            .map(|start| data.slice(start..(start + CHUNK_SIZE).min(data.len())))
            .collect();

        Ok(Some(StoredObject {
            content_length: Some(data.len() as u64),
            body: stream::iter(chunks.into_iter().map(Ok::<_, std::io::Error>)).boxed(),
            content_type: object.content_type,
        }))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/assets/{}", self.base_url, key)
    }
}
