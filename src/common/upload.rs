use crate::common::error::AppError;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// An upload written to local disk.
///
/// The file is removed when this value is dropped, on every exit path of the
/// request that owns it.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Streams `body` into a uniquely named file under `dir`.
///
/// At most `limit` bytes are accepted. The check happens per chunk, before the
/// chunk is written, so an oversized body never lands on disk in full.
pub async fn stage<S, E>(
    body: S,
    dir: &Path,
    suffix: &str,
    limit: u64,
) -> Result<StagedFile, AppError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<AppError>,
{
    let mut body = std::pin::pin!(body);
    let named = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(suffix)
        .tempfile_in(dir)
        .map_err(AppError::Staging)?;
    let mut file = tokio::fs::File::from_std(named.reopen().map_err(AppError::Staging)?);

    let mut size: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Into::into)?;
        size += chunk.len() as u64;
        if size > limit {
            debug!(limit, "staged upload exceeded its limit");
            return Err(AppError::PayloadTooLarge);
        }
        file.write_all(&chunk).await.map_err(AppError::Staging)?;
    }
    file.flush().await.map_err(AppError::Staging)?;

    debug!(path = %named.path().display(), size, "upload staged");
    Ok(StagedFile { file: named, size })
}

/// Buffers `body` in memory, refusing more than `limit` bytes.
pub async fn read_capped<S, E>(body: S, limit: u64) -> Result<Bytes, AppError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<AppError>,
{
    let mut body = std::pin::pin!(body);
    let mut buffer = BytesMut::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Into::into)?;
        if (buffer.len() + chunk.len()) as u64 > limit {
            return Err(AppError::PayloadTooLarge);
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn body(chunks: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, AppError>> + Unpin {
        stream::iter(
            chunks
                .iter()
                .map(|c| Ok(Bytes::from_static(*c)))
                .collect::<Vec<_>>(),
        )
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn stages_the_whole_body() {
        let dir = tempfile::tempdir().unwrap();

        let staged = stage(body(&[b"hello ", b"world"]), dir.path(), ".mp4", 64)
            .await
            .unwrap();

        assert_eq!(staged.size(), 11);
        assert!(staged.path().starts_with(dir.path()));
        assert_eq!(staged.path().extension().unwrap(), "mp4");
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn dropping_the_staged_file_removes_it() {
        let dir = tempfile::tempdir().unwrap();

        let staged = stage(body(&[b"abc"]), dir.path(), ".mp4", 64).await.unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_and_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();

        let err = stage(body(&[b"12345", b"67890"]), dir.path(), ".mp4", 8)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn body_exactly_at_the_limit_is_accepted() {
        let dir = tempfile::tempdir().unwrap();

        let staged = stage(body(&[b"1234", b"5678"]), dir.path(), ".mp4", 8)
            .await
            .unwrap();
        assert_eq!(staged.size(), 8);
    }

    #[tokio::test]
    async fn stream_errors_abort_staging() {
        let dir = tempfile::tempdir().unwrap();
        let failing = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(AppError::Validation("Couldn't parse form".to_string())),
        ]);

        let err = stage(failing, dir.path(), ".mp4", 1024).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn missing_staging_dir_is_a_staging_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = stage(body(&[b"abc"]), &missing, ".mp4", 64).await.unwrap_err();
        assert!(matches!(err, AppError::Staging(_)));
    }

    #[tokio::test]
    async fn read_capped_buffers_and_enforces_limit() {
        let data = read_capped(body(&[b"ab", b"cd"]), 4).await.unwrap();
        assert_eq!(&data[..], b"abcd");

        let err = read_capped(body(&[b"ab", b"cde"]), 4).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge));
    }
}
