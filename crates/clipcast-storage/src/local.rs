use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use futures::StreamExt;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path`, creating the
    /// directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path with security validation.
    ///
    /// Keys are flat filenames; anything containing a separator or a `..`
    /// component could escape the base directory and is rejected outright.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.contains('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    async fn open_existing(&self, storage_key: &str) -> StorageResult<(PathBuf, fs::File)> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        Ok((path, file))
    }

    fn log_stream(stream: ByteStream, key: &str, path: &Path) -> ByteStream {
        let key = key.to_string();
        let path_display = path.display().to_string();
        Box::pin(stream.map(move |item| {
            if item.is_err() {
                tracing::error!(
                    path = %path_display,
                    key = %key,
                    "Local storage stream read error"
                );
            }
            item
        }))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(bytes_copied)
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        let (path, file) = self.open_existing(storage_key).await?;

        let stream = ReaderStream::new(file).map(|result| {
            result.map_err(|e| StorageError::DownloadFailed(format!("Failed to read chunk: {}", e)))
        });

        Ok(Self::log_stream(Box::pin(stream), storage_key, &path))
    }

    async fn download_range(
        &self,
        storage_key: &str,
        start: u64,
        length: u64,
    ) -> StorageResult<ByteStream> {
        let (path, mut file) = self.open_existing(storage_key).await?;

        file.seek(SeekFrom::Start(start)).await.map_err(|e| {
            StorageError::DownloadFailed(format!(
                "Failed to seek to {} in {}: {}",
                start,
                path.display(),
                e
            ))
        })?;

        let stream = ReaderStream::new(file.take(length)).map(|result| {
            result.map_err(|e| StorageError::DownloadFailed(format!("Failed to read chunk: {}", e)))
        });

        Ok(Self::log_stream(Box::pin(stream), storage_key, &path))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), key = %storage_key, "Local storage delete successful");

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn content_length(&self, storage_key: &str) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        let meta = fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(storage_key.to_string())
            } else {
                StorageError::BackendError(e.to_string())
            }
        })?;
        Ok(meta.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::tempdir;

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    async fn put(storage: &LocalStorage, key: &str, data: &[u8]) -> u64 {
        let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> =
            Box::pin(std::io::Cursor::new(data.to_vec()));
        storage.upload_stream(key, reader).await.unwrap()
    }

    #[tokio::test]
    async fn upload_then_download_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = b"some video bytes".to_vec();
        let written = put(&storage, "clip.mp4", &data).await;
        assert_eq!(written, data.len() as u64);

        let downloaded = collect(storage.download_stream("clip.mp4").await.unwrap()).await;
        assert_eq!(data, downloaded);
        assert_eq!(
            storage.content_length("clip.mp4").await.unwrap(),
            data.len() as u64
        );
    }

    #[tokio::test]
    async fn range_reads_are_byte_exact() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data: Vec<u8> = (0..=255u8).collect();
        put(&storage, "range.bin", &data).await;

        let chunk = collect(storage.download_range("range.bin", 10, 5).await.unwrap()).await;
        assert_eq!(chunk, &data[10..15]);

        // Open-ended tail read
        let tail = collect(storage.download_range("range.bin", 250, 100).await.unwrap()).await;
        assert_eq!(tail, &data[250..]);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert!(matches!(
            storage.download_stream("nope.mp4").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.content_length("nope.mp4").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!storage.exists("nope.mp4").await.unwrap());
        // Deleting a missing key is a no-op.
        storage.delete("nope.mp4").await.unwrap();
    }

    #[tokio::test]
    async fn path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.download_stream("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("..\\etc\\passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.content_length("media/nested").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
