use bytes::Bytes;

use crate::domain::StoragePath;

/// Staging of uploaded and generated blobs under session-scoped paths.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<(), MediaStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, MediaStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), MediaStoreError>;

    async fn head(&self, path: &StoragePath) -> Result<u64, MediaStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaStoreError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
