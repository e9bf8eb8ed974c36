use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{MediaStore, MediaStoreError};
use crate::domain::StoragePath;

pub struct LocalMediaStore {
    inner: Arc<LocalFileSystem>,
}

impl LocalMediaStore {
    pub fn new(base_path: PathBuf) -> Result<Self, MediaStoreError> {
        std::fs::create_dir_all(&base_path).map_err(MediaStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| MediaStoreError::WriteFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
        })
    }
}

#[async_trait::async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<(), MediaStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| MediaStoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, MediaStoreError> {
        let store_path = StorePath::from(path.as_str());
        let result = self
            .inner
            .get(&store_path)
            .await
            .map_err(|e| MediaStoreError::NotFound(e.to_string()))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| MediaStoreError::ReadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), MediaStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| MediaStoreError::DeleteFailed(e.to_string()))
    }

    async fn head(&self, path: &StoragePath) -> Result<u64, MediaStoreError> {
        let store_path = StorePath::from(path.as_str());
        let meta = self
            .inner
            .head(&store_path)
            .await
            .map_err(|e| MediaStoreError::NotFound(e.to_string()))?;
        Ok(meta.size as u64)
    }
}
