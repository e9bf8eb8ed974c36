use std::collections::HashMap;
use std::sync::Mutex;

use bytes::Bytes;

use crate::application::ports::{MediaStore, MediaStoreError};
use crate::domain::StoragePath;

/// HashMap-backed staging store for tests and local scaffolding.
#[derive(Default)]
pub struct InMemoryMediaStore {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("store lock poisoned").len()
    }
}

#[async_trait::async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<(), MediaStoreError> {
        self.objects
            .lock()
            .map_err(|e| MediaStoreError::WriteFailed(e.to_string()))?
            .insert(path.as_str().to_string(), data);
        Ok(())
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, MediaStoreError> {
        self.objects
            .lock()
            .map_err(|e| MediaStoreError::ReadFailed(e.to_string()))?
            .get(path.as_str())
            .map(|b| b.to_vec())
            .ok_or_else(|| MediaStoreError::NotFound(path.as_str().to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), MediaStoreError> {
        self.objects
            .lock()
            .map_err(|e| MediaStoreError::DeleteFailed(e.to_string()))?
            .remove(path.as_str());
        Ok(())
    }

    async fn head(&self, path: &StoragePath) -> Result<u64, MediaStoreError> {
        self.objects
            .lock()
            .map_err(|e| MediaStoreError::ReadFailed(e.to_string()))?
            .get(path.as_str())
            .map(|b| b.len() as u64)
            .ok_or_else(|| MediaStoreError::NotFound(path.as_str().to_string()))
    }
}
