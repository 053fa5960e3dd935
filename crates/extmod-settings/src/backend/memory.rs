use super::StorageBackend;
use crate::errors::StoreError;
use crate::scope::SettingKey;
use ahash::AHashMap;
use parking_lot::RwLock;

/// In-process backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rows: RwLock<AHashMap<SettingKey, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &SettingKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.rows.read().get(key).cloned())
    }

    fn write(&self, key: &SettingKey, encoded: Vec<u8>) -> Result<(), StoreError> {
        self.rows.write().insert(key.clone(), encoded);
        Ok(())
    }

    fn delete(&self, key: &SettingKey) -> Result<(), StoreError> {
        self.rows.write().remove(key);
        Ok(())
    }
}
