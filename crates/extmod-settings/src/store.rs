//! Settings store - typed, size-checked access to a storage backend

use crate::backend::{MemoryBackend, StorageBackend};
use crate::codec;
use crate::errors::StoreError;
use crate::scope::{ScopeRef, SettingKey};
use crate::value::SettingValue;
use std::sync::Arc;
use tracing::debug;

/// Maximum size in bytes of a stored (encoded) setting value
pub const SETTING_SIZE_LIMIT: usize = 65535;

/// Key/value persistence keyed by (module, scope, key)
///
/// Holds no cached values; every call goes to the backend.
#[derive(Clone)]
pub struct SettingsStore {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore").finish_non_exhaustive()
    }
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        SettingsStore { backend }
    }

    /// Store backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Write a value, replacing any existing row
    ///
    /// Values whose encoded size exceeds [`SETTING_SIZE_LIMIT`] are rejected
    /// before anything is written.
    pub fn put(
        &self,
        module: &str,
        scope: ScopeRef,
        key: &str,
        value: &SettingValue,
    ) -> Result<(), StoreError> {
        let size = codec::encoded_size(value)?;
        if size > SETTING_SIZE_LIMIT {
            return Err(StoreError::ValueTooLarge {
                key: key.to_string(),
                size,
                limit: SETTING_SIZE_LIMIT,
            });
        }

        let encoded = codec::encode(value)?;
        let row_key = SettingKey::new(module, scope, key);
        self.backend.write(&row_key, encoded)?;
        debug!("Set {} ({}, {} bytes)", row_key, value.type_name(), size);
        Ok(())
    }

    /// Read a value; `None` means no row exists, which differs from a stored null
    pub fn get(
        &self,
        module: &str,
        scope: ScopeRef,
        key: &str,
    ) -> Result<Option<SettingValue>, StoreError> {
        let row_key = SettingKey::new(module, scope, key);
        match self.backend.read(&row_key)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Remove a value; removing an absent key succeeds
    pub fn remove(&self, module: &str, scope: ScopeRef, key: &str) -> Result<(), StoreError> {
        let row_key = SettingKey::new(module, scope, key);
        self.backend.delete(&row_key)?;
        debug!("Removed {}", row_key);
        Ok(())
    }
}
