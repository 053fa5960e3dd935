//! Row persistence behind the settings store
//!
//! A backend stores opaque encoded rows. It knows nothing about value types
//! or size limits; those belong to [`crate::SettingsStore`].

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::errors::StoreError;
use crate::scope::SettingKey;

/// Persistence collaborator for encoded setting rows
///
/// `write` must be an atomic upsert: a concurrent `read` of the same key
/// sees either the previous row or the new one, never a partial value.
pub trait StorageBackend: Send + Sync {
    fn read(&self, key: &SettingKey) -> Result<Option<Vec<u8>>, StoreError>;

    fn write(&self, key: &SettingKey, encoded: Vec<u8>) -> Result<(), StoreError>;

    /// Delete a row; deleting an absent row is not an error
    fn delete(&self, key: &SettingKey) -> Result<(), StoreError>;
}
