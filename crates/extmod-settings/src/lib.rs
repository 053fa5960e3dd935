//! Scoped settings for extmod modules
//!
//! Settings are typed values persisted per module at one of two scopes:
//! SYSTEM (module-wide) or PROJECT (per project id). This crate provides:
//! - [`SettingValue`], the closed set of storable value types
//! - a tagged codec that preserves those types through storage
//! - [`SettingsStore`], size-checked persistence over a [`StorageBackend`]
//! - [`SettingsResolver`], PROJECT-over-SYSTEM fallback resolution

pub mod backend;
pub mod codec;
pub mod errors;
pub mod resolver;
pub mod scope;
pub mod store;
pub mod value;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use codec::{decode, encode, encoded_size};
pub use errors::{CodecError, StoreError};
pub use resolver::SettingsResolver;
pub use scope::{ProjectId, Scope, ScopeRef, SettingKey};
pub use store::{SettingsStore, SETTING_SIZE_LIMIT};
pub use value::SettingValue;
