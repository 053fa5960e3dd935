//! Module manifest management
//!
//! A module ships a manifest (`config.json` or `config.toml`) declaring its
//! system settings, project settings and permissions. This crate parses
//! manifests and validates the structural rules a manifest must satisfy
//! before the module may be instantiated.

pub mod errors;
pub mod manifest;
pub mod types;
pub mod validation;

pub use errors::{ConfigError, ManifestError};
pub use types::{ModuleManifest, SettingDeclaration};
pub use validation::{is_setting_key_valid, validate, validate_all};
