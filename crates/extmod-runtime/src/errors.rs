use extmod_manifest::{ConfigError, ManifestError};
use extmod_settings::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("You must supply the '{name}' parameter")]
    MissingRequiredParameter { name: String },

    #[error("The '{prefix}' module must declare the '{permission}' permission")]
    PermissionDenied { prefix: String, permission: String },

    #[error("Module '{0}' is not installed")]
    NotInstalled(String),
}
