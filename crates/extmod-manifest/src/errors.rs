use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Structural violations in a module's declared settings
///
/// Any of these prevents the module from being instantiated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The '{key}' setting key contains invalid characters. Only lowercase characters, numbers, dashes and underscores are allowed.")]
    InvalidKeyCharacters { key: String },

    #[error("The '{key}' setting key is used to define a system setting multiple times!")]
    DuplicateSystemKey { key: String },

    #[error("The '{key}' setting key is used to define a project setting multiple times!")]
    DuplicateProjectKey { key: String },

    #[error("The '{key}' setting key is defined on both the system and project level. Each key may only be used once.")]
    DuplicateAcrossScopes { key: String },

    #[error("Default values are only allowed on system settings, but the '{key}' project setting defines one.")]
    DefaultNotAllowedOnProjectSetting { key: String },
}

impl ConfigError {
    /// The setting key the violation was found on
    pub fn key(&self) -> &str {
        match self {
            ConfigError::InvalidKeyCharacters { key }
            | ConfigError::DuplicateSystemKey { key }
            | ConfigError::DuplicateProjectKey { key }
            | ConfigError::DuplicateAcrossScopes { key }
            | ConfigError::DefaultNotAllowedOnProjectSetting { key } => key,
        }
    }
}

/// Errors that can occur while loading a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse manifest JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse manifest TOML: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("Unsupported manifest format: {} (expected .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid module configuration: {0}")]
    Invalid(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_violation() {
        let err = ConfigError::DuplicateAcrossScopes {
            key: "some-key".to_string(),
        };
        assert!(err.to_string().contains("both the system and project level"));
        assert_eq!(err.key(), "some-key");

        let err = ConfigError::InvalidKeyCharacters {
            key: "A".to_string(),
        };
        assert!(err.to_string().contains("contains invalid characters"));
    }
}
