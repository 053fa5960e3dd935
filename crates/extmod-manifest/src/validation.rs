//! Manifest validation
//!
//! Rules are checked in a fixed order so the same manifest always reports
//! the same first violation:
//! 1. key characters
//! 2. duplicates within system settings
//! 3. duplicates within project settings
//! 4. keys declared in both lists
//! 5. defaults on project settings
//!
//! Each rule scans declarations in manifest order.

use crate::errors::ConfigError;
use crate::types::{ModuleManifest, SettingDeclaration};
use ahash::AHashSet;

/// Check a setting key against `[a-z0-9_-]+`
pub fn is_setting_key_valid(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_'))
}

/// Validate a manifest, returning the first violation found
pub fn validate(manifest: &ModuleManifest) -> Result<(), ConfigError> {
    match validate_all(manifest).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Collect every violation, in reporting order
pub fn validate_all(manifest: &ModuleManifest) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let mut reported_invalid = AHashSet::new();
    for (_, decl) in manifest.declarations() {
        if !is_setting_key_valid(&decl.key) && reported_invalid.insert(decl.key.as_str()) {
            errors.push(ConfigError::InvalidKeyCharacters {
                key: decl.key.clone(),
            });
        }
    }

    for key in duplicate_keys(&manifest.system_settings) {
        errors.push(ConfigError::DuplicateSystemKey { key });
    }

    for key in duplicate_keys(&manifest.project_settings) {
        errors.push(ConfigError::DuplicateProjectKey { key });
    }

    let project_keys: AHashSet<&str> = manifest
        .project_settings
        .iter()
        .map(|decl| decl.key.as_str())
        .collect();
    let mut reported = AHashSet::new();
    for decl in &manifest.system_settings {
        if project_keys.contains(decl.key.as_str()) && reported.insert(decl.key.as_str()) {
            errors.push(ConfigError::DuplicateAcrossScopes {
                key: decl.key.clone(),
            });
        }
    }

    for decl in &manifest.project_settings {
        if decl.default.is_some() {
            errors.push(ConfigError::DefaultNotAllowedOnProjectSetting {
                key: decl.key.clone(),
            });
        }
    }

    errors
}

/// Keys declared more than once, each reported at its first repeat
fn duplicate_keys(declarations: &[SettingDeclaration]) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut reported = AHashSet::new();
    let mut duplicates = Vec::new();
    for decl in declarations {
        let key = decl.key.as_str();
        if !seen.insert(key) && reported.insert(key) {
            duplicates.push(key.to_string());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SettingDeclaration;

    fn manifest(system: &[&str], project: &[&str]) -> ModuleManifest {
        ModuleManifest {
            system_settings: system.iter().map(|k| SettingDeclaration::new(*k)).collect(),
            project_settings: project.iter().map(|k| SettingDeclaration::new(*k)).collect(),
            ..Default::default()
        }
    }

    fn message(result: Result<(), ConfigError>) -> String {
        result.err().map(|e| e.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_empty_config_is_valid() {
        assert_eq!(validate(&ModuleManifest::default()), Ok(()));
        assert_eq!(
            validate(&ModuleManifest::from_json_str("{}").unwrap_or_default()),
            Ok(())
        );
    }

    #[test]
    fn test_valid_keys() {
        assert_eq!(validate(&manifest(&["key1"], &["key-two"])), Ok(()));
        assert_eq!(validate(&manifest(&["snake_case", "9"], &["-", "_"])), Ok(()));
    }

    #[test]
    fn test_is_setting_key_valid() {
        for key in ["a", "2", "-", "_", "key1", "key-two", "key_three"] {
            assert!(is_setting_key_valid(key), "expected '{}' to be valid", key);
        }
        for key in ["A", "Key1", "!", "\"", "'", " ", "a b", "a.b", "é", ""] {
            assert!(!is_setting_key_valid(key), "expected '{}' to be invalid", key);
        }
    }

    #[test]
    fn test_invalid_characters() {
        assert!(message(validate(&manifest(&["A"], &[]))).contains("contains invalid characters"));
        assert!(message(validate(&manifest(&[], &["!"]))).contains("contains invalid characters"));
    }

    #[test]
    fn test_duplicate_across_scopes() {
        let result = validate(&manifest(&["some-key"], &["some-key"]));
        assert_eq!(
            result,
            Err(ConfigError::DuplicateAcrossScopes {
                key: "some-key".to_string()
            })
        );
        assert!(message(result).contains("both the system and project level"));
    }

    #[test]
    fn test_duplicate_within_scope() {
        let result = validate(&manifest(&["some-key", "some-key"], &[]));
        assert!(message(result).contains("system setting multiple times!"));

        let result = validate(&manifest(&[], &["some-key", "some-key"]));
        assert!(message(result).contains("project setting multiple times!"));
    }

    #[test]
    fn test_project_default_rejected() {
        let mut config = manifest(&[], &[]);
        config
            .project_settings
            .push(SettingDeclaration::new("some-setting").with_default(true));
        let result = validate(&config);
        assert!(message(result).contains("Default values are only allowed on system settings"));

        let mut config = manifest(&[], &[]);
        config
            .system_settings
            .push(SettingDeclaration::new("some-setting").with_default(true));
        assert_eq!(validate(&config), Ok(()));
    }

    #[test]
    fn test_detection_order_is_fixed() {
        // Every rule is violated; character class is reported first, then
        // the duplicate and default rules in their fixed order.
        let mut config = manifest(&["dup", "dup", "Bad", "both"], &["twice", "twice", "both"]);
        config
            .project_settings
            .push(SettingDeclaration::new("with-default").with_default(1));

        let errors = validate_all(&config);
        assert_eq!(
            errors,
            vec![
                ConfigError::InvalidKeyCharacters { key: "Bad".to_string() },
                ConfigError::DuplicateSystemKey { key: "dup".to_string() },
                ConfigError::DuplicateProjectKey { key: "twice".to_string() },
                ConfigError::DuplicateAcrossScopes { key: "both".to_string() },
                ConfigError::DefaultNotAllowedOnProjectSetting {
                    key: "with-default".to_string()
                },
            ]
        );
        assert_eq!(validate(&config), Err(errors[0].clone()));
    }

    #[test]
    fn test_triple_duplicate_reported_once() {
        let errors = validate_all(&manifest(&["x", "x", "x"], &[]));
        assert_eq!(
            errors,
            vec![ConfigError::DuplicateSystemKey { key: "x".to_string() }]
        );
    }

    #[test]
    fn test_invalid_key_reported_once() {
        let errors = validate_all(&manifest(&["Bad", "Bad"], &["Bad"]));
        assert_eq!(
            errors,
            vec![
                ConfigError::InvalidKeyCharacters { key: "Bad".to_string() },
                ConfigError::DuplicateSystemKey { key: "Bad".to_string() },
                ConfigError::DuplicateAcrossScopes { key: "Bad".to_string() },
            ]
        );
    }
}
