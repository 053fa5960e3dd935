//! Manifest operations - loading and lookup

use crate::errors::ManifestError;
use crate::types::{ModuleManifest, SettingDeclaration};
use crate::validation;
use extmod_settings::{Scope, SettingValue};
use std::fs;
use std::path::Path;
use tracing::debug;

impl ModuleManifest {
    /// Load a manifest, choosing the parser by file extension
    pub fn load_from_path(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        let manifest = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            _ => return Err(ManifestError::UnsupportedFormat(path.to_path_buf())),
        };
        debug!(
            "Loaded manifest {:?}: {} system, {} project settings",
            path,
            manifest.system_settings.len(),
            manifest.project_settings.len()
        );
        Ok(manifest)
    }

    /// Load a manifest and reject it if it violates any configuration rule
    pub fn load_validated(path: &Path) -> Result<Self, ManifestError> {
        let manifest = Self::load_from_path(path)?;
        validation::validate(&manifest)?;
        Ok(manifest)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Name shown to operators, falling back to the module prefix
    pub fn display_name<'a>(&'a self, prefix: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(prefix)
    }

    /// Check if the manifest declares nothing
    pub fn is_empty(&self) -> bool {
        self.system_settings.is_empty() && self.project_settings.is_empty()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Find a declaration and the scope it was declared in
    pub fn declaration(&self, key: &str) -> Option<(Scope, &SettingDeclaration)> {
        self.declarations().find(|(_, decl)| decl.key == key)
    }

    /// Declared default of a system setting
    ///
    /// Defaults are metadata for configuration UIs; they are never written
    /// to the settings store.
    pub fn system_default(&self, key: &str) -> Option<&SettingValue> {
        self.system_settings
            .iter()
            .find(|decl| decl.key == key)
            .and_then(|decl| decl.default.as_ref())
    }

    /// All declarations in manifest order, system settings first
    pub fn declarations(&self) -> impl Iterator<Item = (Scope, &SettingDeclaration)> {
        self.system_settings
            .iter()
            .map(|decl| (Scope::System, decl))
            .chain(self.project_settings.iter().map(|decl| (Scope::Project, decl)))
    }
}
