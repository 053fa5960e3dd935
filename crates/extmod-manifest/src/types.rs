//! Manifest document types
//!
//! Only the fields the framework acts on are typed. Everything else a
//! module author writes (UI hints, links, sub-settings, ...) is kept in
//! `extra` and passed through untouched.

use extmod_settings::SettingValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A module's declared configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(rename = "system-settings", default)]
    pub system_settings: Vec<SettingDeclaration>,
    #[serde(rename = "project-settings", default)]
    pub project_settings: Vec<SettingDeclaration>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One declared setting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingDeclaration {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub setting_type: Option<String>,
    /// Only meaningful on system settings; `null` counts as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SettingValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SettingDeclaration {
    pub fn new(key: impl Into<String>) -> Self {
        SettingDeclaration {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_default(mut self, value: impl Into<SettingValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}
