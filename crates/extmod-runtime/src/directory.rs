//! Module directory registry
//!
//! Resolves where an installed module is served from and enumerates the
//! modules declared in the framework configuration.

use crate::errors::ModuleError;
use crate::example;
use crate::hooks::HookTable;
use crate::module::{Module, ModuleIdentity};
use extmod_config::Config;
use extmod_manifest::ModuleManifest;
use extmod_settings::{ProjectId, SettingsStore};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Source of module directory URLs
pub trait ModuleDirectory: Send + Sync {
    fn directory_url(&self, prefix: &str, version: &str) -> String;
}

/// Modules served as `{base_url}/{prefix}_v{version}`
#[derive(Debug, Clone)]
pub struct ConfiguredDirectory {
    base_url: String,
}

impl ConfiguredDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        ConfiguredDirectory {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.get_base_url())
    }
}

impl ModuleDirectory for ConfiguredDirectory {
    fn directory_url(&self, prefix: &str, version: &str) -> String {
        format!("{}/{}_v{}", self.base_url, prefix, version)
    }
}

/// Action offered for an installed module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleAction {
    Configure,
    Update,
    Remove,
}

impl fmt::Display for ModuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModuleAction::Configure => "Configure",
            ModuleAction::Update => "Update",
            ModuleAction::Remove => "Remove",
        };
        f.write_str(label)
    }
}

/// An installed module as shown in listings
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    pub identity: ModuleIdentity,
    pub manifest: ModuleManifest,
}

impl ModuleEntry {
    pub fn display_name(&self) -> &str {
        self.manifest.display_name(&self.identity.prefix)
    }

    /// Configure is always offered; update and remove only outside a project
    pub fn actions(&self, project: Option<ProjectId>) -> Vec<ModuleAction> {
        match project {
            Some(_) => vec![ModuleAction::Configure],
            None => vec![
                ModuleAction::Configure,
                ModuleAction::Update,
                ModuleAction::Remove,
            ],
        }
    }
}

/// Load the manifests of every configured module, in configuration order
pub fn installed_modules(config: &Config) -> Result<Vec<ModuleEntry>, ModuleError> {
    config
        .modules
        .iter()
        .map(|installed| {
            let path = config.resolve(&installed.manifest);
            let manifest = ModuleManifest::load_from_path(&path)?;
            Ok(ModuleEntry {
                identity: ModuleIdentity::new(&installed.prefix, &installed.version),
                manifest,
            })
        })
        .collect()
}

/// Hooks shipped with the framework for a module prefix
pub fn builtin_hooks(prefix: &str) -> HookTable {
    match prefix {
        example::PREFIX => example::hooks(),
        _ => HookTable::new(),
    }
}

/// Instantiate a configured module
///
/// Fails if the module is not installed or its manifest is invalid.
pub fn load_module(config: &Config, prefix: &str, store: SettingsStore) -> Result<Module, ModuleError> {
    let installed = config
        .find_module(prefix)
        .ok_or_else(|| ModuleError::NotInstalled(prefix.to_string()))?;
    let manifest = ModuleManifest::load_from_path(&config.resolve(&installed.manifest))?;
    let directory = Arc::new(ConfiguredDirectory::from_config(config));

    let module = Module::new(
        ModuleIdentity::new(&installed.prefix, &installed.version),
        manifest,
        store,
        directory,
    )?
    .with_hooks(builtin_hooks(prefix));
    debug!("Loaded module {} with hooks {:?}", module.identity(), module.hooks());
    Ok(module)
}
