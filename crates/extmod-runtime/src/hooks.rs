//! Hook callbacks
//!
//! A module contributes behavior to host pages by registering callbacks
//! under hook names (`project_home_page`, ...). The host decides when a hook
//! fires; this table only maps names to callbacks.

use crate::errors::ModuleError;
use crate::module::Module;
use crate::params::RequestParams;
use ahash::AHashMap;
use extmod_settings::ProjectId;
use std::fmt;
use std::sync::Arc;

/// Context the host passes to a hook
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    pub project_id: Option<ProjectId>,
    pub params: RequestParams,
}

/// Hook callback; `Ok(Some(html))` is output for the host to render
pub type HookFn =
    Arc<dyn Fn(&Module, &HookContext) -> Result<Option<String>, ModuleError> + Send + Sync>;

#[derive(Clone, Default)]
pub struct HookTable {
    hooks: AHashMap<Arc<str>, HookFn>,
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, replacing any previous one with the same name
    pub fn register<F>(mut self, name: &str, hook: F) -> Self
    where
        F: Fn(&Module, &HookContext) -> Result<Option<String>, ModuleError> + Send + Sync + 'static,
    {
        self.hooks.insert(Arc::from(name), Arc::new(hook));
        self
    }

    pub fn get(&self, name: &str) -> Option<&HookFn> {
        self.hooks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Registered hook names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(|k| k.as_ref()).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
