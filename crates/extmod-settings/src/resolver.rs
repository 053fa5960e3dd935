//! Effective value resolution across scopes

use crate::errors::StoreError;
use crate::scope::{ProjectId, ScopeRef};
use crate::store::SettingsStore;
use crate::value::SettingValue;

/// Resolves PROJECT values with fallback to SYSTEM
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    store: SettingsStore,
}

impl SettingsResolver {
    pub fn new(store: SettingsStore) -> Self {
        SettingsResolver { store }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Effective value of `key`
    ///
    /// A PROJECT row wins when present, even if it holds null. Otherwise the
    /// SYSTEM row is used; with neither the result is null.
    pub fn get_effective(
        &self,
        module: &str,
        project: Option<ProjectId>,
        key: &str,
    ) -> Result<SettingValue, StoreError> {
        if let Some(pid) = project {
            if let Some(value) = self.store.get(module, ScopeRef::Project(pid), key)? {
                return Ok(value);
            }
        }

        Ok(self
            .store
            .get(module, ScopeRef::System, key)?
            .unwrap_or_default())
    }

    /// Write at PROJECT scope when a project is given, SYSTEM otherwise
    pub fn set_effective(
        &self,
        module: &str,
        project: Option<ProjectId>,
        key: &str,
        value: &SettingValue,
    ) -> Result<(), StoreError> {
        self.store
            .put(module, ScopeRef::from_project(project), key, value)
    }

    /// Remove at PROJECT scope when a project is given, SYSTEM otherwise
    pub fn remove_effective(
        &self,
        module: &str,
        project: Option<ProjectId>,
        key: &str,
    ) -> Result<(), StoreError> {
        self.store
            .remove(module, ScopeRef::from_project(project), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULE: &str = "example";

    fn resolver() -> SettingsResolver {
        SettingsResolver::new(SettingsStore::in_memory())
    }

    fn effective(resolver: &SettingsResolver, project: Option<ProjectId>) -> SettingValue {
        resolver
            .get_effective(MODULE, project, "key")
            .unwrap_or(SettingValue::String("<error>".to_string()))
    }

    #[test]
    fn test_nothing_set_resolves_null() {
        let resolver = resolver();
        assert_eq!(effective(&resolver, None), SettingValue::Null);
        assert_eq!(effective(&resolver, Some(1)), SettingValue::Null);
    }

    #[test]
    fn test_project_falls_back_to_system() {
        let resolver = resolver();
        assert!(resolver
            .set_effective(MODULE, None, "key", &SettingValue::from("system"))
            .is_ok());
        assert_eq!(effective(&resolver, Some(1)), SettingValue::from("system"));

        assert!(resolver
            .set_effective(MODULE, Some(1), "key", &SettingValue::from("project"))
            .is_ok());
        assert_eq!(effective(&resolver, Some(1)), SettingValue::from("project"));
        assert_eq!(effective(&resolver, None), SettingValue::from("system"));
        assert_eq!(effective(&resolver, Some(2)), SettingValue::from("system"));

        assert!(resolver.remove_effective(MODULE, Some(1), "key").is_ok());
        assert_eq!(effective(&resolver, Some(1)), SettingValue::from("system"));
    }

    #[test]
    fn test_stored_project_null_shadows_system() {
        let resolver = resolver();
        assert!(resolver
            .set_effective(MODULE, None, "key", &SettingValue::from(3))
            .is_ok());
        assert!(resolver
            .set_effective(MODULE, Some(1), "key", &SettingValue::Null)
            .is_ok());
        assert_eq!(effective(&resolver, Some(1)), SettingValue::Null);
    }

    #[test]
    fn test_project_write_never_touches_system() {
        let resolver = resolver();
        assert!(resolver
            .set_effective(MODULE, Some(4), "key", &SettingValue::from(true))
            .is_ok());
        assert!(matches!(
            resolver.store().get(MODULE, ScopeRef::System, "key"),
            Ok(None)
        ));
    }
}
