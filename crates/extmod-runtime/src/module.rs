//! Module runtime facade

use crate::directory::ModuleDirectory;
use crate::errors::ModuleError;
use crate::hooks::{HookContext, HookTable};
use crate::params::{self, RequestParams, EVENT_ID_PARAM, INSTANCE_PARAM, PROJECT_ID_PARAM};
use extmod_manifest::{validation, ConfigError, ModuleManifest};
use extmod_settings::{
    ProjectId, ScopeRef, SettingValue, SettingsResolver, SettingsStore,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Module prefix and installed version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdentity {
    pub prefix: Arc<str>,
    pub version: Arc<str>,
}

impl ModuleIdentity {
    pub fn new(prefix: &str, version: &str) -> Self {
        ModuleIdentity {
            prefix: Arc::from(prefix),
            version: Arc::from(version),
        }
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_v{}", self.prefix, self.version)
    }
}

/// A live module instance
///
/// Can only be built from a manifest that passes validation. Settings
/// accessors go to the store on every call; nothing is cached here.
#[derive(Clone)]
pub struct Module {
    identity: ModuleIdentity,
    manifest: Arc<ModuleManifest>,
    settings: SettingsResolver,
    directory: Arc<dyn ModuleDirectory>,
    hooks: HookTable,
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("identity", &self.identity)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl Module {
    pub fn new(
        identity: ModuleIdentity,
        manifest: ModuleManifest,
        store: SettingsStore,
        directory: Arc<dyn ModuleDirectory>,
    ) -> Result<Self, ConfigError> {
        validation::validate(&manifest)?;
        debug!("Instantiated module {}", identity);
        Ok(Module {
            identity,
            manifest: Arc::new(manifest),
            settings: SettingsResolver::new(store),
            directory,
            hooks: HookTable::new(),
        })
    }

    pub fn with_hooks(mut self, hooks: HookTable) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    pub fn prefix(&self) -> &str {
        &self.identity.prefix
    }

    pub fn version(&self) -> &str {
        &self.identity.version
    }

    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    pub fn is_setting_key_valid(key: &str) -> bool {
        validation::is_setting_key_valid(key)
    }

    /// Declared default of a system setting, for configuration UIs
    pub fn declared_default(&self, key: &str) -> Option<&SettingValue> {
        self.manifest.system_default(key)
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    /// Stored SYSTEM value, or null when unset
    pub fn get_system_setting(&self, key: &str) -> Result<SettingValue, ModuleError> {
        Ok(self
            .settings
            .store()
            .get(self.prefix(), ScopeRef::System, key)?
            .unwrap_or_default())
    }

    pub fn set_system_setting(
        &self,
        key: &str,
        value: impl Into<SettingValue>,
    ) -> Result<(), ModuleError> {
        self.settings
            .store()
            .put(self.prefix(), ScopeRef::System, key, &value.into())?;
        Ok(())
    }

    pub fn remove_system_setting(&self, key: &str) -> Result<(), ModuleError> {
        self.settings
            .store()
            .remove(self.prefix(), ScopeRef::System, key)?;
        Ok(())
    }

    /// Effective value for a project, falling back to the SYSTEM value
    pub fn get_project_setting(
        &self,
        key: &str,
        project: ProjectId,
    ) -> Result<SettingValue, ModuleError> {
        Ok(self
            .settings
            .get_effective(self.prefix(), Some(project), key)?)
    }

    /// Write at PROJECT scope only
    pub fn set_project_setting(
        &self,
        key: &str,
        value: impl Into<SettingValue>,
        project: ProjectId,
    ) -> Result<(), ModuleError> {
        self.settings
            .set_effective(self.prefix(), Some(project), key, &value.into())?;
        Ok(())
    }

    /// Remove at PROJECT scope only; the SYSTEM value shows through again
    pub fn remove_project_setting(&self, key: &str, project: ProjectId) -> Result<(), ModuleError> {
        self.settings
            .remove_effective(self.prefix(), Some(project), key)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Permissions and URLs
    // -------------------------------------------------------------------------

    pub fn has_permission(&self, permission: &str) -> bool {
        self.manifest.has_permission(permission)
    }

    pub fn require_permission(&self, permission: &str) -> Result<(), ModuleError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(ModuleError::PermissionDenied {
                prefix: self.prefix().to_string(),
                permission: permission.to_string(),
            })
        }
    }

    /// URL of a file inside the module directory
    pub fn get_url(&self, relative_path: &str) -> String {
        format!(
            "{}/{}",
            self.directory.directory_url(self.prefix(), self.version()),
            relative_path
        )
    }

    // -------------------------------------------------------------------------
    // Request parameters
    // -------------------------------------------------------------------------

    pub fn detect_project_id(&self, explicit: Option<ProjectId>, params: &RequestParams) -> Option<ProjectId> {
        params::detect(explicit, params, PROJECT_ID_PARAM)
    }

    pub fn require_project_id(
        &self,
        explicit: Option<ProjectId>,
        params: &RequestParams,
    ) -> Result<ProjectId, ModuleError> {
        params::require(explicit, params, PROJECT_ID_PARAM)
    }

    pub fn detect_event_id(&self, explicit: Option<i64>, params: &RequestParams) -> Option<i64> {
        params::detect(explicit, params, EVENT_ID_PARAM)
    }

    pub fn require_event_id(
        &self,
        explicit: Option<i64>,
        params: &RequestParams,
    ) -> Result<i64, ModuleError> {
        params::require(explicit, params, EVENT_ID_PARAM)
    }

    pub fn detect_instance_id(&self, explicit: Option<i64>, params: &RequestParams) -> Option<i64> {
        params::detect(explicit, params, INSTANCE_PARAM)
    }

    pub fn require_instance_id(
        &self,
        explicit: Option<i64>,
        params: &RequestParams,
    ) -> Result<i64, ModuleError> {
        params::require(explicit, params, INSTANCE_PARAM)
    }

    // -------------------------------------------------------------------------
    // Hooks
    // -------------------------------------------------------------------------

    /// Run a registered hook; `Ok(None)` if this module doesn't handle it
    pub fn call_hook(&self, name: &str, ctx: &HookContext) -> Result<Option<String>, ModuleError> {
        let Some(hook) = self.hooks.get(name) else {
            debug!("Module {} has no '{}' hook", self.identity, name);
            return Ok(None);
        };
        debug!("Calling '{}' hook of {}", name, self.identity);
        hook(self, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ConfiguredDirectory;
    use extmod_manifest::SettingDeclaration;
    use extmod_settings::{StoreError, SETTING_SIZE_LIMIT};

    const PID: ProjectId = 17;
    const KEY: &str = "test-setting";

    fn directory() -> Arc<dyn ModuleDirectory> {
        Arc::new(ConfiguredDirectory::new("https://redcap.example.org/modules"))
    }

    fn module_with(manifest: ModuleManifest) -> Result<Module, ConfigError> {
        Module::new(
            ModuleIdentity::new("unit_test", "1.0"),
            manifest,
            SettingsStore::in_memory(),
            directory(),
        )
    }

    fn build(manifest: ModuleManifest) -> Module {
        match module_with(manifest) {
            Ok(m) => m,
            Err(e) => panic!("failed to build test module: {}", e),
        }
    }

    fn module() -> Module {
        build(ModuleManifest::default())
    }

    #[test]
    fn test_construction_fails_on_invalid_config() {
        let manifest = ModuleManifest {
            system_settings: vec![SettingDeclaration::new("some-key")],
            project_settings: vec![SettingDeclaration::new("some-key")],
            ..Default::default()
        };
        let result = module_with(manifest);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateAcrossScopes { ref key }) if key == "some-key"
        ));
    }

    #[test]
    fn test_is_setting_key_valid() {
        for key in ["a", "2", "-", "_"] {
            assert!(Module::is_setting_key_valid(key));
        }
        for key in ["A", "!", "\"", "'", " "] {
            assert!(!Module::is_setting_key_valid(key));
        }
    }

    #[test]
    fn test_system_settings() {
        let m = module();
        assert!(m.set_system_setting(KEY, 1_234_567).is_ok());
        assert_eq!(m.get_system_setting(KEY).ok(), Some(SettingValue::Int(1_234_567)));

        assert!(m.remove_system_setting(KEY).is_ok());
        assert_eq!(m.get_system_setting(KEY).ok(), Some(SettingValue::Null));
    }

    #[test]
    fn test_project_settings() {
        let m = module();
        let project_value = SettingValue::Int(111);
        let system_value = SettingValue::Int(222);

        assert!(m.set_project_setting(KEY, project_value.clone(), PID).is_ok());
        assert_eq!(m.get_project_setting(KEY, PID).ok(), Some(project_value.clone()));

        assert!(m.remove_project_setting(KEY, PID).is_ok());
        assert_eq!(m.get_project_setting(KEY, PID).ok(), Some(SettingValue::Null));

        assert!(m.set_system_setting(KEY, system_value.clone()).is_ok());
        assert_eq!(m.get_project_setting(KEY, PID).ok(), Some(system_value.clone()));

        assert!(m.set_project_setting(KEY, project_value.clone(), PID).is_ok());
        assert_eq!(m.get_project_setting(KEY, PID).ok(), Some(project_value));
        assert_eq!(m.get_system_setting(KEY).ok(), Some(system_value.clone()));

        assert!(m.remove_project_setting(KEY, PID).is_ok());
        assert_eq!(m.get_project_setting(KEY, PID).ok(), Some(system_value));
    }

    fn returned_type(m: &Module, value: SettingValue) -> &'static str {
        if m.set_project_setting(KEY, value, PID).is_err() {
            return "<set failed>";
        }
        m.get_project_setting(KEY, PID)
            .map(|v| v.type_name())
            .unwrap_or("<get failed>")
    }

    #[test]
    fn test_setting_type_consistency() {
        let m = module();
        assert_eq!(returned_type(&m, true.into()), "boolean");
        assert_eq!(returned_type(&m, 1.into()), "integer");
        assert_eq!(returned_type(&m, 1.1.into()), "float");
        assert_eq!(returned_type(&m, "1".into()), "string");
        assert_eq!(returned_type(&m, vec![1].into()), "list");
        assert_eq!(returned_type(&m, SettingValue::List(Vec::new())), "list");
        assert_eq!(returned_type(&m, SettingValue::Null), "null");
    }

    #[test]
    fn test_setting_type_changes() {
        let m = module();
        assert_eq!(returned_type(&m, "1".into()), "string");
        assert_eq!(returned_type(&m, 1.into()), "integer");
        assert_eq!(m.get_project_setting(KEY, PID).ok(), Some(SettingValue::Int(1)));
    }

    #[test]
    fn test_setting_size_limit() {
        let m = module();
        let data = "a".repeat(SETTING_SIZE_LIMIT + 1);
        let result = m.set_project_setting(KEY, data, PID);
        assert!(matches!(
            result,
            Err(ModuleError::Store(StoreError::ValueTooLarge { .. }))
        ));
        assert!(result.is_err_and(|e| e.to_string().contains("value is larger than")));
    }

    #[test]
    fn test_require_and_detect_parameters() {
        let m = module();
        type Require = fn(&Module, Option<i64>, &RequestParams) -> Result<i64, ModuleError>;
        type Detect = fn(&Module, Option<i64>, &RequestParams) -> Option<i64>;
        let cases: [(&str, Require, Detect); 3] = [
            ("pid", Module::require_project_id, Module::detect_project_id),
            ("event_id", Module::require_event_id, Module::detect_event_id),
            ("instance", Module::require_instance_id, Module::detect_instance_id),
        ];

        for (param, require, detect) in cases {
            let empty = RequestParams::new();
            let result = require(&m, None, &empty);
            assert!(
                result.is_err_and(|e| e.to_string().contains("You must supply")),
                "require for '{}' should fail without a value",
                param
            );
            assert_eq!(require(&m, Some(7), &empty).ok(), Some(7));
            assert_eq!(detect(&m, None, &empty), None);
            assert_eq!(detect(&m, Some(7), &empty), Some(7));

            let params = RequestParams::new().with(param, "42");
            assert_eq!(require(&m, None, &params).ok(), Some(42));
            assert_eq!(require(&m, Some(7), &params).ok(), Some(7));
            assert_eq!(detect(&m, None, &params), Some(42));
        }
    }

    #[test]
    fn test_has_permission() {
        let permission = "some_test_permission";

        let without = module_with(ModuleManifest::default()).ok();
        assert!(without.is_some_and(|m| !m.has_permission(permission)
            && m.require_permission(permission).is_err()));

        let manifest = ModuleManifest {
            permissions: vec![permission.to_string()],
            ..Default::default()
        };
        let with = module_with(manifest).ok();
        assert!(with.is_some_and(|m| m.has_permission(permission)
            && m.require_permission(permission).is_ok()));
    }

    #[test]
    fn test_get_url() {
        let m = module();
        let file_path = "images/foo.png";
        let expected = format!(
            "{}/{}",
            directory().directory_url(m.prefix(), m.version()),
            file_path
        );
        assert_eq!(m.get_url(file_path), expected);
        assert_eq!(
            m.get_url(file_path),
            "https://redcap.example.org/modules/unit_test_v1.0/images/foo.png"
        );
    }

    #[test]
    fn test_declared_default_is_not_materialized() {
        let manifest = ModuleManifest {
            system_settings: vec![SettingDeclaration::new("color").with_default("blue")],
            ..Default::default()
        };
        let m = build(manifest);
        assert_eq!(m.declared_default("color"), Some(&SettingValue::from("blue")));
        assert_eq!(m.get_system_setting("color").ok(), Some(SettingValue::Null));
    }

    #[test]
    fn test_unregistered_hook_is_skipped() {
        let m = module();
        let output = m.call_hook("project_home_page", &HookContext::default());
        assert!(matches!(output, Ok(None)));
    }
}
