//! The example module bundled with the framework
//!
//! Demonstrates a hook that reads the current project and relies on
//! permissions declared in the module's manifest.

use crate::hooks::HookTable;

pub const PREFIX: &str = "example";

/// Permissions the example hook needs declared in its manifest
pub const REQUIRED_PERMISSIONS: &[&str] = &["select_data", "update_user_permissions"];

pub fn hooks() -> HookTable {
    HookTable::new().register("project_home_page", |module, ctx| {
        let project_id = module.require_project_id(ctx.project_id, &ctx.params)?;
        for permission in REQUIRED_PERMISSIONS {
            module.require_permission(permission)?;
        }
        Ok(Some(format!(
            "<script>\n\talert(\"This message came from an External Module hook!  Your project id is {}!\");\n</script>",
            project_id
        )))
    })
}
