//! Module runtime
//!
//! [`Module`] is the object hooks and pages talk to. It composes a validated
//! manifest, the scoped settings store and the module directory registry,
//! and exposes settings accessors, permission checks, request parameter
//! helpers and URL construction.

pub mod directory;
pub mod errors;
pub mod example;
pub mod hooks;
pub mod module;
pub mod params;

pub use directory::{
    builtin_hooks, installed_modules, load_module, ConfiguredDirectory, ModuleAction, ModuleDirectory,
    ModuleEntry,
};
pub use errors::ModuleError;
pub use hooks::{HookContext, HookFn, HookTable};
pub use module::{Module, ModuleIdentity};
pub use params::{RequestParams, EVENT_ID_PARAM, INSTANCE_PARAM, PROJECT_ID_PARAM};
