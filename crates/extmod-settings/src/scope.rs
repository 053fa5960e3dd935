//! Setting scopes and storage keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Project identifier used for PROJECT scope
pub type ProjectId = i64;

/// Setting scope kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Module-wide, no project context
    System,
    /// Per project
    Project,
}

/// A concrete scope instance
///
/// SYSTEM carries no project id and PROJECT always does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRef {
    System,
    Project(ProjectId),
}

impl ScopeRef {
    /// PROJECT scope when a project is given, SYSTEM otherwise
    pub fn from_project(project: Option<ProjectId>) -> Self {
        project.map_or(ScopeRef::System, ScopeRef::Project)
    }

    pub fn scope(&self) -> Scope {
        match self {
            ScopeRef::System => Scope::System,
            ScopeRef::Project(_) => Scope::Project,
        }
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            ScopeRef::System => None,
            ScopeRef::Project(pid) => Some(*pid),
        }
    }
}

impl fmt::Display for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeRef::System => write!(f, "system"),
            ScopeRef::Project(pid) => write!(f, "project {}", pid),
        }
    }
}

/// Full storage key of a setting row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingKey {
    pub module: Arc<str>,
    pub scope: ScopeRef,
    pub key: Arc<str>,
}

impl SettingKey {
    pub fn new(module: &str, scope: ScopeRef, key: &str) -> Self {
        SettingKey {
            module: Arc::from(module),
            scope,
            key: Arc::from(key),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.module, self.scope, self.key)
    }
}
