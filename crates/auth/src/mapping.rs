//! Fixed resource → action → permission table.
//!
//! Used as the fallback when no policy rule decides. Pairs missing from the
//! table have no permission and are therefore denied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Permission;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourcePermissionMap {
    entries: BTreeMap<String, BTreeMap<String, Permission>>,
}

impl ResourcePermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `(resource, action)` to `permission`, replacing any earlier entry.
    pub fn insert(
        &mut self,
        resource: impl Into<String>,
        action: impl Into<String>,
        permission: Permission,
    ) -> &mut Self {
        self.entries
            .entry(resource.into())
            .or_default()
            .insert(action.into(), permission);
        self
    }

    /// Map every listed action of `resource` to its conventional
    /// `resource:action` permission.
    pub fn with_conventional(mut self, resource: &str, actions: &[&str]) -> Self {
        for action in actions {
            self.insert(resource, *action, Permission::of(resource, action));
        }
        self
    }

    pub fn permission_for(&self, resource: &str, action: &str) -> Option<&Permission> {
        self.entries.get(resource)?.get(action)
    }

    pub fn builtin() -> Self {
        Self::new()
            .with_conventional("user", &["read", "write", "delete"])
            .with_conventional("profile", &["read", "write"])
            .with_conventional("dashboard", &["read"])
            .with_conventional("admin", &["read", "write"])
            .with_conventional("content", &["read", "moderate"])
            .with_conventional("reports", &["read", "write"])
            .with_conventional("system", &["configure"])
    }
}
