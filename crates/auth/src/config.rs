//! Access-control configuration bundle.
//!
//! The engine needs no configuration input: [`RbacConfig::default`] yields the
//! built-in roles, rules and resource map. Deployments that white-label the
//! role set can supply the same structure as a JSON document instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use rolegate_core::ConfigResult;

use crate::{
    PolicyRule, ResourcePermissionMap, RoleDefinition, builtin_policies, builtin_roles,
};

/// What to do when the configured role hierarchy fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyValidation {
    /// Log the problem and keep going; cyclic walks are truncated silently.
    #[default]
    Lenient,
    /// Refuse to build the access-control service.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacConfig {
    #[serde(default = "builtin_roles")]
    pub roles: Vec<RoleDefinition>,
    #[serde(default = "builtin_policies")]
    pub policies: Vec<PolicyRule>,
    #[serde(default = "ResourcePermissionMap::builtin")]
    pub resource_permissions: ResourcePermissionMap,
    #[serde(default)]
    pub hierarchy_validation: HierarchyValidation,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            roles: builtin_roles(),
            policies: builtin_policies(),
            resource_permissions: ResourcePermissionMap::builtin(),
            hierarchy_validation: HierarchyValidation::default(),
        }
    }
}

impl RbacConfig {
    /// Parse a JSON document. Omitted sections fall back to the built-ins.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            roles = config.roles.len(),
            policies = config.policies.len(),
            "loaded rbac configuration"
        );
        Ok(config)
    }

    pub fn strict(mut self) -> Self {
        self.hierarchy_validation = HierarchyValidation::Strict;
        self
    }
}
