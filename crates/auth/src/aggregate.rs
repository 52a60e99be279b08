//! Permission aggregation across a subject's roles.

use std::collections::HashSet;

use crate::{Permission, Role, RoleRegistry, role_hierarchy};

/// Union of the direct and inherited permissions of every role in `roles`.
///
/// Unknown roles contribute nothing. An empty role list yields an empty set.
pub fn user_permissions(registry: &RoleRegistry, roles: &[Role]) -> HashSet<Permission> {
    let mut permissions = HashSet::new();
    for role in roles {
        for ancestor in role_hierarchy(registry, role) {
            if let Some(definition) = registry.get(&ancestor) {
                permissions.extend(definition.permissions.iter().cloned());
            }
        }
    }
    permissions
}
