//! Role hierarchy resolution.
//!
//! Walks the `inherits` adjacency lists of a [`RoleRegistry`] depth-first.
//! A visited set keyed by role id makes every walk terminate, including on a
//! misconfigured, cyclic graph: a role seen twice is simply skipped.

use std::collections::HashSet;

use crate::{Role, RoleRegistry};

/// The role itself followed by every role it transitively inherits from.
///
/// Order is DFS insertion order with no duplicates. Unknown roles resolve to
/// just themselves.
pub fn role_hierarchy(registry: &RoleRegistry, role: &Role) -> Vec<Role> {
    let mut visited: HashSet<&Role> = HashSet::new();
    let mut out = Vec::new();
    // Explicit stack: config-supplied chains can be arbitrarily deep.
    let mut stack: Vec<&Role> = vec![role];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        out.push(current.clone());

        if let Some(definition) = registry.get(current) {
            stack.extend(definition.inherits.iter().rev());
        }
    }
    out
}

/// Whether `role` is `target` or inherits from it, directly or transitively.
pub fn role_inherits_from(registry: &RoleRegistry, role: &Role, target: &Role) -> bool {
    role == target || role_hierarchy(registry, role).iter().any(|r| r == target)
}

/// Pick the single most privileged registered role out of `roles`.
///
/// Privilege is measured by the size of a role's ancestor closure, so in a
/// chain the role at the top wins. Roles the registry does not know sit
/// outside the hierarchy and never outrank a registered one. Ties keep the
/// earliest listed role.
pub fn highest_role(registry: &RoleRegistry, roles: &[Role]) -> Option<Role> {
    let mut best: Option<(&Role, usize)> = None;
    for role in roles.iter().filter(|r| registry.contains(r)) {
        let rank = role_hierarchy(registry, role).len();
        match best {
            Some((_, best_rank)) if best_rank >= rank => {}
            _ => best = Some((role, rank)),
        }
    }
    best.map(|(role, _)| role.clone())
}
