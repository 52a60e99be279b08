//! Role registry: the authoritative map from role id to role definition.
//!
//! The registry is built once (from the built-in table or from configuration)
//! and only read afterwards. Lookups of unknown roles return `None`; callers
//! treat that as "contributes no permissions".

use std::collections::{HashMap, HashSet};

use rolegate_core::{ConfigError, ConfigResult};

use crate::{Role, RoleDefinition};

#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: HashMap<Role, RoleDefinition>,
    order: Vec<Role>,
    duplicates: Vec<Role>,
}

impl RoleRegistry {
    /// Build a registry from custom definitions.
    ///
    /// A later definition with an already-seen id replaces the earlier one;
    /// the duplicate is remembered and reported by [`RoleRegistry::validate`].
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = RoleDefinition>,
    {
        let mut registry = Self::default();
        for definition in definitions {
            let id = definition.id.clone();
            if registry.roles.insert(id.clone(), definition).is_some() {
                registry.duplicates.push(id);
            } else {
                registry.order.push(id);
            }
        }
        registry
    }

    /// The default `viewer → user → moderator → admin` chain.
    pub fn builtin() -> Self {
        Self::from_definitions(builtin_roles())
    }

    pub fn get(&self, role: &Role) -> Option<&RoleDefinition> {
        self.roles.get(role)
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.roles.contains_key(role)
    }

    /// Definitions in the order they were first registered.
    pub fn roles(&self) -> impl Iterator<Item = &RoleDefinition> {
        self.order.iter().filter_map(|id| self.roles.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check the registry for configuration mistakes.
    ///
    /// Evaluation never depends on this: traversal stays cycle-safe either
    /// way. This exists so startup code can refuse a broken hierarchy.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(dup) = self.duplicates.first() {
            return Err(ConfigError::DuplicateRole(dup.to_string()));
        }

        for definition in self.roles() {
            for parent in &definition.inherits {
                if !self.contains(parent) {
                    return Err(ConfigError::UnknownParent {
                        role: definition.id.to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        let mut finished: HashSet<&Role> = HashSet::new();
        for definition in self.roles() {
            self.find_cycle(&definition.id, &mut finished)?;
        }
        Ok(())
    }

    fn find_cycle<'a>(
        &'a self,
        start: &'a Role,
        finished: &mut HashSet<&'a Role>,
    ) -> ConfigResult<()> {
        if finished.contains(start) {
            return Ok(());
        }

        // (role, index of the next parent to visit); the stack is the current path.
        let mut stack: Vec<(&'a Role, usize)> = vec![(start, 0)];
        let mut on_path: HashSet<&'a Role> = HashSet::from([start]);

        while let Some(top) = stack.last_mut() {
            let role = top.0;
            let next = top.1;
            top.1 += 1;

            match self.get(role).and_then(|d| d.inherits.get(next)) {
                Some(parent) if finished.contains(parent) => {}
                Some(parent) if on_path.contains(parent) => {
                    let from = stack.iter().position(|(r, _)| *r == parent).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[from..].iter().map(|(r, _)| r.to_string()).collect();
                    cycle.push(parent.to_string());
                    return Err(ConfigError::InheritanceCycle(cycle));
                }
                Some(parent) => {
                    on_path.insert(parent);
                    stack.push((parent, 0));
                }
                None => {
                    stack.pop();
                    on_path.remove(role);
                    finished.insert(role);
                }
            }
        }
        Ok(())
    }
}

/// Built-in role table.
pub fn builtin_roles() -> Vec<RoleDefinition> {
    vec![
        RoleDefinition::new(Role::VIEWER, "Viewer")
            .with_description("Read-only access to the dashboard and own profile")
            .with_permissions(["dashboard:read", "profile:read"]),
        RoleDefinition::new(Role::USER, "User")
            .with_description("Signed-in user who can manage their own profile")
            .with_permissions(["user:read", "profile:read", "profile:write", "dashboard:read"])
            .inheriting([Role::VIEWER]),
        RoleDefinition::new(Role::MODERATOR, "Moderator")
            .with_description("Moderates content and manages regular users")
            .with_permissions([
                "user:read",
                "user:write",
                "content:read",
                "content:moderate",
                "reports:read",
            ])
            .inheriting([Role::USER]),
        RoleDefinition::new(Role::ADMIN, "Administrator")
            .with_description("Full system administrator")
            .with_permissions([
                "admin:read",
                "admin:write",
                "user:delete",
                "reports:write",
                "system:configure",
            ])
            .inheriting([Role::MODERATOR]),
    ]
}
