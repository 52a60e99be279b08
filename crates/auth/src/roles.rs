use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Role identifier used for RBAC.
///
/// Roles are opaque strings; what a role grants is defined by its
/// [`RoleDefinition`] in a [`RoleRegistry`](crate::RoleRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const VIEWER: Role = Role(Cow::Borrowed("viewer"));
    pub const USER: Role = Role(Cow::Borrowed("user"));
    pub const MODERATOR: Role = Role(Cow::Borrowed("moderator"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Static definition of a role.
///
/// Inheritance is plain data: `inherits` lists the ids of the parent roles
/// whose permissions this role also receives. The resulting graph is walked
/// explicitly by [`role_hierarchy`](crate::role_hierarchy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub id: Role,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub inherits: Vec<Role>,
}

impl RoleDefinition {
    pub fn new(id: Role, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            permissions: Vec::new(),
            inherits: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn inheriting<I>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        self.inherits = parents.into_iter().collect();
        self
    }
}
