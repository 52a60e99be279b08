use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings, conventionally `resource:action`
/// (e.g. "profile:read"). Only string equality matters for access checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Build the conventional `resource:action` token.
    pub fn of(resource: &str, action: &str) -> Self {
        Self(Cow::Owned(format!("{resource}:{action}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resource part of a `resource:action` token, if it has one.
    pub fn resource(&self) -> Option<&str> {
        self.as_str().split_once(':').map(|(resource, _)| resource)
    }

    /// Action part of a `resource:action` token, if it has one.
    pub fn action(&self) -> Option<&str> {
        self.as_str().split_once(':').map(|(_, action)| action)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}
