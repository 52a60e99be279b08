//! Authenticated subjects and their account metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_core::SubjectId;

use crate::Role;

// ─────────────────────────────────────────────────────────────────────────────
// Account Status
// ─────────────────────────────────────────────────────────────────────────────

/// Account status as reported by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is active and may use its roles.
    #[default]
    Active,
    /// Account exists but is not in use.
    Inactive,
    /// Account is suspended; every permission check is denied.
    Suspended,
    /// Account is awaiting activation.
    Pending,
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Inactive => write!(f, "inactive"),
            AccountStatus::Suspended => write!(f, "suspended"),
            AccountStatus::Pending => write!(f, "pending"),
        }
    }
}

/// Account metadata carried alongside a subject's roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMetadata {
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl Default for AccountMetadata {
    fn default() -> Self {
        Self {
            status: AccountStatus::Active,
            email_verified: false,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subject
// ─────────────────────────────────────────────────────────────────────────────

/// The authenticated user whose roles are evaluated for an access decision.
///
/// Built per request from session data and dropped afterwards. Role order is
/// irrelevant to permission computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub metadata: AccountMetadata,
}

impl Subject {
    pub fn new(id: impl Into<SubjectId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            image: None,
            roles: Vec::new(),
            metadata: AccountMetadata::default(),
        }
    }

    pub fn with_roles<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.metadata.status = status;
        self
    }

    pub fn is_suspended(&self) -> bool {
        self.metadata.status == AccountStatus::Suspended
    }

    /// Direct membership check; inheritance is not considered.
    pub fn holds(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
