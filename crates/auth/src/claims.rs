use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rolegate_core::SubjectId;

use crate::{AccountMetadata, AccountStatus, Role, Subject};

/// Session claims model (transport-agnostic).
///
/// This is the set of claims expected once a session token has been decoded
/// and verified by whatever transport/security layer is in use. Providers
/// that issue a single `role` claim and providers that issue a `roles` list
/// are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject identifier from the identity provider.
    pub sub: SubjectId,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    /// Single role claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Role list claim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(default)]
    pub account_status: AccountStatus,

    /// Issued-at timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

impl SessionClaims {
    /// All role claims, list first, without duplicates.
    pub fn all_roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = Vec::with_capacity(self.roles.len() + 1);
        for role in self.roles.iter().chain(self.role.iter()) {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
        roles
    }

    /// Build the per-request subject these claims describe.
    pub fn to_subject(&self) -> Subject {
        Subject {
            id: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            image: self.picture.clone(),
            roles: self.all_roles(),
            metadata: AccountMetadata {
                status: self.account_status,
                email_verified: self.email_verified,
                created_at: self.iat,
                last_login: Some(self.iat),
            },
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate session claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding is
/// intentionally outside this crate.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
