//! Request/response DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rolegate_auth::{AccessContext, AccountStatus, Role, Subject};
use rolegate_core::SubjectId;

/// Body of `POST /rbac/check`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckAccessRequest {
    pub resource: String,
    pub action: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl CheckAccessRequest {
    pub fn into_context(self, subject_id: SubjectId) -> AccessContext {
        self.attributes.into_iter().fold(
            AccessContext::new(self.resource, self.action).for_subject(subject_id),
            |context, (key, value)| context.with_attribute(key, value),
        )
    }
}

/// Public view of the current subject.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectDto {
    pub id: SubjectId,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub roles: Vec<Role>,
    pub highest_role: Option<Role>,
    pub status: AccountStatus,
    pub email_verified: bool,
}

impl SubjectDto {
    pub fn new(subject: &Subject, highest_role: Option<&Role>) -> Self {
        Self {
            id: subject.id.clone(),
            email: subject.email.clone(),
            name: subject.name.clone(),
            image: subject.image.clone(),
            roles: subject.roles.clone(),
            highest_role: highest_role.cloned(),
            status: subject.metadata.status,
            email_verified: subject.metadata.email_verified,
        }
    }
}
