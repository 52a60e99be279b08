use rolegate_auth::{Role, Subject};
use rolegate_core::RequestId;

/// Subject context for a request (verified session + normalized role).
///
/// Inserted by the auth middleware on guarded routes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectContext {
    subject: Subject,
    highest_role: Option<Role>,
}

impl SubjectContext {
    pub fn new(subject: Subject, highest_role: Option<Role>) -> Self {
        Self {
            subject,
            highest_role,
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn highest_role(&self) -> Option<&Role> {
        self.highest_role.as_ref()
    }

    pub fn roles(&self) -> &[Role] {
        &self.subject.roles
    }
}

/// Correlation id for the current request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: RequestId,
}

impl RequestContext {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }
}
