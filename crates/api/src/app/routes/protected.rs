//! Demo content behind the route guard.
//!
//! Each handler can assume the guard already admitted the subject with at
//! least the role its path prefix requires.

use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};
use serde_json::json;

use rolegate_auth::AccessControl;

use crate::app::dto::SubjectDto;
use crate::context::SubjectContext;

/// GET /dashboard (viewer and up)
pub async fn dashboard(Extension(ctx): Extension<SubjectContext>) -> impl IntoResponse {
    let subject = ctx.subject();
    Json(json!({
        "message": format!("Welcome, {}", subject.name.as_deref().unwrap_or(&subject.email)),
        "highest_role": ctx.highest_role(),
    }))
}

/// GET /profile (user and up)
pub async fn profile(Extension(ctx): Extension<SubjectContext>) -> impl IntoResponse {
    Json(json!({ "profile": SubjectDto::new(ctx.subject(), ctx.highest_role()) }))
}

/// GET /moderation/queue (moderator and up)
pub async fn moderation_queue(
    Extension(access): Extension<Arc<AccessControl>>,
    Extension(ctx): Extension<SubjectContext>,
) -> impl IntoResponse {
    let subject = Some(ctx.subject());
    Json(json!({
        "items": [],
        "can_moderate": access.validate_access(subject, "content", "moderate"),
        "can_manage_users": access.validate_access(subject, "user", "write"),
    }))
}

/// GET /admin/overview (admin only)
pub async fn admin_overview(Extension(access): Extension<Arc<AccessControl>>) -> impl IntoResponse {
    let rules: Vec<_> = access
        .policies()
        .rules()
        .iter()
        .map(|r| json!({ "id": r.id, "resource": r.resource, "effect": r.effect }))
        .collect();
    Json(json!({
        "roles": access.registry().len(),
        "policies": rules,
        "resource_permissions": access.resource_permissions(),
    }))
}
