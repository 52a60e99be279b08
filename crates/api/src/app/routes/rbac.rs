//! RBAC introspection endpoints for authorization debugging.
//!
//! These answer "what can I do?" and "why was this request denied?" for the
//! current subject, and expose resolved role definitions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use rolegate_auth::{AccessControl, Role};

use crate::app::dto::{CheckAccessRequest, SubjectDto};
use crate::app::errors;
use crate::context::{RequestContext, SubjectContext};

pub fn router() -> Router {
    Router::new()
        .route("/me", get(me))
        .route("/roles", get(list_roles))
        .route("/roles/:role", get(get_role))
        .route("/check", post(check_access))
}

/// GET /rbac/me - Current subject and effective permissions
pub async fn me(
    Extension(access): Extension<Arc<AccessControl>>,
    Extension(ctx): Extension<SubjectContext>,
) -> axum::response::Response {
    let mut permissions: Vec<String> = access
        .user_permissions(ctx.roles())
        .into_iter()
        .map(|p| p.as_str().to_string())
        .collect();
    permissions.sort();

    (
        StatusCode::OK,
        Json(json!({
            "subject": SubjectDto::new(ctx.subject(), ctx.highest_role()),
            "permissions": permissions,
        })),
    )
        .into_response()
}

/// GET /rbac/roles - All roles with computed permissions
pub async fn list_roles(Extension(access): Extension<Arc<AccessControl>>) -> axum::response::Response {
    let roles = access.role_definitions();
    (StatusCode::OK, Json(json!({ "roles": roles }))).into_response()
}

/// GET /rbac/roles/:role - One resolved role
pub async fn get_role(
    Extension(access): Extension<Arc<AccessControl>>,
    Extension(request): Extension<RequestContext>,
    Path(role): Path<String>,
) -> axum::response::Response {
    match access.role_definition(&Role::from(role)) {
        Some(resolved) => (StatusCode::OK, Json(json!({ "role": resolved }))).into_response(),
        None => errors::json_error(
            Some(&request),
            StatusCode::NOT_FOUND,
            "not_found",
            "role not found",
        ),
    }
}

/// POST /rbac/check - Explain whether the current subject may perform an action
pub async fn check_access(
    Extension(access): Extension<Arc<AccessControl>>,
    Extension(ctx): Extension<SubjectContext>,
    Extension(request): Extension<RequestContext>,
    Json(body): Json<CheckAccessRequest>,
) -> axum::response::Response {
    if body.resource.trim().is_empty() || body.action.trim().is_empty() {
        return errors::json_error(
            Some(&request),
            StatusCode::BAD_REQUEST,
            "validation_error",
            "resource and action are required",
        );
    }

    let context = body.into_context(ctx.subject().id.clone());
    let explanation = access.explain(Some(ctx.subject()), &context);

    (StatusCode::OK, Json(json!({ "explanation": explanation }))).into_response()
}
