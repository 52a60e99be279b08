use axum::{routing::get, Router};

pub mod protected;
pub mod rbac;
pub mod system;

/// Router for all guarded endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(protected::dashboard))
        .route("/profile", get(protected::profile))
        .route("/moderation/queue", get(protected::moderation_queue))
        .route("/admin/overview", get(protected::admin_overview))
        .nest("/rbac", rbac::router())
}
