//! HTTP API application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use rolegate_auth::AccessControl;

use crate::guard::RouteGuard;
use crate::jwt::Hs256JwtValidator;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String, access: AccessControl, guard: RouteGuard) -> Router {
    let access = Arc::new(access);
    let auth_state = middleware::AuthState {
        jwt: Arc::new(Hs256JwtValidator::new(jwt_secret.into_bytes())),
        access: Arc::clone(&access),
        guard: Arc::new(guard),
    };

    // Guarded routes: the auth middleware decides per path.
    let protected = routes::router()
        .layer(Extension(access))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_id)))
}
