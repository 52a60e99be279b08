use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::Instrument;

use rolegate_auth::AccessControl;
use rolegate_core::RequestId;

use crate::app::errors::json_error;
use crate::context::{RequestContext, SubjectContext};
use crate::guard::{RouteGuard, check_subject};
use crate::jwt::JwtValidator;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub access: Arc<AccessControl>,
    pub guard: Arc<RouteGuard>,
}

/// Gate guarded routes on a verified session and a sufficient role.
///
/// - no/invalid session on a guarded path: 401
/// - session present but role insufficient or account suspended: 403
/// - unguarded paths pass through untouched
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(required) = state.guard.required_role(req.uri().path()).cloned() else {
        return next.run(req).await;
    };

    let request = req.extensions().get::<RequestContext>().copied();

    let Some(token) = extract_bearer(req.headers()) else {
        return json_error(
            request.as_ref(),
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Authentication required",
        );
    };

    let claims = match state.jwt.validate(token, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting session token");
            return json_error(
                request.as_ref(),
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid or expired session",
            );
        }
    };

    let subject = claims.to_subject();
    match check_subject(&state.access, &subject, &required) {
        Ok(highest) => {
            req.extensions_mut()
                .insert(SubjectContext::new(subject, Some(highest)));
            next.run(req).await
        }
        Err(rejection) => {
            tracing::info!(
                subject = %subject.id,
                required = %required,
                path = %req.uri().path(),
                "route access denied"
            );
            json_error(
                request.as_ref(),
                StatusCode::FORBIDDEN,
                "forbidden",
                rejection.message(),
            )
        }
    }
}

/// Tag each request with a fresh id, a tracing span and a response header.
pub async fn request_id(mut req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let request_id = RequestId::new();
    req.extensions_mut().insert(RequestContext::new(request_id));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        let h = headers("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&h), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_and_blank_tokens_are_ignored() {
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer(&headers("Bearer    ")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }
}
