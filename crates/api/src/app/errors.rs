use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::context::RequestContext;

/// JSON error body shared by every non-2xx response: `{ error, message }`.
///
/// Carries `request_id` as well when the request was tagged, so a caller can
/// quote it when reporting a denial.
pub fn json_error(
    request: Option<&RequestContext>,
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    let mut body = json!({
        "error": code,
        "message": message.into(),
    });
    if let Some(request) = request {
        body["request_id"] = json!(request.request_id());
    }
    (status, axum::Json(body)).into_response()
}
