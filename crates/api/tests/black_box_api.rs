use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use rolegate_api::guard::RouteGuard;
use rolegate_auth::{AccountStatus, Role, SessionClaims, default_access_control};
use rolegate_core::SubjectId;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = rolegate_api::app::build_app(
            JWT_SECRET.to_string(),
            default_access_control(),
            RouteGuard::builtin(),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn claims(roles: Vec<Role>) -> SessionClaims {
    let now = Utc::now();
    SessionClaims {
        sub: SubjectId::from("oauth|test-user"),
        email: "tester@example.com".to_string(),
        name: Some("Tester".to_string()),
        picture: None,
        role: None,
        roles,
        email_verified: true,
        account_status: AccountStatus::Active,
        iat: now - ChronoDuration::seconds(5),
        exp: now + ChronoDuration::minutes(10),
    }
}

fn mint(secret: &str, claims: &SessionClaims) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn mint_jwt(roles: Vec<Role>) -> String {
    mint(JWT_SECRET, &claims(roles))
}

async fn error_body(res: reqwest::Response) -> (StatusCode, serde_json::Value) {
    let status = res.status();
    let body: serde_json::Value = res.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn health_is_public_and_tagged_with_request_id() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn missing_session_is_401_with_json_body() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/dashboard")).await.unwrap();

    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn forged_and_expired_tokens_are_401() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let forged = mint("some-other-secret", &claims(vec![Role::ADMIN]));
    let res = client
        .get(srv.url("/admin/overview"))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let mut stale = claims(vec![Role::ADMIN]);
    stale.iat = Utc::now() - ChronoDuration::hours(2);
    stale.exp = Utc::now() - ChronoDuration::hours(1);
    let res = client
        .get(srv.url("/admin/overview"))
        .bearer_auth(mint(JWT_SECRET, &stale))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn insufficient_role_is_403_with_json_body() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt(vec![Role::VIEWER]);

    let res = client
        .get(srv.url("/dashboard"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url("/admin/overview"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let header = res.headers()["x-request-id"].to_str().unwrap().to_string();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
    assert_eq!(body["request_id"], header);
}

#[tokio::test]
async fn unregistered_role_claims_do_not_mask_held_roles() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(vec![Role::new("customer"), Role::VIEWER]);

    let res = reqwest::Client::new()
        .get(srv.url("/dashboard"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["highest_role"], "viewer");
}

#[tokio::test]
async fn higher_roles_reach_lower_routes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt(vec![Role::ADMIN]);

    for path in ["/dashboard", "/profile", "/moderation/queue", "/admin/overview"] {
        let res = client
            .get(srv.url(path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "admin should reach {path}");
    }
}

#[tokio::test]
async fn suspended_accounts_are_403_everywhere() {
    let srv = TestServer::spawn().await;
    let mut suspended = claims(vec![Role::ADMIN]);
    suspended.account_status = AccountStatus::Suspended;

    let res = reqwest::Client::new()
        .get(srv.url("/dashboard"))
        .bearer_auth(mint(JWT_SECRET, &suspended))
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Account is suspended");
}

#[tokio::test]
async fn me_reports_highest_role_and_permissions() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(vec![Role::VIEWER, Role::MODERATOR]);

    let res = reqwest::Client::new()
        .get(srv.url("/rbac/me"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["subject"]["highest_role"], "moderator");
    let permissions: Vec<&str> = body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert!(permissions.contains(&"user:write"));
    assert!(permissions.contains(&"dashboard:read"));
    assert!(!permissions.contains(&"admin:read"));
}

#[tokio::test]
async fn role_lookup_returns_computed_permissions_or_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt(vec![Role::USER]);

    let res = client
        .get(srv.url("/rbac/roles/user"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["role"]["computed_permissions"],
        json!(["dashboard:read", "profile:read", "profile:write", "user:read"])
    );
    assert_eq!(body["role"]["hierarchy"], json!(["user", "viewer"]));

    let res = client
        .get(srv.url("/rbac/roles/superuser"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn check_endpoint_explains_decisions() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt(vec![Role::MODERATOR]);

    let res = client
        .post(srv.url("/rbac/check"))
        .bearer_auth(&token)
        .json(&json!({ "resource": "user", "action": "write" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["explanation"]["granted"], true);
    assert_eq!(body["explanation"]["source"]["kind"], "permission");

    let res = client
        .post(srv.url("/rbac/check"))
        .bearer_auth(&token)
        .json(&json!({ "resource": "admin", "action": "read" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["explanation"]["granted"], false);

    let res = client
        .post(srv.url("/rbac/check"))
        .bearer_auth(&token)
        .json(&json!({ "resource": " ", "action": "read" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_listing_keeps_registration_order() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .get(srv.url("/rbac/roles"))
        .bearer_auth(mint_jwt(vec![Role::VIEWER]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let roles = body["roles"].as_array().unwrap();
    let ids: Vec<&str> = roles.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["viewer", "user", "moderator", "admin"]);

    assert_eq!(
        roles[0]["computed_permissions"],
        json!(["dashboard:read", "profile:read"])
    );
    let admin: Vec<&str> = roles[3]["computed_permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert!(admin.contains(&"system:configure"));
    assert!(admin.contains(&"dashboard:read"));
    assert_eq!(roles[3]["hierarchy"], json!(["admin", "moderator", "user", "viewer"]));
}
