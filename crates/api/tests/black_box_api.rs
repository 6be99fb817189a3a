use std::sync::Arc;

use campus_api::app::services::AuthServices;
use campus_api::directory::{InMemoryUserDirectory, UserRecord};
use campus_auth::{CredentialVerifier, HashParams, Role, SubjectId, TokenAuthority};
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, with cheap hashing and a seeded directory.
        let credentials = CredentialVerifier::new(HashParams {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();

        let directory = InMemoryUserDirectory::new();
        directory
            .insert(UserRecord {
                id: SubjectId::new(17),
                username: "alice".to_string(),
                password_digest: credentials.hash("correct").unwrap(),
                role: Role::Teacher,
                name: "Alice Zhang".to_string(),
                email: "alice@university.edu".to_string(),
                phone: "13800000017".to_string(),
            })
            .unwrap();

        let services = AuthServices::new(
            TokenAuthority::new(JWT_SECRET).unwrap(),
            credentials,
            Arc::new(directory),
        )
        .unwrap();

        let app = campus_api::app::build_app(Arc::new(services));
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
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(client: &reqwest::Client, base_url: &str, body: serde_json::Value) -> reqwest::Response {
    client
        .post(format!("{}/api/login", base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_then_whoami() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = login(&client, &srv.base_url, json!({ "username": "alice", "password": "correct" })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["id"], 17);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["role"], "teacher");
    assert!(body["user"].get("password_digest").is_none());
    assert!(!body.to_string().contains("argon2"));

    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["user_id"], 17);
    assert_eq!(me["role"], "teacher");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_identical() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let wrong = login(&client, &srv.base_url, json!({ "username": "alice", "password": "wrong" })).await;
    let unknown = login(&client, &srv.base_url, json!({ "username": "mallory", "password": "wrong" })).await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let wrong: serde_json::Value = wrong.json().await.unwrap();
    let unknown: serde_json::Value = unknown.json().await.unwrap();
    assert_eq!(wrong, unknown);
    assert_eq!(wrong["error"], "invalid_credentials");
    assert_eq!(wrong["message"], "invalid username or password");
}

#[tokio::test]
async fn malformed_login_body_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = login(&client, &srv.base_url, json!({ "username": "alice" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = login(&client, &srv.base_url, json!({ "username": "", "password": "" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_and_foreign_tokens_get_the_same_generic_rejection() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let expired = TokenAuthority::new(JWT_SECRET)
        .unwrap()
        .issue_at(SubjectId::new(17), Role::Teacher, Utc::now() - ChronoDuration::hours(25))
        .unwrap();
    let foreign = TokenAuthority::new("not-the-server-key")
        .unwrap()
        .issue(SubjectId::new(17), Role::Admin)
        .unwrap();

    let mut bodies = Vec::new();
    for token in [expired, foreign, "garbage".to_string()] {
        let res = client
            .get(format!("{}/api/user", srv.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        bodies.push(res.json::<serde_json::Value>().await.unwrap());
    }

    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(bodies[0]["error"], "unauthorized");
}

#[tokio::test]
async fn token_minted_with_jsonwebtoken_directly_is_accepted() {
    let srv = TestServer::spawn().await;
    let now = Utc::now().timestamp();

    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &json!({
            "user_id": 99,
            "role": "academic",
            "iat": now,
            "exp": now + 600,
            "iss": "university-system",
        }),
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt");

    let res = reqwest::Client::new()
        .get(format!("{}/api/user", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user_id"], 99);
    assert_eq!(body["role"], "academic");
}

#[tokio::test]
async fn cors_preflight_is_answered_without_a_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/api/login", "/api/user"] {
        let res = client
            .request(reqwest::Method::OPTIONS, format!("{}{}", srv.base_url, path))
            .header("Origin", "http://localhost:3000")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "authorization, content-type")
            .send()
            .await
            .unwrap();

        assert!(res.status().is_success(), "{path}: {}", res.status());
        let headers = res.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");

        let allowed_headers = headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed_headers.contains("authorization"), "{allowed_headers}");
        assert!(allowed_headers.contains("content-type"), "{allowed_headers}");

        let allowed_methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(allowed_methods.contains("POST"), "{allowed_methods}");
    }
}

#[tokio::test]
async fn cross_origin_login_response_carries_allow_origin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/login", srv.base_url))
        .header("Origin", "http://localhost:3000")
        .json(&json!({ "username": "alice", "password": "correct" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}
