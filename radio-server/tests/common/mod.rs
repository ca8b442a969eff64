//! Server test utilities.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use chrono::Duration;
use radio_collab::{Collab, MemoryDatabase, Tokens};
use radio_server::{app, ServerContext};
use serde_json::Value;
use std::path::PathBuf;
use tower::ServiceExt;

const BODY_LIMIT: usize = 1024 * 1024;

/// A test server backed by an in-memory database.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
}

#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

#[allow(dead_code)]
impl TestServer {
    pub fn new() -> Self {
        Self::with_token_ttl(Duration::days(Tokens::DEFAULT_TTL_IN_DAYS))
    }

    /// Tokens issued by this server live for `ttl`, which may be negative
    pub fn with_token_ttl(ttl: Duration) -> Self {
        let collab = Collab::new(MemoryDatabase::new(), Tokens::new(b"test-secret", ttl));
        let router = app(ServerContext::new(collab), public_dir());

        Self { router }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request is valid"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("body is readable");
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::POST, path, Some(body), token).await
    }

    /// Signs up and logs in, returning the token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let credentials = serde_json::json!({ "username": username, "password": password });

        let signup = self.post("/api/signup", credentials.clone(), None).await;
        assert_eq!(signup.status, StatusCode::CREATED, "{}", signup.text);

        let login = self.post("/api/login", credentials, None).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.text);

        login.body["token"]
            .as_str()
            .expect("login returns a token")
            .to_string()
    }

    /// Uploads a song and returns its id
    pub async fn upload(&self, token: &str, title: &str) -> String {
        let song = serde_json::json!({
            "title": title,
            "audioUrl": format!("https://cdn.example.com/{title}.mp3"),
        });

        let response = self.post("/api/songs", song, Some(token)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);

        response.body["id"]
            .as_str()
            .expect("upload returns an id")
            .to_string()
    }
}

/// The web client shipped at the workspace root
fn public_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public")
}
