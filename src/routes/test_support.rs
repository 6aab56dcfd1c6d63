//! Router harness backed by the in-memory ledger.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

use super::{app, auth::sign_token, AppState};
use crate::db::memory::MemoryLedger;
use crate::ledger::access::Role;
use crate::ledger::LedgerService;
use crate::routes::auth::AuthService;
use crate::uploads::ScreenshotStore;

const SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "ledger-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryLedger>,
    pub upload_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let repo = Arc::new(MemoryLedger::new());
        let upload_dir = tempfile::tempdir().unwrap();
        let state = AppState {
            auth: Arc::new(AuthService::new(SECRET.to_string())),
            ledger: Arc::new(LedgerService::new(repo.clone())),
            screenshots: Arc::new(ScreenshotStore::new(upload_dir.path())),
        };
        Self {
            router: app(state),
            repo,
            upload_dir,
        }
    }

    pub fn token(&self, role: Role) -> String {
        self.token_for(Uuid::new_v4(), role)
    }

    pub fn token_for(&self, user_id: Uuid, role: Role) -> String {
        sign_token(SECRET, user_id, role, 600)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.send(request(Method::GET, uri, token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.send(
            request(method, uri, token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn send_multipart(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Vec<u8>,
    ) -> (StatusCode, serde_json::Value) {
        self.send(
            request(Method::POST, uri, token)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

/// Builds a multipart body from text fields and an optional file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
