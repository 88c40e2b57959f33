//! Shared helpers for guestbook integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::routing::post;
use axum::{Form, Router};
use guestbook_api::config::RecaptchaConfig;
use guestbook_api::{AppState, AppStateInner, GuestbookConfig};
use guestbook_db::Database;
use tempfile::TempDir;
use tower::ServiceExt;

pub const CLIENT_ADDR: ([u8; 4], u16) = ([203, 0, 113, 7], 40_000);

pub struct TestApp {
    pub state: AppState,
    router: Router,
    admin: Router,
    _dir: Option<TempDir>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(GuestbookConfig::default())
    }

    pub fn with_config(config: GuestbookConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("guestbook.db")).unwrap();
        Self::build(config, Some(db), Some(dir))
    }

    /// An app whose store never opened.
    pub fn without_store() -> Self {
        Self::build(GuestbookConfig::default(), None, None)
    }

    fn build(config: GuestbookConfig, db: Option<Database>, dir: Option<TempDir>) -> Self {
        let state = AppStateInner::new(config, db).unwrap();
        let router = guestbook_api::router(state.clone())
            .layer(MockConnectInfo(SocketAddr::from(CLIENT_ADDR)));
        let admin = guestbook_api::admin_router(state.clone());
        Self {
            state,
            router,
            admin,
            _dir: dir,
        }
    }

    pub fn db(&self) -> &Database {
        self.state.db.as_ref().unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(&self.router, request).await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, String) {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        send(&self.router, request).await
    }

    pub async fn admin(&self, method: &str, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(&self.admin, request).await
    }

    /// Post a complete entry the way the browser form does.
    pub async fn submit(&self, name: &str, message: &str) -> (StatusCode, String) {
        self.post_form(
            "/",
            &[("name", name), ("message", message), ("postEntry", "Post Message")],
        )
        .await
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Minimal form encoding for test payloads.
fn encode(s: &str) -> String {
    let mut out = String::new();
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

// -- Verification stub --

#[derive(Clone)]
struct StubState {
    reply: &'static str,
    delay: Duration,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// A local stand-in for the reCAPTCHA verify endpoint.
pub struct StubVerifier {
    pub url: String,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl StubVerifier {
    pub async fn spawn(reply: &'static str) -> Self {
        Self::spawn_with_delay(reply, Duration::ZERO).await
    }

    pub async fn spawn_with_delay(reply: &'static str, delay: Duration) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            delay,
            seen: seen.clone(),
        };
        let app = Router::new()
            .route("/verify", post(stub_verify))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/verify", addr),
            seen,
        }
    }

    /// Form bodies received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.seen.lock().unwrap().clone()
    }
}

async fn stub_verify(
    State(state): State<StubState>,
    Form(fields): Form<HashMap<String, String>>,
) -> &'static str {
    state.seen.lock().unwrap().push(fields);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    state.reply
}

pub fn recaptcha_config(verify_url: &str, timeout: Duration) -> GuestbookConfig {
    GuestbookConfig {
        recaptcha: Some(RecaptchaConfig {
            public_key: "test-public-key".into(),
            private_key: "test-private-key".into(),
            verify_url: verify_url.into(),
            timeout,
        }),
        ..GuestbookConfig::default()
    }
}

/// A URL on which nothing is listening.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/verify", addr)
}
