//! Integration tests for ToiletPro.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process router tests (no database needed)
//! cargo test -p toiletpro-integration-tests
//!
//! # Live tests against a running storefront and database
//! cargo run -p toiletpro-cli -- migrate
//! cargo run -p toiletpro-storefront &
//! cargo test -p toiletpro-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `router` - the full router in-process, with an in-memory session store
//!   and a lazy pool that is never connected
//! - `storefront_live` - HTTP against a running server (`TOILETPRO_TEST_URL`)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use toiletpro_storefront::config::{AdminConfig, StorefrontConfig};
use toiletpro_storefront::middleware::session_layer;
use toiletpro_storefront::state::AppState;

/// Admin username configured for [`TestApp`].
pub const ADMIN_USERNAME: &str = "admin";

/// Admin password configured for [`TestApp`].
pub const ADMIN_PASSWORD: &str = "Tq8#vL2!pZ9@";

/// Base URL of a running storefront for live tests.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("TOILETPRO_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// The storefront router with a throwaway data directory and an in-memory
/// session store.
///
/// The session cookie from each response is carried to the next request,
/// like a browser would.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    data_dir: TempDir,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is JSON")
    }
}

impl TestApp {
    /// Build the app. Must be called inside a Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if the temporary data directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("create temp data dir");

        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://toiletpro@localhost/toiletpro_test")
            .expect("lazy pool from a well-formed URL");

        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://toiletpro@localhost/toiletpro_test"),
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            data_dir: data_dir.path().to_path_buf(),
            admin: AdminConfig {
                username: ADMIN_USERNAME.to_string(),
                password: SecretString::from(ADMIN_PASSWORD),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config, pool);
        let router = toiletpro_storefront::app(state, session_layer(MemoryStore::default(), false));

        Self {
            router,
            cookie: None,
            data_dir,
        }
    }

    /// Directory holding the JSON data files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Path of one JSON data file.
    #[must_use]
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.path().join(name)
    }

    /// `GET` a URI.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder().method("GET").uri(uri);
        self.send(request, Body::empty()).await
    }

    /// `POST /` with the given form fields.
    pub async fn action(&mut self, fields: &[(&str, &str)]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(encode_form(fields))).await
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let mut request = request.body(body).expect("valid request");
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40_000))));

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("readable body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// `application/x-www-form-urlencoded` encoding of `fields`.
fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(char::from(byte));
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
