//! Integration test harness for the Opsdesk dashboard.
//!
//! Spawns the full application on an ephemeral port with a mock upstream
//! API behind it. Tests drive the dashboard over real HTTP with a
//! cookie-holding client, so the whole stack (session layer, extractors,
//! templates) is exercised.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p opsdesk-integration-tests
//! ```

#![allow(clippy::expect_used)]

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdesk_dashboard::build_app;
use opsdesk_dashboard::config::DashboardConfig;

/// Test credentials accepted by the mocked login endpoint.
pub const TEST_EMAIL: &str = "andi@example.com";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const TEST_TOKEN: &str = "token-abc123";

/// A running dashboard instance backed by a mock upstream.
pub struct TestApp {
    /// Base URL of the dashboard (`http://127.0.0.1:<port>`).
    pub address: String,
    /// The mocked upstream API.
    pub api: MockServer,
    /// Cookie-holding client that does not follow redirects.
    pub client: reqwest::Client,
}

impl TestApp {
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Log in with the test credentials (the login mock must be mounted).
    pub async fn login(&self) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", TEST_EMAIL), ("password", TEST_PASSWORD)])
            .send()
            .await
            .expect("login request failed")
    }
}

/// Spawn the dashboard against a fresh mock upstream.
pub async fn spawn_app() -> TestApp {
    let api = MockServer::start().await;

    let config = DashboardConfig {
        api_base_url: api.uri(),
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };

    let app = build_app(config).expect("failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().expect("listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build HTTP client");

    TestApp {
        address: format!("http://{addr}"),
        api,
        client,
    }
}

/// Mount a login mock that accepts the test credentials.
pub async fn mount_login_success(api: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "username": "andi",
                "email": TEST_EMAIL,
                "token": TEST_TOKEN,
            }
        })))
        .mount(api)
        .await;
}

/// Mount a message-list mock returning `count` sequential messages.
///
/// Dates cycle through March 2025 so date sorting has something to do.
pub async fn mount_messages(api: &MockServer, count: usize) {
    let data: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            json!({
                "_id": format!("msg-{i:03}"),
                "email": format!("user{i:03}@example.com"),
                "date": format!("2025-03-{:02}", (i % 28) + 1),
                "description": format!("message number {i}"),
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/api/message/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(api)
        .await;
}
