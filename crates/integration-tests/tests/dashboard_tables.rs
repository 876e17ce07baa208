//! Lazy table and message creation tests.

#![allow(clippy::expect_used)]

use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use opsdesk_integration_tests::{mount_login_success, mount_messages, spawn_app, TestApp};

async fn logged_in_app() -> TestApp {
    let app = spawn_app().await;
    mount_login_success(&app.api).await;
    app.login().await;
    app
}

async fn get_fragment(app: &TestApp, path_and_query: &str) -> reqwest::Response {
    app.client
        .get(app.url(path_and_query))
        .header("HX-Request", "true")
        .send()
        .await
        .expect("fragment request failed")
}

// ============================================================================
// Messages table
// ============================================================================

#[tokio::test]
async fn messages_first_page_shows_ten_of_twenty_five() {
    let app = logged_in_app().await;
    mount_messages(&app.api, 25).await;

    let response = get_fragment(&app, "/dashboard/messages?offset=0&rows=10").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("user000@example.com"));
    assert!(body.contains("user009@example.com"));
    assert!(!body.contains("user010@example.com"));
    assert!(body.contains("1&ndash;10 of 25"));
}

#[tokio::test]
async fn messages_second_page_continues_numbering() {
    let app = logged_in_app().await;
    mount_messages(&app.api, 25).await;

    let response = get_fragment(&app, "/dashboard/messages?offset=10&rows=10").await;
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("user010@example.com"));
    // Row numbering picks up where the first page left off.
    assert!(body.contains("<td>11.</td>"));
    assert!(body.contains("11&ndash;20 of 25"));
}

#[tokio::test]
async fn messages_sort_by_date_descending() {
    let app = logged_in_app().await;
    mount_messages(&app.api, 25).await;

    let response =
        get_fragment(&app, "/dashboard/messages?offset=0&rows=10&sort=date&dir=desc").await;
    let body = response.text().await.expect("failed to read body");

    // Latest date (25 March) leads; the earliest stays off this page.
    assert!(body.contains("25 March 2025"));
    assert!(!body.contains("01 March 2025"));
}

#[tokio::test]
async fn messages_offset_beyond_total_renders_empty_page() {
    let app = logged_in_app().await;
    mount_messages(&app.api, 5).await;

    let response = get_fragment(&app, "/dashboard/messages?offset=100&rows=10").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("No data available."));
    assert!(body.contains("of 5"));
}

#[tokio::test]
async fn messages_maximum_offset_renders_empty_page_without_panicking() {
    let app = logged_in_app().await;
    mount_messages(&app.api, 5).await;

    let response = get_fragment(
        &app,
        "/dashboard/messages?offset=18446744073709551615&rows=10",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("No data available."));
    assert!(body.contains("of 5"));
}

#[tokio::test]
async fn messages_fetch_failure_suppresses_swap_and_toasts() {
    let app = logged_in_app().await;

    Mock::given(method("GET"))
        .and(path("/api/message/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.api)
        .await;

    let response = get_fragment(&app, "/dashboard/messages?offset=0&rows=10").await;
    assert_eq!(
        response
            .headers()
            .get("HX-Reswap")
            .expect("missing HX-Reswap header"),
        "none"
    );

    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("hx-swap-oob"));
    assert!(body.contains("Showing previous data."));
}

// ============================================================================
// Sessions table
// ============================================================================

#[tokio::test]
async fn sessions_table_renders_records() {
    let app = logged_in_app().await;

    Mock::given(method("GET"))
        .and(path("/api/user/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "_id": "s1",
                    "userId": {"_id": "u1", "username": "andi", "email": "andi@example.com"},
                    "loginTime": "2025-03-01T08:30:05Z",
                    "logoutTime": null,
                    "status": "active"
                },
                {
                    "_id": "s2",
                    "userId": {"_id": "u2", "username": "budi", "email": "budi@example.com"},
                    "loginTime": "2025-03-02T09:00:00Z",
                    "logoutTime": "2025-03-02T17:00:00Z",
                    "status": "expired"
                }
            ]
        })))
        .mount(&app.api)
        .await;

    let response = get_fragment(&app, "/dashboard/sessions?offset=0&rows=10").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("andi"));
    assert!(body.contains("budi"));
    assert!(body.contains("01 March 25 08:30:05"));
    assert!(body.contains("expired"));
}

// ============================================================================
// Message creation
// ============================================================================

#[tokio::test]
async fn message_validation_failure_never_calls_upstream() {
    let app = logged_in_app().await;

    Mock::given(method("POST"))
        .and(path("/api/message/add"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app
        .client
        .post(app.url("/dashboard/messages"))
        .form(&[("email", ""), ("date", ""), ("description", "")])
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("Email is required"));
    assert!(body.contains("Date is required"));
    assert!(body.contains("Description is required"));
}

#[tokio::test]
async fn message_invalid_email_format_is_rejected_locally() {
    let app = logged_in_app().await;

    Mock::given(method("POST"))
        .and(path("/api/message/add"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app
        .client
        .post(app.url("/dashboard/messages"))
        .form(&[
            ("email", "not-an-email"),
            ("date", "2025-03-01"),
            ("description", "hello"),
        ])
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("Invalid email"));
    // Entered values survive the round trip.
    assert!(body.contains("not-an-email"));
}

#[tokio::test]
async fn message_create_success_triggers_table_refresh() {
    let app = logged_in_app().await;

    Mock::given(method("POST"))
        .and(path("/api/message/add"))
        .and(body_json(json!({
            "email": "andi@example.com",
            "date": "2025-03-01",
            "description": "hello there"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .client
        .post(app.url("/dashboard/messages"))
        .form(&[
            ("email", "andi@example.com"),
            ("date", "2025-03-01"),
            ("description", "hello there"),
        ])
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("HX-Trigger")
            .expect("missing HX-Trigger header"),
        "messages-refresh"
    );

    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("Message created."));
}

#[tokio::test]
async fn message_create_upstream_failure_keeps_entered_values() {
    let app = logged_in_app().await;

    Mock::given(method("POST"))
        .and(path("/api/message/add"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.api)
        .await;

    let response = app
        .client
        .post(app.url("/dashboard/messages"))
        .form(&[
            ("email", "andi@example.com"),
            ("date", "2025-03-01"),
            ("description", "hello there"),
        ])
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("Could not save the message."));
    assert!(body.contains("andi@example.com"));
    assert!(body.contains("hello there"));
}
