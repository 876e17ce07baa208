//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Dashboard shell (requires auth)
//! GET  /dashboard               - Dashboard shell (alias)
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (pings the upstream)
//!
//! # Auth
//! GET  /login                   - Login page (login and sign-up panes)
//! POST /login                   - Login action
//! POST /signup                  - Sign-up action
//! POST /logout                  - Logout action
//!
//! # Dashboard (HTMX fragments, require auth)
//! GET  /dashboard/sessions      - User-sessions table fragment
//! GET  /dashboard/messages      - Messages table fragment
//! GET  /dashboard/messages/new  - Message creation form (modal)
//! POST /dashboard/messages      - Create message
//! ```

pub mod auth;
pub mod dashboard;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/dashboard", get(dashboard::index))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", post(auth::sign_up))
        .route("/logout", post(auth::logout))
        .route(
            "/dashboard/sessions",
            get(dashboard::sessions_table),
        )
        .route(
            "/dashboard/messages",
            get(dashboard::messages_table).post(dashboard::create_message),
        )
        .route("/dashboard/messages/new", get(dashboard::new_message_form))
}

/// Liveness check.
async fn health() -> &'static str {
    "OK"
}

/// Readiness check: the dashboard is only useful when the upstream
/// answers.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.backend().ping().await {
        Ok(()) => (StatusCode::OK, "READY"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }
}
