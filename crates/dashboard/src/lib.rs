//! Opsdesk Dashboard library.
//!
//! This crate provides the dashboard functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX for interactivity
//! - Askama templates for server-side rendering
//! - All record-keeping delegated to the upstream REST API (no database)
//! - Signed session cookies via tower-sessions (in-process store)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;

use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Build the dashboard application router.
///
/// Assembles the route handlers, static file service, and session layer.
/// Tracing and Sentry layers are added by the binary; tests drive this
/// router directly.
///
/// # Errors
///
/// Returns an error if the upstream API client cannot be constructed.
pub fn build_app(config: DashboardConfig) -> Result<Router, AppError> {
    let session_layer = create_session_layer(&config);
    let state = AppState::new(config)?;

    let app = routes::routes()
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(session_layer)
        .with_state(state);

    Ok(app)
}
