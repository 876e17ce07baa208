//! Session middleware configuration.
//!
//! Sets up in-process sessions using tower-sessions with a signed cookie.
//! The dashboard keeps no database of its own; the session only carries
//! the identity payload returned by the upstream login.

use secrecy::ExposeSecret;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::DashboardConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "opsdesk_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-process store and signed cookie.
///
/// # Panics
///
/// Panics if the session secret is shorter than 32 bytes. Configuration
/// loading rejects such secrets before this is reached.
#[must_use]
pub fn create_session_layer(
    config: &DashboardConfig,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    let store = MemoryStore::default();

    let key = tower_sessions::cookie::Key::derive_from(
        config.session_secret.expose_secret().as_bytes(),
    );

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
