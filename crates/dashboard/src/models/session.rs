//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use opsdesk_core::Email;

/// Session-stored user identity.
///
/// Carries the identity fields the upstream login returned plus the
/// bearer token used for authenticated upstream calls. The token never
/// leaves the signed session cookie payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Stable subject identifier (the login email).
    pub subject_id: String,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Upstream bearer token.
    token: String,
}

impl CurrentUser {
    #[must_use]
    pub fn new(subject_id: String, name: String, email: Email, token: String) -> Self {
        Self {
            subject_id,
            name,
            email,
            token,
        }
    }

    /// The upstream bearer token for this user.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
