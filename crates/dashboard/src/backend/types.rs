//! Wire types for the upstream REST API.
//!
//! Field names follow the upstream JSON payloads (`_id`, `userId`,
//! `loginTime`); serde renames map them to Rust conventions.

use serde::{Deserialize, Serialize};

use opsdesk_core::{MessageId, UserId, UserSessionId};

use crate::components::lazy_table::SortableRecord;

/// Identity payload returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub username: String,
    pub email: String,
    /// Bearer token for subsequent authenticated calls.
    pub token: String,
}

/// Envelope for the login response.
///
/// Success is signalled by `status == "success"` with `data` present;
/// failures carry a human-readable `error` (or `message`) field.
#[derive(Debug, Deserialize)]
pub struct LoginEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<LoginData>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Wrapper for upstream list responses (`{"data": [...]}`).
#[derive(Debug, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
}

/// A message record (remote-owned).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: MessageId,
    pub email: String,
    /// ISO date (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// Payload for creating a message.
#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub email: String,
    pub date: String,
    pub description: String,
}

/// The user embedded in a session record.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// A login-session record (remote-owned, read-only).
#[derive(Debug, Clone, Deserialize)]
pub struct UserSessionRecord {
    #[serde(rename = "_id")]
    pub id: UserSessionId,
    #[serde(rename = "userId")]
    pub user: SessionUser,
    #[serde(rename = "loginTime", default)]
    pub login_time: Option<String>,
    #[serde(rename = "logoutTime", default)]
    pub logout_time: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl SortableRecord for Message {
    fn sort_value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(self.email.as_str()),
            "date" => Some(self.date.as_str()),
            "description" => Some(self.description.as_str()),
            _ => None,
        }
    }
}

impl SortableRecord for UserSessionRecord {
    fn sort_value(&self, field: &str) -> Option<&str> {
        match field {
            "loginTime" => self.login_time.as_deref(),
            "logoutTime" => self.logout_time.as_deref(),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}
