//! HTTP client for the upstream REST API.
//!
//! Every data operation in the dashboard is a direct proxy to this API;
//! nothing is cached beyond the current render. The client mirrors the
//! upstream contract:
//!
//! - `POST /api/auth/login` / `POST /api/auth/logout` / `POST /api/auth/signup`
//! - `GET  /api/user/session`
//! - `GET  /api/message/` / `POST /api/message/add`

pub mod types;

use reqwest::header::{HeaderMap, HeaderValue};
use thiserror::Error;

use crate::config::DashboardConfig;

pub use types::{
    ListEnvelope, LoginData, LoginEnvelope, Message, NewMessage, SessionUser, UserSessionRecord,
};

/// Errors that can occur when talking to the upstream API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (network, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The upstream refused the operation with a user-facing message.
    #[error("{0}")]
    Rejected(String),

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the upstream REST API.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new upstream API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &DashboardConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Exchange credentials for an identity payload and bearer token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Rejected` with the server-provided message
    /// (or a generic fallback) when the credentials are not accepted, and
    /// `BackendError::Http` on transport failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData, BackendError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        let envelope: LoginEnvelope = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        if status.is_success() && envelope.status == "success" {
            if let Some(data) = envelope.data {
                return Ok(data);
            }
        }

        let message = envelope
            .error
            .or(envelope.message)
            .unwrap_or_else(|| "Invalid credentials".to_string());
        Err(BackendError::Rejected(message))
    }

    /// Invalidate the bearer token upstream.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API responds with a
    /// non-success status. Callers treat this as best-effort.
    pub async fn logout(&self, token: &str) -> Result<(), BackendError> {
        let url = format!("{}/api/auth/logout", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects the payload.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        let url = format!("{}/api/auth/signup", self.base_url);
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Fetch the full collection of login-session records.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body cannot be parsed.
    pub async fn user_sessions(&self) -> Result<Vec<UserSessionRecord>, BackendError> {
        let url = format!("{}/api/user/session", self.base_url);
        self.fetch_list(&url).await
    }

    /// Fetch the full collection of messages.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body cannot be parsed.
    pub async fn messages(&self) -> Result<Vec<Message>, BackendError> {
        let url = format!("{}/api/message/", self.base_url);
        self.fetch_list(&url).await
    }

    /// Create a message record upstream.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects the payload.
    pub async fn create_message(&self, message: &NewMessage) -> Result<(), BackendError> {
        let url = format!("{}/api/message/add", self.base_url);

        let response = self.client.post(&url).json(message).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Check that the upstream API is reachable.
    ///
    /// Any HTTP response counts as reachable; only transport failures
    /// are errors.
    ///
    /// # Errors
    ///
    /// Returns error if the upstream cannot be reached at all.
    pub async fn ping(&self) -> Result<(), BackendError> {
        self.client.get(&self.base_url).send().await?;
        Ok(())
    }

    /// Fetch and unwrap a `{"data": [...]}` list response.
    async fn fetch_list<T>(&self, url: &str) -> Result<Vec<T>, BackendError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ListEnvelope<T> = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(envelope.data)
    }
}
