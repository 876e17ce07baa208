//! Authentication route handlers.
//!
//! Handles login, sign-up, and logout against the upstream API. The
//! upstream owns credential verification; this layer only exchanges
//! credentials for an identity payload and stores it in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use opsdesk_core::Email;

use crate::backend::BackendError;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Sign-up form data.
#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    /// Which pane to show: "login" (default) or "signup".
    pub pane: Option<String>,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template (login and sign-up panes).
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub signup_pane: bool,
    pub callback_url: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// Already-authenticated users are sent straight to the dashboard.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        error: query.error,
        success: query.success,
        signup_pane: query.pane.as_deref() == Some("signup"),
        callback_url: sanitize_callback(query.callback_url.as_deref()),
    }
    .into_response()
}

/// Handle login form submission.
///
/// Exchanges credentials with the upstream API and stores the returned
/// identity in the session. Rejected credentials bounce back to the login
/// page with the upstream's message; transport failures get a generic one.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let callback_url = sanitize_callback(form.callback_url.as_deref());

    match state.backend().login(&form.email, &form.password).await {
        Ok(data) => {
            let email = match Email::parse(&data.email) {
                Ok(email) => email,
                Err(e) => {
                    tracing::error!("Upstream returned invalid email: {}", e);
                    return login_error_redirect("Sign in failed", &callback_url);
                }
            };

            // The login email doubles as the stable subject identifier.
            let user = CurrentUser::new(data.email.clone(), data.username, email, data.token);

            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {}", e);
                return login_error_redirect("Sign in failed", &callback_url);
            }

            Redirect::to(&callback_url).into_response()
        }
        Err(BackendError::Rejected(message)) => {
            tracing::warn!("Login rejected: {}", message);
            login_error_redirect(&message, &callback_url)
        }
        Err(e) => {
            tracing::error!("Login request failed: {}", e);
            login_error_redirect("Unable to reach the sign-in service", &callback_url)
        }
    }
}

// =============================================================================
// Sign-up Routes
// =============================================================================

/// Handle sign-up form submission.
///
/// Validates locally before calling the upstream; a failed validation
/// never produces an upstream request.
pub async fn sign_up(State(state): State<AppState>, Form(form): Form<SignUpForm>) -> Response {
    if let Err(message) = validate_sign_up(&form) {
        return signup_error_redirect(&message);
    }

    match state
        .backend()
        .sign_up(&form.username, &form.email, &form.password)
        .await
    {
        Ok(()) => {
            let redirect = format!(
                "/login?success={}",
                urlencoding::encode("Account created. Please sign in.")
            );
            Redirect::to(&redirect).into_response()
        }
        Err(e) => {
            tracing::warn!("Sign-up failed: {}", e);
            signup_error_redirect("Sign up failed. Please try again.")
        }
    }
}

fn validate_sign_up(form: &SignUpForm) -> Result<(), String> {
    if form.username.trim().is_empty() {
        return Err("Username is required".to_string());
    }
    if let Err(e) = Email::parse(&form.email) {
        return Err(format!("Invalid email: {e}"));
    }
    if form.password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    Ok(())
}

// =============================================================================
// Logout Routes
// =============================================================================

/// Handle logout.
///
/// Invalidates the upstream token (best effort) and destroys the session.
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(user)) = session
        .get::<CurrentUser>(crate::models::session_keys::CURRENT_USER)
        .await
    {
        // Invalidate the upstream token (best effort)
        if let Err(e) = state.backend().logout(user.token()).await {
            tracing::warn!("Failed to invalidate upstream token: {}", e);
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/login").into_response()
}

// =============================================================================
// Helpers
// =============================================================================

/// Restrict the post-login destination to same-site paths.
///
/// Anything that is not a plain absolute path falls back to `/`.
fn sanitize_callback(raw: Option<&str>) -> String {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}

fn login_error_redirect(message: &str, callback_url: &str) -> Response {
    let redirect = format!(
        "/login?error={}&callbackUrl={}",
        urlencoding::encode(message),
        urlencoding::encode(callback_url)
    );
    Redirect::to(&redirect).into_response()
}

fn signup_error_redirect(message: &str) -> Response {
    let redirect = format!(
        "/login?pane=signup&error={}",
        urlencoding::encode(message)
    );
    Redirect::to(&redirect).into_response()
}
