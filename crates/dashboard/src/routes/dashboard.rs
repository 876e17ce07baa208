//! Dashboard route handlers.
//!
//! The dashboard page is a shell; the two tables load as HTMX fragments
//! that re-request themselves whenever the viewport (page, size, sort)
//! changes. Every fragment request re-fetches the full collection from
//! the upstream and slices it server-side.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;

use opsdesk_core::Email;

use crate::backend::{Message, NewMessage, UserSessionRecord};
use crate::components::lazy_table::{
    PAGE_SIZE_OPTIONS, SortDirection, TablePage, TableQuery, paginate,
};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// Pagination state precomputed for the table footer.
pub struct Pager {
    /// CSS selector of the fragment container (HTMX target).
    pub target: &'static str,
    /// Fragment endpoint path.
    pub base_path: &'static str,
    pub offset: usize,
    pub rows: usize,
    pub total: usize,
    /// 1-based index of the first rendered row (0 when the page is empty).
    pub first_row: usize,
    /// 1-based index of the last rendered row.
    pub last_row: usize,
    pub prev_offset: usize,
    pub next_offset: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// Query-string suffix carrying the active sort (`&sort=...&dir=...`).
    pub sort_query: String,
    pub size_options: Vec<PageSizeOption>,
}

/// One entry in the page-size selector.
pub struct PageSizeOption {
    pub value: usize,
    pub selected: bool,
}

impl Pager {
    fn new<T>(target: &'static str, base_path: &'static str, page: &TablePage<T>, query: &TableQuery) -> Self {
        let shown = page.rows.len();
        let sort_query = query.sort.as_deref().map_or_else(String::new, |field| {
            format!("&sort={}&dir={}", field, query.dir.as_str())
        });

        Self {
            target,
            base_path,
            offset: page.offset,
            rows: page.page_size,
            total: page.total_records,
            first_row: if shown == 0 { 0 } else { page.offset.saturating_add(1) },
            last_row: if shown == 0 { 0 } else { page.offset.saturating_add(shown) },
            prev_offset: page.offset.saturating_sub(page.page_size),
            next_offset: page.offset.saturating_add(page.page_size),
            has_prev: page.offset > 0,
            has_next: page.offset.saturating_add(page.page_size) < page.total_records,
            sort_query,
            size_options: PAGE_SIZE_OPTIONS
                .iter()
                .map(|&value| PageSizeOption {
                    value,
                    selected: value == page.page_size,
                })
                .collect(),
        }
    }
}

/// Sortable column header state.
pub struct ColumnHeader {
    pub field: &'static str,
    pub label: &'static str,
    /// Direction a click on this header requests.
    pub next_dir: &'static str,
    pub sorted: bool,
    /// Unicode arrow when this column drives the sort.
    pub indicator: &'static str,
}

fn column(field: &'static str, label: &'static str, query: &TableQuery) -> ColumnHeader {
    let sorted = query.sort.as_deref() == Some(field);
    let (next_dir, indicator) = if sorted {
        match query.dir {
            SortDirection::Asc => ("desc", "\u{25b2}"),
            SortDirection::Desc => ("asc", "\u{25bc}"),
        }
    } else {
        ("asc", "")
    };

    ColumnHeader {
        field,
        label,
        next_dir,
        sorted,
        indicator,
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Dashboard shell page.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub user: CurrentUser,
}

/// User-sessions table fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/sessions_table.html")]
pub struct SessionsTableTemplate {
    pub rows: Vec<UserSessionRecord>,
    pub columns: Vec<ColumnHeader>,
    pub pager: Pager,
}

/// Messages table fragment.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/messages_table.html")]
pub struct MessagesTableTemplate {
    pub rows: Vec<Message>,
    pub columns: Vec<ColumnHeader>,
    pub pager: Pager,
}

/// Message creation form (modal fragment).
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/message_form.html")]
pub struct MessageFormTemplate {
    pub email: String,
    pub date: String,
    pub description: String,
    pub email_error: Option<String>,
    pub date_error: Option<String>,
    pub description_error: Option<String>,
    /// Non-field notice (upstream failure).
    pub notice: Option<String>,
}

impl MessageFormTemplate {
    fn empty() -> Self {
        Self {
            email: String::new(),
            date: String::new(),
            description: String::new(),
            email_error: None,
            date_error: None,
            description_error: None,
            notice: None,
        }
    }
}

/// Toast notification (out-of-band fragment).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub level: &'static str,
    pub message: String,
}

// =============================================================================
// Page and Fragment Handlers
// =============================================================================

/// Display the dashboard shell.
pub async fn index(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    DashboardTemplate { user }
}

/// User-sessions table fragment.
///
/// On upstream failure the previously rendered rows stay in place: the
/// response suppresses the swap (`HX-Reswap: none`) and only the
/// out-of-band toast lands.
pub async fn sessions_table(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Response {
    let records = match state.backend().user_sessions().await {
        Ok(records) => records,
        Err(e) => return fetch_failure_toast("user sessions", &e),
    };

    let page = paginate(records, &query);
    let columns = vec![
        column("loginTime", "Login Time", &query),
        column("logoutTime", "Logout Time", &query),
        column("status", "Status", &query),
    ];
    let pager = Pager::new("#sessions-table", "/dashboard/sessions", &page, &query);

    SessionsTableTemplate {
        rows: page.rows,
        columns,
        pager,
    }
    .into_response()
}

/// Messages table fragment.
pub async fn messages_table(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Response {
    let records = match state.backend().messages().await {
        Ok(records) => records,
        Err(e) => return fetch_failure_toast("messages", &e),
    };

    let page = paginate(records, &query);
    let columns = vec![
        column("email", "Email", &query),
        column("description", "Description", &query),
        column("date", "Date", &query),
    ];
    let pager = Pager::new("#messages-table", "/dashboard/messages", &page, &query);

    MessagesTableTemplate {
        rows: page.rows,
        columns,
        pager,
    }
    .into_response()
}

/// Render the error toast for a failed collection fetch.
///
/// `HX-Reswap: none` keeps the stale table in place; the toast itself is
/// an out-of-band swap, which HTMX still processes.
fn fetch_failure_toast(what: &str, error: &crate::backend::BackendError) -> Response {
    tracing::error!(error = %error, "failed to fetch {what}");

    let toast = ToastTemplate {
        level: "error",
        message: format!("Could not load {what}. Showing previous data."),
    };

    ([("HX-Reswap", "none")], toast).into_response()
}

// =============================================================================
// Message Creation
// =============================================================================

/// Message creation form data.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// Field-level validation errors for the message form.
#[derive(Debug, Default, PartialEq, Eq)]
struct MessageFormErrors {
    email: Option<String>,
    date: Option<String>,
    description: Option<String>,
}

impl MessageFormErrors {
    fn is_empty(&self) -> bool {
        self.email.is_none() && self.date.is_none() && self.description.is_none()
    }
}

fn validate_message(form: &MessageForm) -> MessageFormErrors {
    let mut errors = MessageFormErrors::default();

    if form.email.trim().is_empty() {
        errors.email = Some("Email is required".to_string());
    } else if let Err(e) = Email::parse(form.email.trim()) {
        errors.email = Some(format!("Invalid email: {e}"));
    }

    if form.date.trim().is_empty() {
        errors.date = Some("Date is required".to_string());
    } else if NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d").is_err() {
        errors.date = Some("Date must be YYYY-MM-DD".to_string());
    }

    if form.description.trim().is_empty() {
        errors.description = Some("Description is required".to_string());
    }

    errors
}

/// Display the empty message creation form.
pub async fn new_message_form(RequireAuth(_user): RequireAuth) -> impl IntoResponse {
    MessageFormTemplate::empty()
}

/// Handle message form submission.
///
/// Validation failures re-render the form with the entered values and
/// never reach the upstream. A successful create clears the modal and
/// fires `messages-refresh` so the table reloads itself.
pub async fn create_message(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<MessageForm>,
) -> Response {
    let errors = validate_message(&form);
    if !errors.is_empty() {
        let template = MessageFormTemplate {
            email: form.email,
            date: form.date,
            description: form.description,
            email_error: errors.email,
            date_error: errors.date,
            description_error: errors.description,
            notice: None,
        };
        return (StatusCode::UNPROCESSABLE_ENTITY, template).into_response();
    }

    let payload = NewMessage {
        email: form.email.trim().to_string(),
        date: form.date.trim().to_string(),
        description: form.description.trim().to_string(),
    };

    match state.backend().create_message(&payload).await {
        Ok(()) => {
            let toast = ToastTemplate {
                level: "success",
                message: "Message created.".to_string(),
            };
            // The modal target swaps to empty; the toast lands out-of-band.
            ([("HX-Trigger", "messages-refresh")], toast).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create message");
            let template = MessageFormTemplate {
                email: form.email,
                date: form.date,
                description: form.description,
                email_error: None,
                date_error: None,
                description_error: None,
                notice: Some("Could not save the message. Please try again.".to_string()),
            };
            (StatusCode::BAD_GATEWAY, template).into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(email: &str, date: &str, description: &str) -> MessageForm {
        MessageForm {
            email: email.to_string(),
            date: date.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_validate_message_all_fields_required() {
        let errors = validate_message(&form("", "", ""));
        assert!(errors.email.is_some());
        assert!(errors.date.is_some());
        assert!(errors.description.is_some());
    }

    #[test]
    fn test_validate_message_email_format() {
        let errors = validate_message(&form("not-an-email", "2025-03-01", "hi"));
        assert!(errors.email.is_some());
        assert!(errors.date.is_none());
    }

    #[test]
    fn test_validate_message_date_format() {
        let errors = validate_message(&form("a@x.com", "03/01/2025", "hi"));
        assert!(errors.date.is_some());
    }

    #[test]
    fn test_validate_message_accepts_valid_input() {
        let errors = validate_message(&form("a@x.com", "2025-03-01", "hello"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_pager_first_page() {
        let page = TablePage::<()> {
            rows: vec![(); 10],
            total_records: 25,
            offset: 0,
            page_size: 10,
        };
        let pager = Pager::new("#messages-table", "/dashboard/messages", &page, &TableQuery::default());
        assert_eq!(pager.first_row, 1);
        assert_eq!(pager.last_row, 10);
        assert!(!pager.has_prev);
        assert!(pager.has_next);
        assert_eq!(pager.next_offset, 10);
    }

    #[test]
    fn test_pager_last_partial_page() {
        let page = TablePage::<()> {
            rows: vec![(); 5],
            total_records: 25,
            offset: 20,
            page_size: 10,
        };
        let query = TableQuery {
            offset: 20,
            ..TableQuery::default()
        };
        let pager = Pager::new("#messages-table", "/dashboard/messages", &page, &query);
        assert_eq!(pager.first_row, 21);
        assert_eq!(pager.last_row, 25);
        assert!(pager.has_prev);
        assert!(!pager.has_next);
        assert_eq!(pager.prev_offset, 10);
    }

    #[test]
    fn test_pager_empty_page() {
        let page = TablePage::<()> {
            rows: vec![],
            total_records: 5,
            offset: 50,
            page_size: 10,
        };
        let query = TableQuery {
            offset: 50,
            ..TableQuery::default()
        };
        let pager = Pager::new("#messages-table", "/dashboard/messages", &page, &query);
        assert_eq!(pager.first_row, 0);
        assert_eq!(pager.last_row, 0);
        assert!(!pager.has_next);
    }

    #[test]
    fn test_pager_saturates_at_maximum_offset() {
        // A hand-crafted query can carry any offset; the pager must not
        // overflow past usize::MAX.
        let page = TablePage::<()> {
            rows: vec![],
            total_records: 5,
            offset: usize::MAX,
            page_size: 10,
        };
        let query = TableQuery {
            offset: usize::MAX,
            ..TableQuery::default()
        };
        let pager = Pager::new("#messages-table", "/dashboard/messages", &page, &query);
        assert_eq!(pager.next_offset, usize::MAX);
        assert_eq!(pager.first_row, 0);
        assert_eq!(pager.last_row, 0);
        assert!(!pager.has_next);
        assert!(pager.has_prev);
    }

    #[test]
    fn test_pager_carries_sort_query() {
        let page = TablePage::<()> {
            rows: vec![],
            total_records: 0,
            offset: 0,
            page_size: 10,
        };
        let query = TableQuery {
            sort: Some("date".to_string()),
            dir: SortDirection::Desc,
            ..TableQuery::default()
        };
        let pager = Pager::new("#messages-table", "/dashboard/messages", &page, &query);
        assert_eq!(pager.sort_query, "&sort=date&dir=desc");
    }

    #[test]
    fn test_column_header_toggles_direction() {
        let query = TableQuery {
            sort: Some("date".to_string()),
            dir: SortDirection::Asc,
            ..TableQuery::default()
        };
        let active = column("date", "Date", &query);
        assert!(active.sorted);
        assert_eq!(active.next_dir, "desc");

        let inactive = column("email", "Email", &query);
        assert!(!inactive.sorted);
        assert_eq!(inactive.next_dir, "asc");
        assert_eq!(inactive.indicator, "");
    }
}
