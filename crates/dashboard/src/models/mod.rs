//! Domain models for the dashboard.

pub mod session;

pub use session::{keys as session_keys, CurrentUser};
