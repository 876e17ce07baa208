//! Reusable UI building blocks shared by the route handlers.

pub mod lazy_table;

pub use lazy_table::{paginate, SortDirection, SortableRecord, TablePage, TableQuery};
