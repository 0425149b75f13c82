//! Dashboard module
//!
//! Provides an overview page with category totals and monthly spending
//! charts for a date range and set of categories.

mod charts;
mod handlers;
mod tables;

pub use handlers::{DashboardState, get_dashboard_page};
