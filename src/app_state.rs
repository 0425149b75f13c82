//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use crate::{
    ApiClient, Error,
    category::{CategoryService, TreeIdGenerator},
    expense::ExpenseService,
    import::ImportService,
};

/// The state of the web server.
///
/// Every service shares one [ApiClient] and therefore one connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Reads and writes categories.
    pub category_service: CategoryService,

    /// Reads, writes and aggregates expenses.
    pub expense_service: ExpenseService,

    /// Lists and deletes import batches.
    pub import_service: ImportService,

    /// Hands out node IDs for category trees for as long as the server runs.
    pub tree_ids: Arc<TreeIdGenerator>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] whose services talk to the expense service at `api_base_url`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidApiUrl] if `api_base_url` is not an absolute http(s) URL.
    pub fn new(api_base_url: &str, local_timezone: &str) -> Result<Self, Error> {
        let api = ApiClient::new(api_base_url)?;

        Ok(Self {
            category_service: CategoryService::new(api.clone()),
            expense_service: ExpenseService::new(api.clone()),
            import_service: ImportService::new(api),
            tree_ids: Arc::new(TreeIdGenerator::new()),
            local_timezone: local_timezone.to_owned(),
        })
    }
}
