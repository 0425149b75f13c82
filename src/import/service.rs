//! Calls to the `/import` resource of the expense service.

use serde_json::Value;

use crate::{ApiClient, Error, api::record_path, filter::ExpenseFilter, import::ImportSummary};

const IMPORT_PATH: &str = "/import";

/// Lists and deletes import batches through the expense service.
#[derive(Debug, Clone)]
pub struct ImportService {
    api: ApiClient,
}

impl ImportService {
    /// Create an import service that sends requests with `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Get the imports in the date range of `filter`. Categories are ignored.
    pub async fn get_imports(&self, filter: &ExpenseFilter) -> Result<Vec<ImportSummary>, Error> {
        let imports: Option<Vec<ImportSummary>> = self
            .api
            .get(
                "ImportService.get_imports",
                IMPORT_PATH,
                &filter.date_query_pairs(),
            )
            .await?;

        Ok(imports.unwrap_or_default())
    }

    /// Delete the import summary with `import_id`. The service also deletes
    /// the expenses of the import.
    pub async fn delete_import(&self, import_id: &str) -> Result<Value, Error> {
        self.api
            .delete(
                "ImportService.delete_import",
                &record_path(IMPORT_PATH, import_id),
            )
            .await
    }
}
