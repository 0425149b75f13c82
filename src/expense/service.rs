//! Calls to the `/expense/` resource of the expense service.

use serde::Serialize;
use serde_json::Value;

use crate::{
    ApiClient, Error,
    api::record_path,
    expense::{
        Expense, ExpenseTotal, ExpenseTotalRow, TimeSeries, TimeSeriesRow, aggregate_totals,
        build_time_series,
        import::{ImportDetails, ImportExpense},
    },
    filter::ExpenseFilter,
};

const EXPENSE_PATH: &str = "/expense/";
const TOTALS_PATH: &str = "/expense/totals";
const TIME_SERIES_PATH: &str = "/expense/timeseries";
const IMPORT_PATH: &str = "/expense/import";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest<'a> {
    expenses: &'a [ImportExpense],
    import_details: &'a ImportDetails,
}

/// Reads, writes and aggregates expenses through the expense service.
#[derive(Debug, Clone)]
pub struct ExpenseService {
    api: ApiClient,
}

impl ExpenseService {
    /// Create an expense service that sends requests with `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Get the expenses matching `filter`.
    pub async fn get_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, Error> {
        let expenses: Option<Vec<Expense>> = self
            .api
            .get(
                "ExpenseService.get_expenses",
                EXPENSE_PATH,
                &filter.query_pairs(),
            )
            .await?;

        Ok(expenses.unwrap_or_default())
    }

    /// Create `expense` if it has no ID, otherwise update it.
    pub async fn save_expense(&self, expense: &Expense) -> Result<Value, Error> {
        match expense.id {
            Some(_) => self.update_expense(expense).await,
            None => self.create_expense(expense).await,
        }
    }

    /// Create `expense` and return the service's response.
    pub async fn create_expense(&self, expense: &Expense) -> Result<Value, Error> {
        self.api
            .post("ExpenseService.create_expense", EXPENSE_PATH, expense)
            .await
    }

    /// Update `expense` and return the service's response.
    ///
    /// # Errors
    /// Returns [Error::MissingId] if `expense` has not been created yet.
    pub async fn update_expense(&self, expense: &Expense) -> Result<Value, Error> {
        let id = expense.id.as_deref().ok_or(Error::MissingId("expense"))?;

        self.api
            .put(
                "ExpenseService.update_expense",
                &record_path(EXPENSE_PATH, id),
                expense,
            )
            .await
    }

    /// Delete the expense with `expense_id`.
    pub async fn delete_expense(&self, expense_id: &str) -> Result<Value, Error> {
        self.api
            .delete(
                "ExpenseService.delete_expense",
                &record_path(EXPENSE_PATH, expense_id),
            )
            .await
    }

    /// Get the total of each category matching `filter`.
    pub async fn get_expense_totals(
        &self,
        filter: &ExpenseFilter,
    ) -> Result<Vec<ExpenseTotal>, Error> {
        let rows: Option<Vec<ExpenseTotalRow>> = self
            .api
            .get(
                "ExpenseService.get_expense_totals",
                TOTALS_PATH,
                &filter.query_pairs(),
            )
            .await?;

        Ok(aggregate_totals(rows.unwrap_or_default()))
    }

    /// Get the monthly totals of each category matching `filter`.
    pub async fn get_expense_time_series(
        &self,
        filter: &ExpenseFilter,
    ) -> Result<Vec<TimeSeries>, Error> {
        let rows: Option<Vec<TimeSeriesRow>> = self
            .api
            .get(
                "ExpenseService.get_expense_time_series",
                TIME_SERIES_PATH,
                &filter.query_pairs(),
            )
            .await?;

        build_time_series(rows.unwrap_or_default())
            .inspect_err(|error| tracing::error!("Could not build time series: {error}"))
    }

    /// Send normalized `expenses` as one import batch.
    ///
    /// The service decides which rows are saved; its response is returned as is.
    pub async fn import_expenses(
        &self,
        expenses: &[ImportExpense],
        import_details: &ImportDetails,
    ) -> Result<Value, Error> {
        self.api
            .post(
                "ExpenseService.import_expenses",
                IMPORT_PATH,
                &ImportRequest {
                    expenses,
                    import_details,
                },
            )
            .await
    }

    /// Delete every expense created by the import with `import_id`.
    pub async fn delete_expenses_by_import_id(&self, import_id: &str) -> Result<Value, Error> {
        self.api
            .delete(
                "ExpenseService.delete_expenses_by_import_id",
                &record_path(IMPORT_PATH, import_id),
            )
            .await
    }
}
