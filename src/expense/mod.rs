//! Expenses: records, aggregation for charts, CSV imports and the pages for
//! listing and editing them.

mod aggregation;
mod create_page;
mod csv;
mod delete_endpoint;
mod domain;
mod expenses_page;
mod form;
mod import;
mod save_endpoint;
mod service;
mod time_series;

pub use aggregation::aggregate_totals;
pub use create_page::get_new_expense_page;
pub use csv::parse_expense_csv;
pub use delete_endpoint::delete_expense_endpoint;
pub use domain::{
    Expense, ExpenseId, ExpenseTotal, ExpenseTotalRow, SubcategoryTotal, TimeSeries,
    TimeSeriesRow, TotalKey,
};
pub use expenses_page::{ExpensesPageState, get_expenses_page};
pub use import::{
    DateFormat, ImportAmount, ImportDetails, ImportExpense, RawExpenseRow, new_import_id,
    normalize_import_rows,
};
pub use save_endpoint::{ExpenseEndpointState, save_expense_endpoint};
pub use service::ExpenseService;
pub use time_series::{UNKNOWN_CATEGORY_NAME, build_time_series};
