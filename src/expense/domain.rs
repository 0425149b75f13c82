//! Expense records and the aggregate rows the expense service reports.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{CategoryId, SubcategoryId},
    filter::{format_iso_date, parse_iso_date},
};

/// The expense service's identifier for an expense.
pub type ExpenseId = String;

/// A single expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// `None` for an expense that has not been created yet.
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ExpenseId>,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
    /// The subcategory within the category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<SubcategoryId>,
    /// The amount spent.
    pub amount: f64,
    /// The transaction date as sent by the expense service, usually an ISO
    /// date or date-time.
    pub trx_date: String,
    /// The import batch that created this expense, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
}

/// The key of a totals row: the category and, optionally, the subcategory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalKey {
    /// The category of the row.
    pub category_id: CategoryId,
    /// The subcategory of the row, `None` for expenses without one.
    #[serde(default)]
    pub subcategory_id: Option<SubcategoryId>,
}

/// One row of `GET /expense/totals`.
///
/// The service returns one row per category and subcategory pair, ordered so
/// that rows of the same category are adjacent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTotalRow {
    /// The category and subcategory the row totals.
    #[serde(rename = "_id")]
    pub key: TotalKey,
    /// The name of the category.
    #[serde(default)]
    pub category_name: String,
    /// The name of the subcategory.
    #[serde(default)]
    pub subcategory_name: Option<String>,
    /// The sum of the amounts of the matching expenses.
    pub total_amount: f64,
}

/// The total of one subcategory within an [ExpenseTotal].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryTotal {
    #[allow(missing_docs)]
    pub subcategory_id: SubcategoryId,
    #[allow(missing_docs)]
    pub subcategory_name: String,
    /// The sum of the subcategory's expenses.
    pub total_amount: f64,
}

/// The total of one category and its share of the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTotal {
    #[allow(missing_docs)]
    pub category_id: CategoryId,
    #[allow(missing_docs)]
    pub category_name: String,
    /// The sum of the category's expenses over all of its subcategories.
    pub total_amount: f64,
    /// Percentage of the grand total, between 0 and 100.
    pub percent: f64,
    /// The subcategory rows, in the order the expense service sent them.
    pub subcategory_totals: Vec<SubcategoryTotal>,
}

/// One row of `GET /expense/timeseries`: the total of a category for a month.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesRow {
    #[allow(missing_docs)]
    pub category_id: CategoryId,
    /// Missing for categories that have been deleted.
    #[serde(default)]
    pub category_name: Option<String>,
    #[allow(missing_docs)]
    pub trx_year: i32,
    /// The month of the year, 1 to 12.
    pub trx_month: u8,
    /// The sum of the category's expenses in the month.
    pub total_amount: f64,
}

/// The monthly totals of one category, ready for a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    /// The category name.
    pub name: String,
    /// `(milliseconds since the Unix epoch, amount)` pairs in month order.
    pub data: Vec<(i64, f64)>,
}

/// Form data for creating and editing expenses.
///
/// An empty `expense_id` means the expense is new.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExpenseFormData {
    #[serde(default)]
    pub expense_id: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub subcategory_id: String,
    pub amount: String,
    pub trx_date: String,
}

impl ExpenseFormData {
    /// Validate the form and build the expense to send to the expense service.
    pub(crate) fn into_expense(self) -> Result<Expense, Error> {
        let category_id = non_empty(self.category_id).ok_or(Error::ValueRequired)?;

        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| Error::InvalidAmount(self.amount.clone()))?;

        let trx_date = format_iso_date(parse_iso_date(&self.trx_date)?);

        Ok(Expense {
            id: non_empty(self.expense_id),
            category_id,
            subcategory_id: non_empty(self.subcategory_id),
            amount,
            trx_date,
            import_id: None,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|value| !value.trim().is_empty())
}
