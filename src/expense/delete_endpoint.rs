//! The endpoint for deleting an expense.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    expense::{ExpenseEndpointState, ExpenseId},
};

/// Delete an expense and return an alert with the outcome.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseEndpointState>,
) -> Response {
    match state.expense_service.delete_expense(&expense_id).await {
        Ok(_) => Alert::SuccessSimple {
            message: "Expense deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
