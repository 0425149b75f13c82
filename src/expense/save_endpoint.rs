//! The endpoint for saving an expense from the expense form.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState, endpoints,
    expense::{ExpenseService, domain::ExpenseFormData},
};

/// The state needed for saving and deleting expenses.
#[derive(Debug, Clone)]
pub struct ExpenseEndpointState {
    pub expense_service: ExpenseService,
}

impl FromRef<AppState> for ExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_service: state.expense_service.clone(),
        }
    }
}

/// Create the expense in the form, or update it if the form has an expense ID,
/// then redirect to the expenses page.
pub async fn save_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Form(form): Form<ExpenseFormData>,
) -> Response {
    let expense = match form.into_expense() {
        Ok(expense) => expense,
        Err(error) => return error.into_alert_response(),
    };

    match state.expense_service.save_expense(&expense).await {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
