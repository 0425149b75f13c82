//! The page for creating a new expense.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    Error,
    category::CategoryInfo,
    endpoints,
    expense::{ExpensesPageState, form::expense_form_view},
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::local_offset,
};

/// Render the page for creating a new expense.
pub async fn get_new_expense_page(
    State(state): State<ExpensesPageState>,
) -> Result<Response, Error> {
    let local_offset = local_offset(&state.local_timezone)?;
    let categories = state
        .category_service
        .get_category_info(&state.tree_ids)
        .await?;

    Ok(new_expense_view(&categories, local_offset).into_response())
}

fn new_expense_view(categories: &CategoryInfo, local_offset: UtcOffset) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Expense" }

            (expense_form_view(None, categories, "", local_offset))
        }
    );

    base("Create Expense", &[], &content)
}
