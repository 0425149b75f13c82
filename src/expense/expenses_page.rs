//! The page listing the expenses that match a filter.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    AppState, Error,
    category::{CategoryInfo, CategoryService, TreeIdGenerator},
    endpoints,
    expense::{Expense, ExpenseService, form::expense_form_view},
    filter::{ExpenseFilter, FilterForm, filter_form_view},
    html::{
        CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, delete_button, format_currency, format_date,
    },
    navigation::NavBar,
    timezone::{local_offset, local_today},
};

/// The state needed for the expense pages.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub expense_service: ExpenseService,
    pub category_service: CategoryService,
    pub tree_ids: Arc<TreeIdGenerator>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_service: state.expense_service.clone(),
            category_service: state.category_service.clone(),
            tree_ids: state.tree_ids.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the expenses matching the filter in the query string.
///
/// Without dates in the query string, the last year of expenses is shown.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(filter_form): Query<FilterForm>,
) -> Result<Response, Error> {
    let local_offset = local_offset(&state.local_timezone)?;
    let default_filter = ExpenseFilter::last_year(local_today(&state.local_timezone)?);
    let filter = filter_form.into_filter(default_filter)?;

    let (expenses, categories) = tokio::try_join!(
        state.expense_service.get_expenses(&filter),
        state.category_service.get_category_info(&state.tree_ids),
    )?;

    Ok(expenses_view(&expenses, &categories, &filter, local_offset).into_response())
}

fn expenses_view(
    expenses: &[Expense],
    categories: &CategoryInfo,
    filter: &ExpenseFilter,
    local_offset: UtcOffset,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let filter_form = filter_form_view(
        endpoints::EXPENSES_VIEW,
        filter,
        Some(&categories.select_categories),
    );
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl"
            {
                div class="flex justify-between flex-wrap items-end mb-4"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE)
                    {
                        "Add Expense"
                    }
                }

                (filter_form)

                div class="relative overflow-x-auto shadow-md rounded"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Subcategory" }
                                th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for expense in expenses {
                                (expense_row_view(expense, categories, local_offset))
                            }

                            @if expenses.is_empty() {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td colspan="5" class="px-6 py-4 text-center"
                                    {
                                        "No expenses match the filter."
                                    }
                                }
                            }
                        }

                        tfoot
                        {
                            tr class="font-semibold text-gray-900 dark:text-white"
                            {
                                th scope="row" colspan="3" class=(TABLE_CELL_STYLE) { "Total" }
                                td class="px-6 py-4 text-right" { (format_currency(total)) }
                                td {}
                            }
                        }
                    }
                }
            }
        }
    );

    base("Expenses", &[], &content)
}

fn expense_row_view(expense: &Expense, categories: &CategoryInfo, local_offset: UtcOffset) -> Markup {
    let expense_id = expense.id.as_deref().unwrap_or_default();
    let category_name = categories
        .category_name(&expense.category_id)
        .unwrap_or("Unknown");
    let subcategory_name = expense
        .subcategory_id
        .as_deref()
        .and_then(|id| categories.subcategory_name(id));
    let trx_date = format_date(&expense.trx_date, local_offset).unwrap_or_else(|| "-".to_owned());
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense_id);
    let confirm_message = format!(
        "Are you sure you want to delete the {} expense on {trx_date}?",
        format_currency(expense.amount)
    );

    html!(
        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense_id)
        {
            td class=(TABLE_CELL_STYLE) { (trx_date) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (category_name) }
            }
            td class=(TABLE_CELL_STYLE) { (subcategory_name.unwrap_or("-")) }
            td class="px-6 py-4 text-right" { (format_currency(expense.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4 items-start"
                {
                    details
                    {
                        summary class=(LINK_STYLE) { "Edit" }

                        div class="mt-2 w-72"
                        {
                            (expense_form_view(
                                Some(expense),
                                categories,
                                &format!("expense-{expense_id}-"),
                                local_offset,
                            ))
                        }
                    }

                    (delete_button(&delete_url, &confirm_message, "closest tr"))
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, State},
        http::Method,
        response::IntoResponse,
    };
    use axum_extra::extract::Query;
    use scraper::Selector;
    use serde_json::json;

    use crate::{
        Error,
        expense::expenses_page::{ExpensesPageState, get_expenses_page},
        filter::FilterForm,
        test_utils::{MockApi, MockRoute, assert_status_ok, assert_valid_html, parse_html_document},
    };

    fn page_state(api: &MockApi) -> ExpensesPageState {
        ExpensesPageState::from_ref(&api.state())
    }

    fn categories_json() -> serde_json::Value {
        json!([{"_id": "c1", "name": "Food", "subcategories": [{"id": "s1", "name": "Groceries"}]}])
    }

    #[tokio::test]
    async fn lists_expenses_with_category_names() {
        let api = MockApi::start(vec![
            MockRoute::ok(Method::GET, "/category/", categories_json()),
            MockRoute::ok(
                Method::GET,
                "/expense/",
                json!([
                    {"_id": "e1", "categoryId": "c1", "subcategoryId": "s1", "amount": 12.5,
                        "trxDate": "2024-03-04T00:00:00.000Z"},
                    {"_id": "e2", "categoryId": "gone", "amount": 3, "trxDate": "2024-03-05"}
                ]),
            ),
        ])
        .await;
        let state = page_state(&api);

        let response = get_expenses_page(State(state), Query(FilterForm::default()))
            .await
            .unwrap()
            .into_response();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let rows: Vec<Vec<String>> = html
            .select(&Selector::parse("tbody tr").unwrap())
            .map(|row| {
                row.select(&Selector::parse("td").unwrap())
                    .take(4)
                    .map(|cell| cell.text().collect::<String>().trim().to_owned())
                    .collect()
            })
            .collect();
        assert_eq!(
            rows[0][..4],
            ["2024-03-04", "Food", "Groceries", "$12.50"].map(str::to_owned)
        );
        assert_eq!(rows[1][1], "Unknown");
        assert_eq!(rows[1][2], "-");
    }

    #[tokio::test]
    async fn shows_dates_in_local_timezone() {
        let api = MockApi::start(vec![
            MockRoute::ok(Method::GET, "/category/", categories_json()),
            MockRoute::ok(
                Method::GET,
                "/expense/",
                json!([{"_id": "e1", "categoryId": "c1", "amount": 1,
                    "trxDate": "2024-03-04T20:00:00.000Z"}]),
            ),
        ])
        .await;
        let state = ExpensesPageState {
            local_timezone: "Asia/Tokyo".to_owned(),
            ..page_state(&api)
        };

        let response = get_expenses_page(State(state), Query(FilterForm::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let date_cell = html
            .select(&Selector::parse("tbody tr td").unwrap())
            .next()
            .expect("No expense row");
        assert_eq!(date_cell.text().collect::<String>().trim(), "2024-03-05");
        let date_input = html
            .select(&Selector::parse("tbody input[name=trx_date]").unwrap())
            .next()
            .expect("No date input in edit form");
        assert_eq!(date_input.value().attr("value"), Some("2024-03-05"));
    }

    #[tokio::test]
    async fn sends_filter_from_query_string() {
        let api = MockApi::start(vec![
            MockRoute::ok(Method::GET, "/category/", categories_json()),
            MockRoute::ok(Method::GET, "/expense/", json!([])),
        ])
        .await;
        let state = page_state(&api);
        let filter_form: FilterForm = serde_html_form::from_str(
            "start_date=2024-01-01&end_date=2024-02-01&category_ids=c1",
        )
        .unwrap();

        get_expenses_page(State(state), Query(filter_form))
            .await
            .unwrap();

        let request = api
            .requests()
            .into_iter()
            .find(|request| request.path == "/expense/")
            .unwrap();
        assert_eq!(
            request.query_pairs(),
            vec![
                ("startDate".to_owned(), "2024-01-01".to_owned()),
                ("endDate".to_owned(), "2024-02-01".to_owned()),
                ("categoryIds[]".to_owned(), "c1".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn invalid_filter_date_is_an_error() {
        let api = MockApi::start(vec![]).await;
        let state = page_state(&api);
        let filter_form = FilterForm {
            start_date: "yesterday".to_owned(),
            ..Default::default()
        };

        let result = get_expenses_page(State(state), Query(filter_form)).await;

        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidDate("yesterday".to_owned()))
        );
    }
}
