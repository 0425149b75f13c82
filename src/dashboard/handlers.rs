//! HTTP handlers and page views for the dashboard.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    category::{CategorySelectItem, CategoryService, TreeIdGenerator},
    dashboard::{
        charts::{DashboardChart, charts_script, charts_view, time_series_chart, totals_chart},
        tables::totals_table,
    },
    endpoints,
    expense::{ExpenseService, ExpenseTotal, TimeSeries},
    filter::{ExpenseFilter, FilterForm, filter_form_view, filtered_url},
    html::{HeadElement, LINK_STYLE, base, link},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub expense_service: ExpenseService,
    pub category_service: CategoryService,
    pub tree_ids: Arc<TreeIdGenerator>,
    /// The canonical timezone used to work out the default date range.
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_service: state.expense_service.clone(),
            category_service: state.category_service.clone(),
            tree_ids: state.tree_ids.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the expenses matching the filter in
/// the query string.
///
/// Without dates in the query string, the last year is shown. The totals,
/// the monthly time series and the category options are fetched concurrently.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(filter_form): Query<FilterForm>,
) -> Result<Response, Error> {
    let default_filter = ExpenseFilter::last_year(local_today(&state.local_timezone)?);
    let filter = filter_form.into_filter(default_filter)?;

    let (totals, time_series, categories) = tokio::try_join!(
        state.expense_service.get_expense_totals(&filter),
        state.expense_service.get_expense_time_series(&filter),
        state.category_service.get_category_select(&state.tree_ids),
    )
    .inspect_err(|error| tracing::error!("Could not load the dashboard: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if totals.is_empty() && time_series.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, &filter, &categories).into_response());
    }

    let charts = build_dashboard_charts(&totals, &time_series);

    Ok(dashboard_view(nav_bar, &filter, &categories, &charts, &totals).into_response())
}

/// The chart options are serialized to JSON for ECharts consumption.
fn build_dashboard_charts(totals: &[ExpenseTotal], time_series: &[TimeSeries]) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "totals-chart",
            options: totals_chart(totals).to_string(),
        },
        DashboardChart {
            id: "time-series-chart",
            options: time_series_chart(time_series).to_string(),
        },
    ]
}

/// Renders the dashboard page when there are no expenses in the filter range.
fn dashboard_no_data_view(
    nav_bar: NavBar,
    filter: &ExpenseFilter,
    categories: &[CategorySelectItem],
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "manually");
    let import_link = link(endpoints::IMPORTS_VIEW, "importing a CSV file");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-screen-xl text-gray-900 dark:text-white"
        {
            (filter_form_view(endpoints::DASHBOARD_VIEW, filter, Some(categories)))

            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once there are expenses in this period.
                You can add expenses " (new_expense_link) " or by " (import_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with the filter form, charts and totals table.
fn dashboard_view(
    nav_bar: NavBar,
    filter: &ExpenseFilter,
    categories: &[CategorySelectItem],
    charts: &[DashboardChart],
    totals: &[ExpenseTotal],
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let expenses_url = filtered_url(endpoints::EXPENSES_VIEW, filter);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (filter_form_view(endpoints::DASHBOARD_VIEW, filter, Some(categories)))

            (charts_view(charts))

            section class="w-full mb-8"
            {
                (totals_table(totals))

                p class="mt-4"
                {
                    a href=(expenses_url) class=(LINK_STYLE) { "View these expenses" }
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}
