//! The page listing import batches, with the form for uploading a new one.

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
    filter::{ExpenseFilter, FilterForm, filter_form_view},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        delete_button, format_date, loading_spinner,
    },
    import::{ImportService, ImportSummary},
    navigation::NavBar,
    timezone::{local_offset, local_today},
};

/// The date format suggested by the upload form.
const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

/// The state needed for the imports page.
#[derive(Debug, Clone)]
pub struct ImportsPageState {
    pub import_service: ImportService,
    pub category_service: CategoryService,
    pub tree_ids: Arc<TreeIdGenerator>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ImportsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            import_service: state.import_service.clone(),
            category_service: state.category_service.clone(),
            tree_ids: state.tree_ids.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the imports in the date range of the query string and the upload form.
pub async fn get_imports_page(
    State(state): State<ImportsPageState>,
    Query(filter_form): Query<FilterForm>,
) -> Result<Response, Error> {
    let local_offset = local_offset(&state.local_timezone)?;
    let default_filter = ExpenseFilter::last_year(local_today(&state.local_timezone)?);
    let filter = filter_form.into_filter(default_filter)?;

    let (imports, categories) = tokio::try_join!(
        state.import_service.get_imports(&filter),
        state.category_service.get_category_info(&state.tree_ids),
    )?;

    Ok(imports_view(&imports, &categories, &filter, local_offset).into_response())
}

fn imports_view(
    imports: &[ImportSummary],
    categories: &CategoryInfo,
    filter: &ExpenseFilter,
    local_offset: UtcOffset,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::IMPORTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-8"
            {
                section
                {
                    h1 class="text-xl font-bold mb-4" { "Import Expenses" }

                    (upload_form_view(categories))
                }

                section
                {
                    h2 class="text-lg font-bold mb-4" { "Previous Imports" }

                    (filter_form_view(endpoints::IMPORTS_VIEW, filter, None))

                    div class="relative overflow-x-auto shadow-md rounded"
                    {
                        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "File" }
                                    th scope="col" class="px-6 py-4 text-right" { "Expenses" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for import in imports {
                                    (import_row_view(import, local_offset))
                                }

                                @if imports.is_empty() {
                                    tr class=(TABLE_ROW_STYLE)
                                    {
                                        td colspan="4" class="px-6 py-4 text-center"
                                        {
                                            "No imports in this period."
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Imports", &[], &content)
}

fn import_row_view(import: &ImportSummary, local_offset: UtcOffset) -> Markup {
    let import_date = import
        .import_date
        .as_deref()
        .and_then(|import_date| format_date(import_date, local_offset))
        .unwrap_or_else(|| "-".to_owned());
    let file_name = import.file_name.as_deref().unwrap_or("-");
    let expense_count = import
        .expense_count
        .map(|count| count.to_string())
        .unwrap_or_else(|| "-".to_owned());
    let delete_import_url = endpoints::format_endpoint(endpoints::DELETE_IMPORT, &import.id);
    let delete_expenses_url = endpoints::format_endpoint(
        endpoints::DELETE_IMPORT_EXPENSES,
        import.expenses_import_id(),
    );

    html!(
        tr class=(TABLE_ROW_STYLE) data-import-id=(import.id)
        {
            td class=(TABLE_CELL_STYLE) { (import_date) }
            td class=(TABLE_CELL_STYLE) { (file_name) }
            td class="px-6 py-4 text-right" { (expense_count) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    button
                        hx-delete=(delete_expenses_url)
                        hx-confirm=(format!("Delete every expense imported from '{file_name}'? The import itself is kept."))
                        hx-swap="none"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete expenses"
                    }

                    (delete_button(
                        &delete_import_url,
                        &format!("Delete the import of '{file_name}' and all of its expenses?"),
                        "closest tr",
                    ))
                }
            }
        }
    )
}

fn upload_form_view(categories: &CategoryInfo) -> Markup {
    html!(
        form
            hx-post=(endpoints::IMPORT_API)
            enctype="multipart/form-data"
            hx-disabled-elt="#file, #submit-button"
            hx-indicator="#indicator"
            hx-swap="none"
            hx-target-error="#alert-container"
            class="max-w-md space-y-4"
        {
            div
            {
                label for="file" class=(FORM_LABEL_STYLE) { "CSV file" }
                input
                    id="file"
                    type="file"
                    name="file"
                    accept="text/csv"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
                p class="mt-1 text-sm"
                {
                    "The file needs a header row with a date (\"trxDate\" or \"date\") and an \"amount\" column. "
                    "\"categoryId\" and \"subcategoryId\" columns are optional."
                }
            }

            div
            {
                label for="date_format" class=(FORM_LABEL_STYLE) { "Date format" }
                input
                    id="date_format"
                    type="text"
                    name="date_format"
                    value=(DEFAULT_DATE_FORMAT)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
                p class="mt-1 text-sm" { "For example DD/MM/YYYY, MM/DD/YY or D MMM YYYY." }
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Default category" }
                select id="category_id" name="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "None" }

                    @for category in &categories.select_categories {
                        option value=(category.id) { (category.name) }
                    }
                }
                p class="mt-1 text-sm"
                {
                    "Used for rows without a category. Required if the file has no \"categoryId\" column."
                }
            }

            div
            {
                label for="subcategory_id" class=(FORM_LABEL_STYLE) { "Default subcategory" }
                select id="subcategory_id" name="subcategory_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "None" }

                    @for category in &categories.categories {
                        @if !category.subcategories.is_empty() {
                            optgroup label=(category.name)
                            {
                                @for subcategory in &category.subcategories {
                                    @if let Some(id) = &subcategory.id {
                                        option value=(id) { (subcategory.name) }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                " Upload File"
            }
        }
    )
}
