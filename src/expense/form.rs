//! The form for creating and editing an expense.

use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    category::CategoryInfo,
    endpoints,
    expense::Expense,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, format_date},
};

/// Render the expense form, prefilled with `expense` when editing.
///
/// `id_prefix` keeps element IDs unique when several forms are on one page.
/// The date of `expense` is shown in the local time of `local_offset`.
pub(crate) fn expense_form_view(
    expense: Option<&Expense>,
    categories: &CategoryInfo,
    id_prefix: &str,
    local_offset: UtcOffset,
) -> Markup {
    let expense_id = expense.and_then(|expense| expense.id.as_deref()).unwrap_or_default();
    let category_id = expense.map(|expense| expense.category_id.as_str());
    let subcategory_id = expense.and_then(|expense| expense.subcategory_id.as_deref());
    let amount = expense
        .map(|expense| format!("{:.2}", expense.amount))
        .unwrap_or_default();
    let trx_date = expense
        .and_then(|expense| format_date(&expense.trx_date, local_offset))
        .unwrap_or_default();
    let submit_text = if expense_id.is_empty() {
        "Create Expense"
    } else {
        "Save Expense"
    };
    let field_id = |name: &str| format!("{id_prefix}{name}");

    html!(
        form
            hx-post=(endpoints::EXPENSES_API)
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            input type="hidden" name="expense_id" value=(expense_id);

            div
            {
                label for=(field_id("category_id")) class=(FORM_LABEL_STYLE) { "Category" }
                select
                    id=(field_id("category_id"))
                    name="category_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select a category" }

                    @for category in &categories.select_categories {
                        option
                            value=(category.id)
                            selected[category_id == Some(category.id.as_str())]
                        {
                            (category.name)
                        }
                    }
                }
            }

            div
            {
                label for=(field_id("subcategory_id")) class=(FORM_LABEL_STYLE) { "Subcategory" }
                select
                    id=(field_id("subcategory_id"))
                    name="subcategory_id"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "None" }

                    @for category in &categories.categories {
                        @if !category.subcategories.is_empty() {
                            optgroup label=(category.name)
                            {
                                @for subcategory in &category.subcategories {
                                    @if let Some(id) = &subcategory.id {
                                        option
                                            value=(id)
                                            selected[subcategory_id == Some(id.as_str())]
                                        {
                                            (subcategory.name)
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div
            {
                label for=(field_id("amount")) class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id=(field_id("amount"))
                    type="number"
                    name="amount"
                    step="0.01"
                    value=(amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for=(field_id("trx_date")) class=(FORM_LABEL_STYLE) { "Date" }
                input
                    id=(field_id("trx_date"))
                    type="date"
                    name="trx_date"
                    value=(trx_date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    )
}
