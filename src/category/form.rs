//! The form shared by the create and edit category pages.

use maud::{Markup, html};

use crate::{
    category::Category,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// Render the category form.
///
/// `method` is the htmx attribute used to submit the form, e.g. "hx-post".
/// Existing subcategories are listed as editable name inputs paired with
/// hidden ID inputs so that the parallel lists line up when submitted.
pub(crate) fn category_form_view(
    method: &str,
    endpoint: &str,
    category: Option<&Category>,
    submit_text: &str,
) -> Markup {
    let name = category.map(|category| category.name.as_ref()).unwrap_or_default();
    let subcategories = category
        .map(|category| category.subcategories.as_slice())
        .unwrap_or_default();
    let (hx_post, hx_put) = match method {
        "hx-put" => (None, Some(endpoint)),
        _ => (Some(endpoint), None),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Category Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    value=(name)
                    placeholder="Category Name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !subcategories.is_empty() {
                fieldset class="space-y-2"
                {
                    legend class=(FORM_LABEL_STYLE) { "Subcategories" }

                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Clear a name to remove the subcategory."
                    }

                    @for subcategory in subcategories {
                        div data-tree-id=[subcategory.tree_id]
                        {
                            input
                                type="hidden"
                                name="subcategory_ids"
                                value=(subcategory.id.as_deref().unwrap_or_default());
                            input
                                type="text"
                                name="subcategory_names"
                                value=(subcategory.name)
                                aria-label="Subcategory name"
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }
                }
            }

            div
            {
                label for="new_subcategory" class=(FORM_LABEL_STYLE) { "New Subcategory" }

                input
                    id="new_subcategory"
                    type="text"
                    name="new_subcategory"
                    placeholder="Optional"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
