//! Categories listing page, drawn as a tree of categories and subcategories.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    category::{Category, CategoryService, TreeIdGenerator},
    endpoints,
    html::{CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, delete_button},
    navigation::NavBar,
};

/// The state needed for the category pages.
#[derive(Debug, Clone)]
pub struct CategoryPageState {
    pub category_service: CategoryService,
    pub tree_ids: Arc<TreeIdGenerator>,
}

impl FromRef<AppState> for CategoryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            category_service: state.category_service.clone(),
            tree_ids: state.tree_ids.clone(),
        }
    }
}

/// Render the categories page.
pub async fn get_categories_page(
    State(state): State<CategoryPageState>,
) -> Result<Response, Error> {
    let categories = state
        .category_service
        .get_categories(&state.tree_ids)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(categories_view(&categories).into_response())
}

fn categories_view(categories: &[Category]) -> Markup {
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-3xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(new_category_route) class=(LINK_STYLE)
                    {
                        "Create Category"
                    }
                }

                @if categories.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "No categories created yet. "
                        a href=(new_category_route) class=(LINK_STYLE)
                        {
                            "Create your first category"
                        }
                    }
                } @else {
                    ul role="tree" class="space-y-2"
                    {
                        @for category in categories {
                            (category_node_view(category))
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}

fn category_node_view(category: &Category) -> Markup {
    let actions = category.id.as_deref().map(|id| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}' and its {} subcategories?",
            category.name,
            category.subcategories.len()
        );

        (edit_url, delete_url, confirm_message)
    });

    html!(
        li
            role="treeitem"
            data-tree-id=[category.tree_id]
            class="p-4 rounded bg-white dark:bg-gray-800 shadow"
        {
            div class="flex justify-between items-center"
            {
                span class=(CATEGORY_BADGE_STYLE) { (category.name) }

                @if let Some((edit_url, delete_url, confirm_message)) = &actions {
                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                        (delete_button(delete_url, confirm_message, "closest li"))
                    }
                }
            }

            @if !category.subcategories.is_empty() {
                ul role="group" class="mt-2 ml-6 list-disc text-sm"
                {
                    @for subcategory in &category.subcategories {
                        li
                            role="treeitem"
                            data-tree-id=[subcategory.tree_id]
                            data-parent-tree-id=[subcategory.parent_tree_id]
                        {
                            (subcategory.name)
                        }
                    }
                }
            }
        }
    )
}
