//! Category editing page and endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    category::{
        Category, CategoryEndpointState, CategoryId, CategoryPageState, domain::CategoryFormData,
        form::category_form_view, tree::category_map,
    },
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// Render the category editing page.
///
/// The expense service has no endpoint for a single category, so the
/// category is looked up in the full list.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryPageState>,
) -> Result<Response, Error> {
    let categories = state
        .category_service
        .get_categories(&state.tree_ids)
        .await
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let category = category_map(&categories)
        .remove(&category_id)
        .ok_or(Error::NotFound)?;

    Ok(edit_category_view(&category_id, &category).into_response())
}

/// Handle category update form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryEndpointState>,
    Form(form_data): Form<CategoryFormData>,
) -> Response {
    let category = match form_data.into_category(Some(category_id.clone())) {
        Ok(category) => category,
        Err(error) => return error.into_alert_response(),
    };

    match state.category_service.update_category(&category).await {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_category_view(category_id: &str, category: &Category) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let form = category_form_view("hx-put", &update_endpoint, Some(category), "Save Category");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Category", &[], &content)
}

#[cfg(test)]
mod edit_category_page_tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::{Method, StatusCode},
        response::IntoResponse,
    };
    use scraper::Selector;
    use serde_json::json;

    use crate::{
        category::{CategoryPageState, get_edit_category_page},
        test_utils::{
            MockApi, MockRoute, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    fn categories_route() -> MockRoute {
        MockRoute::ok(
            Method::GET,
            "/category/",
            json!([{"_id": "c1", "name": "Food", "subcategories": [
                {"id": "s1", "name": "Groceries"},
                {"id": "s2", "name": "Takeaways"}
            ]}]),
        )
    }

    #[tokio::test]
    async fn render_page_with_subcategories() {
        let api = MockApi::start(vec![categories_route()]).await;
        let state = CategoryPageState::from_ref(&api.state());

        let response = get_edit_category_page(Path("c1".to_owned()), State(state))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/categories/c1", "hx-put");

        let name = form
            .select(&Selector::parse("input[name=name]").unwrap())
            .next()
            .unwrap();
        assert_eq!(name.value().attr("value"), Some("Food"));

        let subcategory_ids: Vec<_> = form
            .select(&Selector::parse("input[name=subcategory_ids]").unwrap())
            .filter_map(|input| input.value().attr("value"))
            .collect();
        assert_eq!(subcategory_ids, vec!["s1", "s2"]);
    }

    #[tokio::test]
    async fn unknown_category_is_not_found() {
        let api = MockApi::start(vec![categories_route()]).await;
        let state = CategoryPageState::from_ref(&api.state());

        let response = get_edit_category_page(Path("missing".to_owned()), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
