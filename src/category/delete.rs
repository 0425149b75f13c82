//! Category deletion endpoint.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    category::{CategoryEndpointState, CategoryId},
};

/// Handle category deletion. Returns success alert or error.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryEndpointState>,
) -> Response {
    match state.category_service.delete_category(&category_id).await {
        Ok(_) => Alert::SuccessSimple {
            message: "Category deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::{Method, StatusCode},
    };
    use serde_json::json;

    use crate::{
        category::{CategoryEndpointState, delete_category_endpoint},
        test_utils::{MockApi, MockRoute, assert_valid_html, parse_html_fragment},
    };

    #[tokio::test]
    async fn can_delete_category() {
        let api = MockApi::start(vec![MockRoute::ok(
            Method::DELETE,
            "/category/c1",
            json!({"deletedCount": 1}),
        )])
        .await;
        let state = CategoryEndpointState::from_ref(&api.state());

        let response = delete_category_endpoint(Path("c1".to_owned()), State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert!(html.html().contains("Category deleted successfully"));
    }

    #[tokio::test]
    async fn missing_category_is_not_found_alert() {
        let api = MockApi::start(vec![]).await;
        let state = CategoryEndpointState::from_ref(&api.state());

        let response = delete_category_endpoint(Path("c1".to_owned()), State(state)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
