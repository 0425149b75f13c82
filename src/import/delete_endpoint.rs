//! Endpoints for deleting an import batch or only the expenses it created.

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, alert::Alert, expense::ExpenseService, import::ImportService};

/// The state needed for deleting imports.
#[derive(Debug, Clone)]
pub struct DeleteImportState {
    pub import_service: ImportService,
    pub expense_service: ExpenseService,
}

impl FromRef<AppState> for DeleteImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            import_service: state.import_service.clone(),
            expense_service: state.expense_service.clone(),
        }
    }
}

/// Delete an import summary. The expense service removes its expenses too.
pub async fn delete_import_endpoint(
    Path(import_id): Path<String>,
    State(state): State<DeleteImportState>,
) -> Response {
    match state.import_service.delete_import(&import_id).await {
        Ok(_) => Alert::SuccessSimple {
            message: "Import deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete import {import_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// Delete the expenses stamped with `import_id` and keep the import summary.
pub async fn delete_import_expenses_endpoint(
    Path(import_id): Path<String>,
    State(state): State<DeleteImportState>,
) -> Response {
    match state
        .expense_service
        .delete_expenses_by_import_id(&import_id)
        .await
    {
        Ok(_) => Alert::SuccessSimple {
            message: "Imported expenses deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete the expenses of import {import_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::{Method, StatusCode},
    };
    use serde_json::json;

    use crate::{
        import::{DeleteImportState, delete_import_endpoint, delete_import_expenses_endpoint},
        test_utils::{MockApi, MockRoute, parse_html_fragment},
    };

    #[tokio::test]
    async fn deletes_import() {
        let api = MockApi::start(vec![MockRoute::ok(
            Method::DELETE,
            "/import/i1",
            json!({"deletedCount": 1}),
        )])
        .await;
        let state = DeleteImportState::from_ref(&api.state());

        let response = delete_import_endpoint(Path("i1".to_owned()), State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("Import deleted successfully"));
    }

    #[tokio::test]
    async fn deletes_only_expenses_of_import() {
        let api = MockApi::start(vec![MockRoute::ok(
            Method::DELETE,
            "/expense/import/batch-7",
            json!({"deletedCount": 12}),
        )])
        .await;
        let state = DeleteImportState::from_ref(&api.state());

        let response =
            delete_import_expenses_endpoint(Path("batch-7".to_owned()), State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let requests = api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/expense/import/batch-7");
    }

    #[tokio::test]
    async fn service_failure_is_alert() {
        let api = MockApi::start(vec![MockRoute::new(
            Method::DELETE,
            "/import/i1",
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(json!({"message": "boom"})),
        )])
        .await;
        let state = DeleteImportState::from_ref(&api.state());

        let response = delete_import_endpoint(Path("i1".to_owned()), State(state)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
