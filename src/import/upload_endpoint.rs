//! The endpoint that imports expenses from an uploaded CSV file.

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    alert::Alert,
    expense::{
        ExpenseService, ImportDetails, new_import_id, normalize_import_rows, parse_expense_csv,
    },
};

/// The state needed for importing expenses.
#[derive(Debug, Clone)]
pub struct ImportEndpointState {
    pub expense_service: ExpenseService,
}

impl FromRef<AppState> for ImportEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_service: state.expense_service.clone(),
        }
    }
}

/// A CSV file received in a multipart form.
struct CsvUpload {
    file_name: String,
    text: String,
}

/// The fields of the upload form.
#[derive(Default)]
struct UploadForm {
    file: Option<CsvUpload>,
    date_format: String,
    category_id: String,
    subcategory_id: String,
}

/// Route handler for importing expenses from a CSV file.
///
/// The rows are normalized with the submitted date format and default
/// category, stamped with a new import ID and sent to the expense service as
/// one batch.
pub async fn import_expenses_endpoint(
    State(state): State<ImportEndpointState>,
    multipart: Multipart,
) -> Response {
    match import_expenses(&state.expense_service, multipart).await {
        Ok((expense_count, file_name)) => (
            StatusCode::CREATED,
            Alert::Success {
                message: "Import successful".to_owned(),
                details: format!("Sent {expense_count} expense(s) from '{file_name}'."),
            }
            .into_html(),
        )
            .into_response(),
        Err(Error::NotCSV) => (
            StatusCode::BAD_REQUEST,
            Alert::ErrorSimple {
                message: "File type must be CSV.".to_owned(),
            }
            .into_html(),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Failed to import expenses: {error}");
            error.into_alert_response()
        }
    }
}

async fn import_expenses(
    expense_service: &ExpenseService,
    multipart: Multipart,
) -> Result<(usize, String), Error> {
    let form = read_upload_form(multipart).await?;

    let upload = form
        .file
        .ok_or_else(|| Error::MultipartError("no CSV file was uploaded".to_owned()))?;
    let date_format = non_empty(form.date_format).ok_or(Error::ValueRequired)?;

    let details = ImportDetails {
        date_format,
        file_name: Some(upload.file_name.clone()),
        category_id: non_empty(form.category_id),
        subcategory_id: non_empty(form.subcategory_id),
    };

    let rows = parse_expense_csv(&upload.text)?;
    let import_id = new_import_id();
    let expenses = normalize_import_rows(rows, &details, &import_id)?;

    tracing::info!(
        "Importing {} expenses from '{}' with import ID {import_id}",
        expenses.len(),
        upload.file_name
    );

    expense_service.import_expenses(&expenses, &details).await?;

    Ok((expenses.len(), upload.file_name))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Error> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|error| {
        tracing::error!("Could not read multipart form: {error}");
        Error::MultipartError(error.body_text())
    })? {
        match field.name() {
            Some("file") => form.file = Some(parse_csv_field(field).await?),
            Some("date_format") => form.date_format = parse_text_field(field).await?,
            Some("category_id") => form.category_id = parse_text_field(field).await?,
            Some("subcategory_id") => form.subcategory_id = parse_text_field(field).await?,
            name => tracing::debug!("Ignoring unexpected multipart field {name:?}"),
        }
    }

    Ok(form)
}

async fn parse_csv_field(field: Field<'_>) -> Result<CsvUpload, Error> {
    if field.content_type() != Some("text/csv") {
        return Err(Error::NotCSV);
    }

    let file_name = match field.file_name() {
        Some(file_name) => file_name.to_owned(),
        None => {
            tracing::error!("Could not get file name from multipart form field: {field:#?}");
            return Err(Error::MultipartError(
                "Could not get file name from multipart form field".to_owned(),
            ));
        }
    };

    let text = parse_text_field(field).await?;

    tracing::debug!("Received file '{}' that is {} bytes", file_name, text.len());

    Ok(CsvUpload { file_name, text })
}

async fn parse_text_field(field: Field<'_>) -> Result<String, Error> {
    field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_owned())
}
