//! An expense tracker that runs in the browser.
//!
//! This library serves HTML pages for tracking categorized expenses. It owns
//! no data itself: every page is built from, and every change is sent to, a
//! remote REST expense service through [ApiClient].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod category;
mod dashboard;
mod endpoints;
mod expense;
mod filter;
mod html;
mod import;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use api::ApiClient;
pub use app_state::AppState;
pub use category::{
    Category, CategoryInfo, CategoryName, CategorySelectItem, CategoryService, Subcategory,
    TreeId, TreeIdGenerator, reshape_categories,
};
pub use expense::{
    DateFormat, Expense, ExpenseService, ExpenseTotal, ExpenseTotalRow, ImportAmount,
    ImportDetails, ImportExpense, RawExpenseRow, SubcategoryTotal, TimeSeries, TimeSeriesRow,
    TotalKey, aggregate_totals, build_time_series, normalize_import_rows, parse_expense_csv,
};
pub use filter::ExpenseFilter;
pub use import::{ImportService, ImportSummary};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The expense service answered with an error status.
    ///
    /// `body` is the response body exactly as the service sent it, so that
    /// callers can show or log the service's own explanation.
    #[error("the expense service returned an error response ({status}): {body}")]
    ApiResponse {
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// The request never produced a response, e.g. the service is down.
    #[error("could not reach the expense service: {0}")]
    ApiTransport(String),

    /// The service answered successfully but the body was not the expected JSON.
    #[error("could not decode the expense service response: {0}")]
    InvalidApiResponse(String),

    /// The configured base URL of the expense service is not a valid URL.
    #[error("invalid expense service URL \"{0}\"")]
    InvalidApiUrl(String),

    /// A record that needs a persisted ID to be updated does not have one.
    #[error("the {0} has no ID")]
    MissingId(&'static str),

    /// A required form value was empty.
    #[error("Value is required")]
    ValueRequired,

    /// A date string could not be parsed.
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),

    /// An amount string could not be parsed as a number.
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    /// A date format string used for imports contains an unsupported token
    /// or does not describe a full date.
    #[error("unsupported date format \"{0}\"")]
    InvalidDateFormat(String),

    /// A date in an imported file does not match the configured format.
    #[error("the date \"{value}\" does not match the format \"{format}\"")]
    DateFormatMismatch {
        /// The date string from the file.
        value: String,
        /// The configured date format.
        format: String,
    },

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("File is not a CSV")]
    NotCSV,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::ApiResponse { status: 404, .. } => {
                get_404_not_found_response()
            }
            Error::ApiTransport(_) => InternalServerError {
                description: "Expense Service Unavailable",
                fix: "Could not reach the expense service. Check that it is running and try again.",
            }
            .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for requests made by htmx.
    fn into_alert_response(self) -> Response {
        let (status, alert) = match self {
            Error::ApiResponse { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                Alert::Error {
                    message: "The expense service rejected the request".to_owned(),
                    details: body,
                },
            ),
            Error::ApiTransport(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Expense service unavailable".to_owned(),
                    details: "Could not reach the expense service, try again later.".to_owned(),
                },
            ),
            Error::ValueRequired => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Value is required".to_owned(),
                },
            ),
            error @ (Error::InvalidDate(_)
            | Error::InvalidAmount(_)
            | Error::InvalidDateFormat(_)
            | Error::DateFormatMismatch { .. }
            | Error::InvalidCSV(_)
            | Error::NotCSV
            | Error::MultipartError(_)) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: error.to_string(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                    },
                )
            }
        };

        (status, alert.into_html()).into_response()
    }
}
