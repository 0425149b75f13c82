//! Import batches: uploading CSV files and listing or deleting past imports.

mod delete_endpoint;
mod domain;
mod imports_page;
mod service;
mod upload_endpoint;

pub use delete_endpoint::{
    DeleteImportState, delete_import_endpoint, delete_import_expenses_endpoint,
};
pub use domain::ImportSummary;
pub use imports_page::{ImportsPageState, get_imports_page};
pub use service::ImportService;
pub use upload_endpoint::{ImportEndpointState, import_expenses_endpoint};
