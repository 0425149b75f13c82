//! Categories and subcategories for classifying expenses.

mod create;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
mod service;
mod tree;

pub use create::{CategoryEndpointState, create_category_endpoint, get_new_category_page};
pub use delete::delete_category_endpoint;
pub use domain::{
    Category, CategoryId, CategoryName, CategorySelectItem, Subcategory, SubcategoryId, TreeId,
};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::{CategoryPageState, get_categories_page};
pub use service::CategoryService;
pub use tree::{CategoryInfo, TreeIdGenerator, reshape_categories};
