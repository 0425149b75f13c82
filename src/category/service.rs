//! Calls to the `/category/` resource of the expense service.

use serde_json::Value;

use crate::{
    ApiClient, Error,
    api::record_path,
    category::{
        Category, CategoryInfo, CategorySelectItem, TreeIdGenerator, reshape_categories,
        tree::select_categories,
    },
};

const CATEGORY_PATH: &str = "/category/";

/// Reads and writes categories through the expense service.
#[derive(Debug, Clone)]
pub struct CategoryService {
    api: ApiClient,
}

impl CategoryService {
    /// Create a category service that sends requests with `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Get all categories with tree IDs from `tree_ids`, sorted by name.
    pub async fn get_categories(&self, tree_ids: &TreeIdGenerator) -> Result<Vec<Category>, Error> {
        let categories: Option<Vec<Category>> = self
            .api
            .get("CategoryService.get_categories", CATEGORY_PATH, &Vec::new())
            .await?;

        Ok(reshape_categories(categories.unwrap_or_default(), tree_ids))
    }

    /// Get the categories along with the select options and lookup maps
    /// derived from them.
    pub async fn get_category_info(&self, tree_ids: &TreeIdGenerator) -> Result<CategoryInfo, Error> {
        self.get_categories(tree_ids).await.map(CategoryInfo::new)
    }

    /// Get the options for a category select widget.
    pub async fn get_category_select(
        &self,
        tree_ids: &TreeIdGenerator,
    ) -> Result<Vec<CategorySelectItem>, Error> {
        self.get_categories(tree_ids)
            .await
            .map(|categories| select_categories(&categories))
    }

    /// Create `category` and return the service's response.
    pub async fn create_category(&self, category: &Category) -> Result<Value, Error> {
        self.api
            .post("CategoryService.create_category", CATEGORY_PATH, category)
            .await
    }

    /// Update `category` and return the service's response.
    ///
    /// Tree IDs are never part of the payload.
    ///
    /// # Errors
    /// Returns [Error::MissingId] if `category` has not been created yet.
    pub async fn update_category(&self, category: &Category) -> Result<Value, Error> {
        let id = category.id.as_deref().ok_or(Error::MissingId("category"))?;

        self.api
            .put(
                "CategoryService.update_category",
                &record_path(CATEGORY_PATH, id),
                category,
            )
            .await
    }

    /// Delete the category with `category_id`. The service deletes its subcategories.
    pub async fn delete_category(&self, category_id: &str) -> Result<Value, Error> {
        self.api
            .delete(
                "CategoryService.delete_category",
                &record_path(CATEGORY_PATH, category_id),
            )
            .await
    }
}
