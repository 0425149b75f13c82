//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The expense service's identifier for a category.
pub type CategoryId = String;

/// The expense service's identifier for a subcategory.
pub type SubcategoryId = String;

/// A validated, non-empty category or subcategory name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::ValueRequired] if `name` is empty
    /// or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::ValueRequired)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a node in a category tree widget.
///
/// Tree IDs only exist in this process. They are not persisted and are never
/// part of a request to the expense service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeId(pub(crate) u64);

impl Display for TreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A top-level classification for expenses, e.g. 'Groceries'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// `None` for a category that has not been created yet.
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<CategoryId>,
    #[allow(missing_docs)]
    pub name: CategoryName,
    /// The subcategories in the order the expense service keeps them.
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
    /// The node ID for tree widgets, set by [crate::reshape_categories].
    #[serde(skip)]
    pub tree_id: Option<TreeId>,
}

impl Category {
    /// A category that has not been sent to the expense service yet.
    pub fn new(name: CategoryName) -> Self {
        Self {
            id: None,
            name,
            subcategories: Vec::new(),
            tree_id: None,
        }
    }
}

/// A second-level classification, owned by exactly one [Category].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    /// `None` for a subcategory that has not been created yet, the expense
    /// service assigns one when the owning category is saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubcategoryId>,
    #[allow(missing_docs)]
    pub name: CategoryName,
    /// The node ID for tree widgets.
    #[serde(skip)]
    pub tree_id: Option<TreeId>,
    /// The tree ID of the owning category.
    #[serde(skip)]
    pub parent_tree_id: Option<TreeId>,
}

impl Subcategory {
    /// A subcategory that has not been sent to the expense service yet.
    pub fn new(name: CategoryName) -> Self {
        Self {
            id: None,
            name,
            tree_id: None,
            parent_tree_id: None,
        }
    }
}

/// A name and ID pair for select widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySelectItem {
    /// The option value.
    pub id: CategoryId,
    /// The option label.
    pub name: String,
}

/// Form data for creating and editing categories.
///
/// Subcategories are submitted as parallel lists; an empty ID marks a new
/// subcategory and an empty name removes it.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CategoryFormData {
    pub name: String,
    #[serde(default)]
    pub subcategory_ids: Vec<String>,
    #[serde(default)]
    pub subcategory_names: Vec<String>,
    #[serde(default)]
    pub new_subcategory: String,
}

impl CategoryFormData {
    /// Validate the form and build the category to send to the expense service.
    pub(crate) fn into_category(self, id: Option<CategoryId>) -> Result<Category, Error> {
        let name = CategoryName::new(&self.name)?;

        let mut subcategories: Vec<Subcategory> = self
            .subcategory_ids
            .into_iter()
            .zip(self.subcategory_names)
            .filter_map(|(id, name)| {
                let name = CategoryName::new(&name).ok()?;
                let id = Some(id).filter(|id| !id.trim().is_empty());

                Some(Subcategory { id, ..Subcategory::new(name) })
            })
            .collect();

        if let Ok(name) = CategoryName::new(&self.new_subcategory) {
            subcategories.push(Subcategory::new(name));
        }

        Ok(Category {
            id,
            name,
            subcategories,
            tree_id: None,
        })
    }
}
