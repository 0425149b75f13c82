//! Reshaping of the category list returned by the expense service into the
//! shapes the pages need: tree nodes, select options and lookup maps.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::category::{
    Category, CategoryId, CategorySelectItem, Subcategory, SubcategoryId, TreeId,
};

/// Hands out [TreeId]s that increase monotonically and are never reused.
///
/// One generator is shared for the lifetime of the process, so nodes keep
/// distinct IDs across pages and page reloads.
#[derive(Debug)]
pub struct TreeIdGenerator {
    next: AtomicU64,
}

impl TreeIdGenerator {
    /// Create a generator whose first ID is 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Take the next unused ID.
    pub fn next_id(&self) -> TreeId {
        TreeId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TreeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Assign tree IDs to `categories` and sort them by name.
///
/// Each category gets the next ID, followed by its subcategories in order.
/// Every subcategory's parent tree ID is set to its category's tree ID.
/// Categories are then sorted case-insensitively by name.
pub fn reshape_categories(
    mut categories: Vec<Category>,
    tree_ids: &TreeIdGenerator,
) -> Vec<Category> {
    for category in &mut categories {
        let tree_id = tree_ids.next_id();
        category.tree_id = Some(tree_id);

        for subcategory in &mut category.subcategories {
            subcategory.tree_id = Some(tree_ids.next_id());
            subcategory.parent_tree_id = Some(tree_id);
        }
    }

    sort_by_name_case_insensitive(&mut categories, |category| category.name.as_ref());

    categories
}

/// Stable sort of `items` by the string returned by `name`, ignoring case.
pub(crate) fn sort_by_name_case_insensitive<T, F>(items: &mut [T], name: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| name(item).to_lowercase());
}

/// Name/ID pairs for select widgets, in the same order as `categories`.
///
/// Categories that have not been saved yet have no ID and are skipped.
pub fn select_categories(categories: &[Category]) -> Vec<CategorySelectItem> {
    categories
        .iter()
        .filter_map(|category| {
            Some(CategorySelectItem {
                id: category.id.clone()?,
                name: category.name.to_string(),
            })
        })
        .collect()
}

/// Map each saved category's ID to the category.
pub fn category_map(categories: &[Category]) -> HashMap<CategoryId, Category> {
    categories
        .iter()
        .filter_map(|category| Some((category.id.clone()?, category.clone())))
        .collect()
}

/// Everything the expense pages need to know about categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryInfo {
    /// Categories with tree IDs, sorted by name.
    pub categories: Vec<Category>,
    /// Options for category select widgets.
    pub select_categories: Vec<CategorySelectItem>,
    /// Categories keyed by ID.
    pub category_map: HashMap<CategoryId, Category>,
    /// The subcategories of all categories, category by category.
    pub subcategories: Vec<Subcategory>,
    /// Subcategories keyed by ID.
    pub subcategory_map: HashMap<SubcategoryId, Subcategory>,
}

impl CategoryInfo {
    /// Build the lists and maps from reshaped `categories`.
    pub fn new(categories: Vec<Category>) -> Self {
        let select_categories = select_categories(&categories);
        let category_map = category_map(&categories);
        let subcategories: Vec<Subcategory> = categories
            .iter()
            .flat_map(|category| category.subcategories.iter().cloned())
            .collect();
        let subcategory_map = subcategories
            .iter()
            .filter_map(|subcategory| Some((subcategory.id.clone()?, subcategory.clone())))
            .collect();

        Self {
            categories,
            select_categories,
            category_map,
            subcategories,
            subcategory_map,
        }
    }

    /// The name of the category with `id`, or `None` if there is no such category.
    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.category_map
            .get(id)
            .map(|category| category.name.as_ref())
    }

    /// The name of the subcategory with `id`, or `None` if there is no such subcategory.
    pub fn subcategory_name(&self, id: &str) -> Option<&str> {
        self.subcategory_map
            .get(id)
            .map(|subcategory| subcategory.name.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::category::{
        Category, CategoryInfo, CategoryName, Subcategory, TreeId, TreeIdGenerator,
        reshape_categories,
        tree::{category_map, select_categories, sort_by_name_case_insensitive},
    };

    fn category(id: &str, name: &str, subcategories: &[(&str, &str)]) -> Category {
        Category {
            id: Some(id.to_owned()),
            subcategories: subcategories
                .iter()
                .map(|(id, name)| Subcategory {
                    id: Some((*id).to_owned()),
                    ..Subcategory::new(CategoryName::new_unchecked(name))
                })
                .collect(),
            ..Category::new(CategoryName::new_unchecked(name))
        }
    }

    fn test_categories() -> Vec<Category> {
        vec![
            category("c1", "utilities", &[("s1", "Power"), ("s2", "Water")]),
            category("c2", "Food", &[("s3", "Groceries")]),
            category("c3", "bills", &[]),
        ]
    }

    #[test]
    fn subcategories_point_at_their_category() {
        let categories = reshape_categories(test_categories(), &TreeIdGenerator::new());

        for category in &categories {
            for subcategory in &category.subcategories {
                assert_eq!(subcategory.parent_tree_id, category.tree_id);
            }
        }
    }

    #[test]
    fn tree_ids_are_unique_and_sequential() {
        let categories = reshape_categories(test_categories(), &TreeIdGenerator::new());

        let mut ids: Vec<TreeId> = categories
            .iter()
            .flat_map(|category| {
                std::iter::once(category.tree_id)
                    .chain(category.subcategories.iter().map(|sub| sub.tree_id))
            })
            .map(|id| id.expect("every node should have a tree ID"))
            .collect();
        let unique: HashSet<TreeId> = ids.iter().copied().collect();
        ids.sort();

        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids, (1..=6).map(TreeId).collect::<Vec<_>>());
    }

    #[test]
    fn ids_are_assigned_in_service_order() {
        let categories = reshape_categories(test_categories(), &TreeIdGenerator::new());
        let utilities = categories
            .iter()
            .find(|category| category.id.as_deref() == Some("c1"))
            .unwrap();

        assert_eq!(utilities.tree_id, Some(TreeId(1)));
        assert_eq!(utilities.subcategories[1].tree_id, Some(TreeId(3)));
    }

    #[test]
    fn ids_keep_increasing_across_calls() {
        let tree_ids = TreeIdGenerator::new();

        reshape_categories(test_categories(), &tree_ids);
        let second = reshape_categories(test_categories(), &tree_ids);

        let min_id = second
            .iter()
            .filter_map(|category| category.tree_id)
            .min()
            .unwrap();
        assert_eq!(min_id, TreeId(7));
    }

    #[test]
    fn sorts_by_name_ignoring_case() {
        let categories = reshape_categories(test_categories(), &TreeIdGenerator::new());

        let names: Vec<&str> = categories
            .iter()
            .map(|category| category.name.as_ref())
            .collect();
        assert_eq!(names, vec!["bills", "Food", "utilities"]);
    }

    #[test]
    fn sort_is_stable_for_equal_names() {
        let mut items = vec![("b", 1), ("A", 2), ("a", 3), ("B", 4)];

        sort_by_name_case_insensitive(&mut items, |item| item.0);

        assert_eq!(items, vec![("A", 2), ("a", 3), ("b", 1), ("B", 4)]);
    }

    #[test]
    fn handles_empty_list() {
        assert!(reshape_categories(Vec::new(), &TreeIdGenerator::new()).is_empty());
    }

    #[test]
    fn select_and_map_skip_unsaved_categories() {
        let mut categories = test_categories();
        categories.push(Category::new(CategoryName::new_unchecked("Draft")));

        assert_eq!(select_categories(&categories).len(), 3);
        assert_eq!(category_map(&categories).len(), 3);
        assert_eq!(select_categories(&categories)[1].name, "Food");
    }

    #[test]
    fn category_info_indexes_subcategories() {
        let info = CategoryInfo::new(reshape_categories(
            test_categories(),
            &TreeIdGenerator::new(),
        ));

        assert_eq!(info.subcategories.len(), 3);
        assert_eq!(info.category_name("c2"), Some("Food"));
        assert_eq!(info.subcategory_name("s2"), Some("Water"));
        assert_eq!(info.subcategory_name("missing"), None);
    }
}
