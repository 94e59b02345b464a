//! Activity categories and their keyword tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of categories a user can filter activities by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Tours,
    Museums,
    Restaurants,
    Wine,
    Historical,
    Sightseeing,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 6] = [
        Category::Tours,
        Category::Museums,
        Category::Restaurants,
        Category::Wine,
        Category::Historical,
        Category::Sightseeing,
    ];

    /// Lowercase keywords matched against an activity's name and description
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Tours => &["tour"],
            Category::Museums => &["museum"],
            Category::Restaurants => &["restaurant", "food"],
            Category::Wine => &["wine"],
            Category::Historical => &["castle", "palace", "cathedral", "ruins"],
            Category::Sightseeing => &["sightseeing", "view", "panorama"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Tours => "Tours",
            Category::Museums => "Museums",
            Category::Restaurants => "Restaurants",
            Category::Wine => "Wine",
            Category::Historical => "Historical",
            Category::Sightseeing => "Sightseeing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of selected categories.
///
/// Insertion order is kept and duplicates are dropped, so the selection
/// renders in the order the user (or a preset) picked it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategorySelection(Vec<Category>);

impl CategorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category; returns false if it was already selected
    pub fn insert(&mut self, category: Category) -> bool {
        if self.0.contains(&category) {
            return false;
        }
        self.0.push(category);
        true
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.0
    }
}

impl FromIterator<Category> for CategorySelection {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut selection = CategorySelection::new();
        for category in iter {
            selection.insert(category);
        }
        selection
    }
}

impl From<Vec<Category>> for CategorySelection {
    fn from(categories: Vec<Category>) -> Self {
        categories.into_iter().collect()
    }
}

impl From<CategorySelection> for Vec<Category> {
    fn from(selection: CategorySelection) -> Self {
        selection.0
    }
}

impl<const N: usize> From<[Category; N]> for CategorySelection {
    fn from(categories: [Category; N]) -> Self {
        categories.into_iter().collect()
    }
}

/// Category with its keyword list, as exposed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Every category with its keywords, in display order
pub fn category_catalog() -> Vec<CategoryInfo> {
    Category::ALL
        .iter()
        .map(|c| CategoryInfo {
            category: *c,
            keywords: c.keywords().iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_keeps_order_and_drops_duplicates() {
        let selection: CategorySelection = vec![
            Category::Wine,
            Category::Tours,
            Category::Wine,
            Category::Historical,
        ]
        .into();

        assert_eq!(
            selection.as_slice(),
            &[Category::Wine, Category::Tours, Category::Historical]
        );
    }

    #[test]
    fn test_selection_serde_as_list() {
        let selection = CategorySelection::from([Category::Museums, Category::Sightseeing]);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"["Museums","Sightseeing"]"#);

        let parsed: CategorySelection = serde_json::from_str(r#"["Tours","Tours"]"#).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for category in Category::ALL {
            for kw in category.keywords() {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }
}
