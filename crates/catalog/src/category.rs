//! Product categories and the category filter.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use storefront_core::DomainError;

/// Filter label meaning "no category restriction".
pub const ALL_LABEL: &str = "All";

/// Fixed set of catalog categories.
///
/// Labels are matched exactly (case-sensitive) both in persisted JSON and in
/// filter strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Watches,
    Shoes,
    Bags,
    Clothing,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Watches,
        Category::Shoes,
        Category::Bags,
        Category::Clothing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Watches => "Watches",
            Category::Shoes => "Shoes",
            Category::Bags => "Bags",
            Category::Clothing => "Clothing",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown category: {s:?}")))
    }
}

/// Category restriction applied by catalog reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        CategoryFilter::Only(value)
    }
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_LABEL {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}
