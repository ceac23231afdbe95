//! Built-in browse categories
//!
//! Category ids are Open Food Facts category tags, used as-is in the
//! category search.

use serde::Serialize;

/// A browsable product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

const fn category(id: &'static str, name: &'static str) -> Category {
    Category { id, name }
}

/// Categories shown first
pub const FEATURED_CATEGORIES: &[Category] = &[
    category("fruits", "Fruits"),
    category("vegetables", "Vegetables"),
    category("dairy", "Dairy"),
    category("snacks", "Snacks"),
];

/// Remaining categories
pub const MORE_CATEGORIES: &[Category] = &[
    category("beverages", "Beverages"),
    category("breakfast-cereals", "Breakfast"),
    category("desserts", "Desserts"),
    category("cereals", "Cereals"),
    category("biscuits", "Biscuits"),
    category("chocolate", "Chocolate"),
    category("pasta", "Pasta"),
    category("bread", "Bread"),
];

/// All built-in categories, featured first
pub fn all_categories() -> impl Iterator<Item = &'static Category> {
    FEATURED_CATEGORIES.iter().chain(MORE_CATEGORIES.iter())
}

/// Look up a built-in category by id, case-insensitively
pub fn find_category(id: &str) -> Option<&'static Category> {
    let id = id.trim();
    all_categories().find(|c| c.id.eq_ignore_ascii_case(id))
}
