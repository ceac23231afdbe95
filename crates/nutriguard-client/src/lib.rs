//! NutriGuard Client
//!
//! Product sources for the classifiers. The classifiers never fetch
//! anything themselves; callers look a product up here and hand the
//! result (or its absence) to the screener.

pub mod categories;
pub mod openfoodfacts;
pub mod source;

pub use categories::{all_categories, find_category, Category, FEATURED_CATEGORIES, MORE_CATEGORIES};
pub use openfoodfacts::{ClientConfig, OpenFoodFactsClient, DEFAULT_BASE_URL};
pub use source::ProductSource;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::categories::{find_category, Category};
    pub use crate::openfoodfacts::{ClientConfig, OpenFoodFactsClient};
    pub use crate::source::ProductSource;
}
