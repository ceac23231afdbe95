//! NutriGuard Classifiers
//!
//! Deterministic classifiers over food products fetched from the product
//! database:
//! - Kid safety: an ordered, first-match-wins chain of denylist and
//!   threshold rules that fails closed when data is missing
//! - Allergens: whole-word matching of the user's selected allergens
//!   against the ingredient text
//!
//! Both are pure and synchronous. They hold only immutable configuration
//! and can be shared freely across threads.

pub mod allergen;
pub mod catalog;
pub mod config;
pub mod kid_safety;
pub mod patterns;
pub mod pipeline;

pub use allergen::AllergenMatcher;
pub use catalog::{AllergenCatalog, AllergenPreference, CatalogEntry};
pub use config::{ClassifierConfig, KidSafetyConfig};
pub use kid_safety::{KidSafetyClassifier, SafetyRule};
pub use patterns::TermMatcher;
pub use pipeline::{ProductReport, ProductScreener, ProductSummary};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::allergen::AllergenMatcher;
    pub use crate::catalog::{AllergenCatalog, AllergenPreference, CatalogEntry};
    pub use crate::kid_safety::{KidSafetyClassifier, SafetyRule};
    pub use crate::pipeline::{ProductReport, ProductScreener};
}
