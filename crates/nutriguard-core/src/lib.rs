//! NutriGuard Core
//!
//! Core types and utilities shared across NutriGuard components.
//!
//! This crate provides:
//! - The product model as delivered by the Open Food Facts database
//! - Classifier outputs: safety verdicts and allergen warnings
//! - Error types and result handling for the collaborators
//! - Nutrition display helpers (grade, rating, facts panel)

pub mod error;
pub mod nutrition;
pub mod types;

pub use error::{Error, Result};
pub use nutrition::{health_bar_fraction, nutrition_rating, NutritionFacts, NutritionGrade};
pub use types::{AllergenWarning, Nutriments, Product, SafetyVerdict, Severity};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::nutrition::{NutritionFacts, NutritionGrade};
    pub use crate::types::{AllergenWarning, Nutriments, Product, SafetyVerdict, Severity};
}
