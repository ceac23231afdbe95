//! Allergen matcher
//!
//! Cross-references the user's selected allergens against a product's
//! ingredient text using whole-word matching.

use crate::catalog::{AllergenCatalog, AllergenPreference};
use nutriguard_core::{AllergenWarning, Product};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Matches selected allergens in ingredient text
#[derive(Debug, Clone)]
pub struct AllergenMatcher {
    catalog: AllergenCatalog,
    /// Pre-built patterns for the fixed catalog, keyed by lowercased name
    compiled: HashMap<String, Regex>,
}

impl AllergenMatcher {
    /// Create a matcher over a fixed catalog
    pub fn new(catalog: AllergenCatalog) -> Self {
        let compiled = catalog
            .fixed()
            .filter_map(|entry| {
                let name = entry.name.to_lowercase();
                word_pattern(&name).map(|re| (name, re))
            })
            .collect();

        Self { catalog, compiled }
    }

    /// The fixed catalog this matcher resolves ids against
    pub fn catalog(&self) -> &AllergenCatalog {
        &self.catalog
    }

    /// Warnings for every selected allergen named in the ingredients, in
    /// selection order. Ids that resolve to no catalog entry are skipped.
    pub fn evaluate(&self, product: &Product, preferences: &AllergenPreference) -> Vec<AllergenWarning> {
        if !preferences.has_selection() {
            return Vec::new();
        }

        let Some(ingredients) = product.ingredients() else {
            return Vec::new();
        };
        let ingredients = ingredients.to_lowercase();

        preferences
            .selected
            .iter()
            .filter_map(|id| {
                let name = self.catalog.resolve(id, &preferences.custom)?.to_lowercase();
                self.contains_word(&ingredients, &name)
                    .then(|| AllergenWarning::new(name, preferences.severity_of(id)))
            })
            .collect()
    }

    fn contains_word(&self, text: &str, name: &str) -> bool {
        if let Some(re) = self.compiled.get(name) {
            return re.is_match(text);
        }
        match word_pattern(name) {
            Some(re) => re.is_match(text),
            None => false,
        }
    }
}

impl Default for AllergenMatcher {
    fn default() -> Self {
        Self::new(AllergenCatalog::default())
    }
}

fn word_pattern(name: &str) -> Option<Regex> {
    if name.is_empty() {
        return None;
    }
    match Regex::new(&format!(r"\b{}\b", regex::escape(name))) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(allergen = name, error = %e, "skipping allergen with unusable pattern");
            None
        }
    }
}
