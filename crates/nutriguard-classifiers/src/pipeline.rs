//! Product screening pipeline
//!
//! Runs both classifiers over a product and gathers everything the
//! presentation layer shows about it into a single report. The two
//! classifiers are independent; neither sees the other's output.

use crate::allergen::AllergenMatcher;
use crate::catalog::AllergenPreference;
use crate::config::ClassifierConfig;
use crate::kid_safety::KidSafetyClassifier;
use nutriguard_core::{
    health_bar_fraction, nutrition_rating, AllergenWarning, NutritionFacts, NutritionGrade,
    Nutriments, Product, Result, SafetyVerdict,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Both classifiers, ready to screen products
#[derive(Debug, Clone, Default)]
pub struct ProductScreener {
    kid_safety: KidSafetyClassifier,
    allergens: AllergenMatcher,
}

/// Display facts about a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub code: String,
    pub name: String,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<NutritionGrade>,
    /// 1-5 stars derived from the grade
    pub rating: u8,
    /// Health bar fill, 0.0-1.0, driven by energy per 100g
    pub health: f64,
    pub nutrition: NutritionFacts,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        let grade = product.grade();
        Self {
            code: product.code.clone(),
            name: product.display_name().to_string(),
            brand: product.display_brand().to_string(),
            image: product.display_image().map(str::to_string),
            grade,
            rating: nutrition_rating(grade),
            health: health_bar_fraction(product.nutrient(Nutriments::ENERGY_KCAL_100G).unwrap_or(0.0)),
            nutrition: product
                .nutriments
                .as_ref()
                .map(NutritionFacts::from)
                .unwrap_or_default(),
        }
    }
}

/// Everything known about one screened product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    /// Absent when screening a product that failed to load
    pub product: Option<ProductSummary>,
    pub kid_safety: SafetyVerdict,
    pub allergen_warnings: Vec<AllergenWarning>,
}

impl ProductReport {
    /// Whether any selected allergen was found
    pub fn has_allergens(&self) -> bool {
        !self.allergen_warnings.is_empty()
    }
}

impl ProductScreener {
    /// Create a screener from existing classifiers
    pub fn new(kid_safety: KidSafetyClassifier, allergens: AllergenMatcher) -> Self {
        Self {
            kid_safety,
            allergens,
        }
    }

    /// Build both classifiers from configuration
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        Ok(Self::new(
            KidSafetyClassifier::new(&config.kid_safety)?,
            AllergenMatcher::new(config.allergens.clone()),
        ))
    }

    pub fn kid_safety(&self) -> &KidSafetyClassifier {
        &self.kid_safety
    }

    pub fn allergens(&self) -> &AllergenMatcher {
        &self.allergens
    }

    /// Screen a single product, or the absence of one
    pub fn screen(&self, product: Option<&Product>, preferences: &AllergenPreference) -> ProductReport {
        let kid_safety = self.kid_safety.evaluate(product);
        let allergen_warnings = product
            .map(|p| self.allergens.evaluate(p, preferences))
            .unwrap_or_default();

        debug!(
            code = product.map(|p| p.code.as_str()),
            is_safe = kid_safety.is_safe,
            warnings = allergen_warnings.len(),
            "screened product"
        );

        ProductReport {
            product: product.map(ProductSummary::from),
            kid_safety,
            allergen_warnings,
        }
    }

    /// Screen a list of products, e.g. search results
    pub fn screen_all(&self, products: &[Product], preferences: &AllergenPreference) -> Vec<ProductReport> {
        products
            .iter()
            .map(|product| self.screen(Some(product), preferences))
            .collect()
    }
}
