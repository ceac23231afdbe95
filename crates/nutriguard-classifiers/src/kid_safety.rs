//! Kid-safety classifier
//!
//! Evaluates a product against an ordered chain of rules. The first rule
//! that fires decides the verdict and its reason; later rules are not
//! consulted. Missing data skips a rule rather than failing, and a product
//! with neither ingredients nor categories is reported unsafe.

use crate::config::KidSafetyConfig;
use crate::patterns::TermMatcher;
use nutriguard_core::{Nutriments, Product, Result, SafetyVerdict};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Reason given when there is no product at all
pub const NO_PRODUCT_REASON: &str = "Insufficient product information";

/// Reason given when neither ingredients nor categories are known
pub const NO_INGREDIENTS_REASON: &str = "Insufficient ingredient information";

type RuleCheck = dyn Fn(&Product) -> Option<String> + Send + Sync;

/// A named check returning the unsafe reason when it fires
#[derive(Clone)]
pub struct SafetyRule {
    name: String,
    check: Arc<RuleCheck>,
}

impl SafetyRule {
    /// Create a rule from a check closure
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Product) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Create a rule from a predicate and a fixed reason
    pub fn when<P>(name: impl Into<String>, predicate: P, reason: impl Into<String>) -> Self
    where
        P: Fn(&Product) -> bool + Send + Sync + 'static,
    {
        let reason = reason.into();
        Self::new(name, move |product| predicate(product).then(|| reason.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the check
    pub fn check(&self, product: &Product) -> Option<String> {
        (self.check)(product)
    }
}

impl fmt::Debug for SafetyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafetyRule").field("name", &self.name).finish()
    }
}

/// First-match-wins rule chain deciding whether a product suits children
#[derive(Debug, Clone)]
pub struct KidSafetyClassifier {
    rules: Vec<SafetyRule>,
}

impl KidSafetyClassifier {
    /// Build the standard rule chain from configuration
    pub fn new(config: &KidSafetyConfig) -> Result<Self> {
        let terms = Arc::new(TermMatcher::new(&config.unsafe_terms)?);
        let categories = TermMatcher::new(&config.unsafe_categories)?;
        let caffeine_limit = config.caffeine_limit;
        let sugar_limit = config.sugar_limit;

        let ingredient_terms = Arc::clone(&terms);
        let name_terms = terms;

        let rules = vec![
            SafetyRule::new("unsafe_ingredient", move |product| {
                let text = product.ingredients()?.to_lowercase();
                ingredient_terms
                    .first_listed(&text)
                    .map(|term| format!("Contains {}", term))
            }),
            SafetyRule::new("unsafe_name", move |product| {
                let name = product.name()?.to_lowercase();
                name_terms
                    .first_listed(&name)
                    .map(|term| format!("Product name indicates it may contain {}", term))
            }),
            SafetyRule::new("unsafe_category", move |product| {
                product
                    .categories_tags
                    .as_deref()?
                    .iter()
                    .find_map(|tag| categories.first_listed(&tag.to_lowercase()))
                    .map(|slug| format!("Product is categorized as {}", slug.replacen('-', " ", 1)))
            }),
            SafetyRule::when(
                "high_caffeine",
                move |product| exceeds(product.nutrient(Nutriments::CAFFEINE), caffeine_limit),
                "Contains high levels of caffeine",
            ),
            SafetyRule::when(
                "high_sugar",
                move |product| exceeds(product.nutrient(Nutriments::SUGARS), sugar_limit),
                "Contains very high levels of sugar",
            ),
            SafetyRule::new("alcohol_by_volume", |product| {
                product
                    .alcohol_by_volume
                    .filter(|abv| *abv > 0.0)
                    .map(|abv| format!("Contains {}% alcohol", abv))
            }),
            SafetyRule::when(
                "missing_ingredients",
                |product| product.ingredients().is_none() && product.categories_tags.is_none(),
                NO_INGREDIENTS_REASON,
            ),
        ];

        Ok(Self { rules })
    }

    /// Classifier with no rules; every present product is safe
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule to the end of the chain
    pub fn with_rule(mut self, rule: SafetyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[SafetyRule] {
        &self.rules
    }

    /// Evaluate a product; an absent product is never safe
    pub fn evaluate(&self, product: Option<&Product>) -> SafetyVerdict {
        let Some(product) = product else {
            return SafetyVerdict::unsafe_because(NO_PRODUCT_REASON);
        };

        let fired = self
            .rules
            .iter()
            .find_map(|rule| rule.check(product).map(|reason| (rule.name(), reason)));

        match fired {
            Some((rule, reason)) => {
                trace!(code = %product.code, rule, %reason, "kid-safety rule fired");
                SafetyVerdict::unsafe_because(reason)
            }
            None => SafetyVerdict::safe(),
        }
    }
}

impl Default for KidSafetyClassifier {
    fn default() -> Self {
        Self::new(&KidSafetyConfig::default()).expect("built-in kid-safety denylists are valid")
    }
}

fn exceeds(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v > limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> KidSafetyClassifier {
        KidSafetyClassifier::default()
    }

    fn reason(product: &Product) -> Option<String> {
        classifier().evaluate(Some(product)).reason
    }

    #[test]
    fn test_absent_product() {
        let verdict = classifier().evaluate(None);
        assert!(!verdict.is_safe);
        assert_eq!(verdict.reason.as_deref(), Some(NO_PRODUCT_REASON));
    }

    #[test]
    fn test_alcohol_in_ingredients() {
        let product = Product::new("1").with_ingredients("Water, sugar, ALCOHOL 2%");
        assert_eq!(reason(&product).as_deref(), Some("Contains alcohol"));
    }

    #[test]
    fn test_denylist_order_wins() {
        let product = Product::new("1").with_ingredients("vodka, wine");
        assert_eq!(reason(&product).as_deref(), Some("Contains wine"));
    }

    #[test]
    fn test_substring_matching_is_literal() {
        let product = Product::new("1").with_ingredients("ginger, honey");
        assert_eq!(reason(&product).as_deref(), Some("Contains gin"));
    }

    #[test]
    fn test_ingredients_checked_before_name() {
        let product = Product::new("1")
            .with_name("Beer Bread")
            .with_ingredients("flour, caffeine");
        assert_eq!(reason(&product).as_deref(), Some("Contains caffeine"));
    }

    #[test]
    fn test_name_checked_even_with_ingredients() {
        let product = Product::new("1")
            .with_name("Rum Cake")
            .with_ingredients("flour, eggs, sugar");
        assert_eq!(
            reason(&product).as_deref(),
            Some("Product name indicates it may contain rum")
        );
    }

    #[test]
    fn test_energy_drink_name_without_ingredients() {
        let product = Product::new("1").with_name("Energy Drink Max");
        assert_eq!(
            reason(&product).as_deref(),
            Some("Product name indicates it may contain energy drink")
        );
    }

    #[test]
    fn test_category_reason_formatting() {
        let product = Product::new("1").with_categories(["en:beverages", "en:Alcoholic-Beverages"]);
        assert_eq!(
            reason(&product).as_deref(),
            Some("Product is categorized as alcoholic beverages")
        );

        let product = Product::new("2").with_categories(["en:energy-drinks"]);
        assert_eq!(
            reason(&product).as_deref(),
            Some("Product is categorized as energy drinks")
        );
    }

    #[test]
    fn test_category_tag_order_before_slug_order() {
        let product = Product::new("1").with_categories(["en:spirits", "en:wines"]);
        assert_eq!(
            reason(&product).as_deref(),
            Some("Product is categorized as spirits")
        );
    }

    #[test]
    fn test_caffeine_threshold_is_strict() {
        let at_limit = Product::new("1")
            .with_ingredients("water")
            .with_nutriments(Nutriments::new().with("caffeine", 30.0));
        assert!(classifier().evaluate(Some(&at_limit)).is_safe);

        let over = Product::new("1")
            .with_ingredients("water")
            .with_nutriments(Nutriments::new().with("caffeine", 31.0));
        assert_eq!(reason(&over).as_deref(), Some("Contains high levels of caffeine"));
    }

    #[test]
    fn test_sugar_threshold_is_strict() {
        let at_limit = Product::new("1")
            .with_ingredients("water")
            .with_nutriments(Nutriments::new().with("sugars", 25.0));
        assert!(classifier().evaluate(Some(&at_limit)).is_safe);

        let over = Product::new("1")
            .with_ingredients("water")
            .with_nutriments(Nutriments::new().with("sugars", 25.1));
        assert_eq!(reason(&over).as_deref(), Some("Contains very high levels of sugar"));
    }

    #[test]
    fn test_caffeine_before_sugar() {
        let product = Product::new("1").with_ingredients("water").with_nutriments(
            Nutriments::new().with("caffeine", 40.0).with("sugars", 40.0),
        );
        assert_eq!(reason(&product).as_deref(), Some("Contains high levels of caffeine"));
    }

    #[test]
    fn test_alcohol_by_volume() {
        let product = Product::new("1").with_ingredients("grapes").with_alcohol(5.0);
        // "grapes" is clean, so the ABV rule decides
        assert_eq!(reason(&product).as_deref(), Some("Contains 5% alcohol"));

        let product = Product::new("1").with_categories(Vec::<String>::new()).with_alcohol(4.5);
        assert_eq!(reason(&product).as_deref(), Some("Contains 4.5% alcohol"));

        let product = Product::new("1").with_ingredients("water").with_alcohol(0.0);
        assert!(classifier().evaluate(Some(&product)).is_safe);
    }

    #[test]
    fn test_insufficient_ingredient_information() {
        let verdict = classifier().evaluate(Some(&Product::new("1")));
        assert!(!verdict.is_safe);
        assert_eq!(verdict.reason.as_deref(), Some(NO_INGREDIENTS_REASON));

        let empty_text = Product::new("1").with_ingredients("");
        assert_eq!(reason(&empty_text).as_deref(), Some(NO_INGREDIENTS_REASON));
    }

    #[test]
    fn test_empty_category_list_counts_as_present() {
        let product = Product::new("1").with_categories(Vec::<String>::new());
        assert!(classifier().evaluate(Some(&product)).is_safe);
    }

    #[test]
    fn test_safe_product() {
        let product = Product::new("1")
            .with_name("Oat Cookies")
            .with_ingredients("oats, butter, sugar")
            .with_categories(["en:snacks", "en:biscuits"]);
        let verdict = classifier().evaluate(Some(&product));
        assert!(verdict.is_safe);
        assert_eq!(verdict.reason, None);
    }

    #[test]
    fn test_appended_rule_runs_last() {
        let classifier = classifier().with_rule(SafetyRule::when(
            "no_brand",
            |p: &Product| p.brands.is_none(),
            "Unknown manufacturer",
        ));
        assert_eq!(classifier.rules().len(), 8);

        let product = Product::new("1").with_ingredients("water");
        assert_eq!(
            classifier.evaluate(Some(&product)).reason.as_deref(),
            Some("Unknown manufacturer")
        );

        let product = Product::new("1").with_ingredients("wine");
        assert_eq!(
            classifier.evaluate(Some(&product)).reason.as_deref(),
            Some("Contains wine")
        );
    }

    #[test]
    fn test_custom_config() {
        let config = KidSafetyConfig {
            unsafe_terms: vec!["kombucha".to_string()],
            caffeine_limit: 5.0,
            ..KidSafetyConfig::default()
        };
        let classifier = KidSafetyClassifier::new(&config).unwrap();

        let product = Product::new("1").with_ingredients("wine");
        assert!(classifier.evaluate(Some(&product)).is_safe);

        let product = Product::new("1").with_ingredients("Kombucha tea");
        assert_eq!(
            classifier.evaluate(Some(&product)).reason.as_deref(),
            Some("Contains kombucha")
        );
    }

    #[test]
    fn test_empty_classifier() {
        let classifier = KidSafetyClassifier::empty();
        assert!(classifier.evaluate(Some(&Product::new("1"))).is_safe);
        assert!(!classifier.evaluate(None).is_safe);
    }
}
