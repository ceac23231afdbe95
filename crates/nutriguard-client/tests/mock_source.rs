//! Mock product source for testing
//!
//! Exercises the lookup-then-screen flow without touching the network.

use async_trait::async_trait;
use nutriguard_classifiers::{AllergenPreference, ProductScreener};
use nutriguard_client::ProductSource;
use nutriguard_core::{Product, Result, Severity};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// In-memory product source
struct MockSource {
    products: HashMap<String, Product>,
    call_count: AtomicU32,
}

impl MockSource {
    fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.code.clone(), p)).collect(),
            call_count: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ProductSource for MockSource {
    async fn fetch_by_code(&self, code: &str) -> Result<Option<Product>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.products.get(code).cloned())
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Product>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let query = query.to_lowercase();
        let mut found: Vec<Product> = self
            .products
            .values()
            .filter(|p| p.display_name().to_lowercase().contains(&query))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(found)
    }

    async fn browse_category(&self, category: &str) -> Result<Vec<Product>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let tag = format!("en:{}", category);
        let mut found: Vec<Product> = self
            .products
            .values()
            .filter(|p| p.categories_tags.as_ref().is_some_and(|tags| tags.contains(&tag)))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(found)
    }

    async fn trending(&self) -> Result<Vec<Product>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let mut found: Vec<Product> = self.products.values().cloned().collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(found)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn catalog() -> Vec<Product> {
    vec![
        Product::new("1")
            .with_name("Peanut Cookies")
            .with_ingredients("wheat flour, peanut butter, sugar"),
        Product::new("2")
            .with_name("Peanut Stout")
            .with_ingredients("water, barley, peanut extract")
            .with_categories(["en:beers"]),
        Product::new("3").with_name("Still Water").with_ingredients("water"),
    ]
}

#[tokio::test]
async fn test_fetch_and_screen() {
    let source = MockSource::new(catalog());
    let screener = ProductScreener::default();
    let prefs = AllergenPreference::empty()
        .select("peanut")
        .with_severity("peanut", Severity::High);

    let product = source.fetch_by_code("1").await.unwrap();
    let report = screener.screen(product.as_ref(), &prefs);

    assert!(report.kid_safety.is_safe);
    assert_eq!(report.allergen_warnings.len(), 1);
    assert_eq!(report.allergen_warnings[0].severity, Severity::High);
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn test_not_found_fails_closed() {
    let source = MockSource::new(catalog());
    let product = source.fetch_by_code("999").await.unwrap();
    assert!(product.is_none());

    let report = ProductScreener::default().screen(product.as_ref(), &AllergenPreference::empty());
    assert!(!report.kid_safety.is_safe);
    assert_eq!(
        report.kid_safety.reason.as_deref(),
        Some("Insufficient product information")
    );
}

#[tokio::test]
async fn test_search_and_screen_each_result() {
    let source = MockSource::new(catalog());
    let products = source.search_by_name("peanut").await.unwrap();
    let reports = ProductScreener::default().screen_all(&products, &AllergenPreference::empty());

    assert_eq!(reports.len(), 2);
    assert!(reports[0].kid_safety.is_safe);
    assert_eq!(
        reports[1].kid_safety.reason.as_deref(),
        Some("Product is categorized as beers")
    );
}

#[tokio::test]
async fn test_browse_and_screen_category() {
    let source = MockSource::new(catalog());
    let prefs = AllergenPreference::empty().select("peanut");
    let products = source.browse_category("beers").await.unwrap();
    let reports = ProductScreener::default().screen_all(&products, &prefs);

    assert_eq!(reports.len(), 1);
    assert!(!reports[0].kid_safety.is_safe);
    assert_eq!(reports[0].allergen_warnings[0].allergen_name, "peanut");

    let trending = source.trending().await.unwrap();
    assert_eq!(trending.len(), 3);
    assert_eq!(source.call_count(), 2);
}
