//! Configuration for the classifiers
//!
//! Every field defaults to the built-in lists and thresholds, so an empty
//! YAML document yields the stock behaviour. Tests and deployments can
//! substitute their own denylists or allergen catalog.

use crate::catalog::AllergenCatalog;
use nutriguard_core::Result;
use serde::{Deserialize, Serialize};

/// Configuration for all classifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Kid-safety rules
    #[serde(default)]
    pub kid_safety: KidSafetyConfig,

    /// Fixed allergen catalog
    #[serde(default)]
    pub allergens: AllergenCatalog,
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| {
            nutriguard_core::Error::config(format!("Invalid classifier config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Reject thresholds that can never be compared meaningfully
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("caffeine_limit", self.kid_safety.caffeine_limit),
            ("sugar_limit", self.kid_safety.sugar_limit),
        ];
        for (name, value) in limits {
            if !value.is_finite() {
                return Err(nutriguard_core::Error::config(format!(
                    "{} must be a finite number",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Denylists and thresholds for the kid-safety classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KidSafetyConfig {
    /// Terms searched in ingredient text and product name, in priority order
    #[serde(default = "default_unsafe_terms")]
    pub unsafe_terms: Vec<String>,

    /// Category slugs searched in category tags, in priority order
    #[serde(default = "default_unsafe_categories")]
    pub unsafe_categories: Vec<String>,

    /// Caffeine above this (mg/100g) is unsafe
    #[serde(default = "default_caffeine_limit")]
    pub caffeine_limit: f64,

    /// Sugars above this (g/100g) is unsafe
    #[serde(default = "default_sugar_limit")]
    pub sugar_limit: f64,
}

impl Default for KidSafetyConfig {
    fn default() -> Self {
        Self {
            unsafe_terms: default_unsafe_terms(),
            unsafe_categories: default_unsafe_categories(),
            caffeine_limit: default_caffeine_limit(),
            sugar_limit: default_sugar_limit(),
        }
    }
}

/// Built-in ingredient and name denylist
pub const UNSAFE_TERMS: &[&str] = &[
    "alcohol",
    "wine",
    "beer",
    "liquor",
    "rum",
    "vodka",
    "whiskey",
    "brandy",
    "gin",
    "tequila",
    "caffeine",
    "energy drink",
];

/// Built-in category denylist
pub const UNSAFE_CATEGORIES: &[&str] = &[
    "alcoholic-beverages",
    "wines",
    "beers",
    "spirits",
    "liquors",
    "energy-drinks",
];

fn default_unsafe_terms() -> Vec<String> {
    UNSAFE_TERMS.iter().map(|s| s.to_string()).collect()
}

fn default_unsafe_categories() -> Vec<String> {
    UNSAFE_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

fn default_caffeine_limit() -> f64 {
    30.0
}

fn default_sugar_limit() -> f64 {
    25.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = ClassifierConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ClassifierConfig::default());
        assert_eq!(config.kid_safety.unsafe_terms.len(), 12);
        assert_eq!(config.kid_safety.caffeine_limit, 30.0);
        assert_eq!(config.allergens.common.len(), 3);
    }

    #[test]
    fn test_partial_override() {
        let yaml = r#"
kid_safety:
  unsafe_terms: ["kombucha"]
  sugar_limit: 15
allergens:
  additional:
    - id: mustard
      name: Mustard
"#;
        let config = ClassifierConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.kid_safety.unsafe_terms, vec!["kombucha"]);
        assert_eq!(config.kid_safety.sugar_limit, 15.0);
        assert_eq!(config.kid_safety.caffeine_limit, 30.0);
        assert_eq!(config.kid_safety.unsafe_categories.len(), 6);
        assert_eq!(config.allergens.additional.len(), 1);
        assert_eq!(config.allergens.common.len(), 3);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = ClassifierConfig::from_yaml("kid_safety: [1, 2").unwrap_err();
        assert!(matches!(err, nutriguard_core::Error::Config(_)));
    }

    #[test]
    fn test_non_finite_limit_rejected() {
        let err = ClassifierConfig::from_yaml("kid_safety:\n  caffeine_limit: .nan\n").unwrap_err();
        assert!(err.to_string().contains("caffeine_limit"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kid_safety:\n  caffeine_limit: 10").unwrap();

        let config = ClassifierConfig::from_file(file.path()).unwrap();
        assert_eq!(config.kid_safety.caffeine_limit, 10.0);
    }
}
