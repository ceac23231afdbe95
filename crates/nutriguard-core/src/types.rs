//! Core types for NutriGuard

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A packaged food product as returned by the product database
///
/// Every optional field stays `None` when the payload omits it; fallbacks
/// are applied by the consumers, never here. Unknown top-level fields are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Barcode, the product's identity
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,

    /// Product display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Brand names, possibly several joined by commas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<String>,

    /// Free-text ingredient list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients_text: Option<String>,

    /// Nutrient values per 100g
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutriments: Option<Nutriments>,

    /// Nutri-Score letter (`a`..`e`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_grades: Option<String>,

    /// Category slugs, e.g. `en:alcoholic-beverages`
    #[serde(
        default,
        deserialize_with = "optional_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub categories_tags: Option<Vec<String>>,

    /// Alcohol percentage by volume
    #[serde(
        default,
        deserialize_with = "optional_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub alcohol_by_volume: Option<f64>,

    /// Main product image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Front-of-pack image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_front_url: Option<String>,
}

impl Product {
    /// Create a product with only its barcode set
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            product_name: None,
            brands: None,
            ingredients_text: None,
            nutriments: None,
            nutrition_grades: None,
            categories_tags: None,
            alcohol_by_volume: None,
            image_url: None,
            image_front_url: None,
        }
    }

    /// Set the product name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Set the brands
    pub fn with_brands(mut self, brands: impl Into<String>) -> Self {
        self.brands = Some(brands.into());
        self
    }

    /// Set the ingredient text
    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients_text = Some(ingredients.into());
        self
    }

    /// Set the nutriments
    pub fn with_nutriments(mut self, nutriments: Nutriments) -> Self {
        self.nutriments = Some(nutriments);
        self
    }

    /// Set the Nutri-Score letter
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.nutrition_grades = Some(grade.into());
        self
    }

    /// Set the category tags
    pub fn with_categories<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the alcohol percentage
    pub fn with_alcohol(mut self, abv: f64) -> Self {
        self.alcohol_by_volume = Some(abv);
        self
    }

    /// Parse a single product from a JSON string
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Ingredient text, treating an empty string as absent
    pub fn ingredients(&self) -> Option<&str> {
        non_empty(self.ingredients_text.as_deref())
    }

    /// Product name, treating an empty string as absent
    pub fn name(&self) -> Option<&str> {
        non_empty(self.product_name.as_deref())
    }

    /// Look up a numeric nutrient value
    pub fn nutrient(&self, key: &str) -> Option<f64> {
        self.nutriments.as_ref().and_then(|n| n.get(key))
    }

    /// Name to show to the user
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("Unknown Product")
    }

    /// Brand to show to the user
    pub fn display_brand(&self) -> &str {
        non_empty(self.brands.as_deref()).unwrap_or("Unknown")
    }

    /// Image to show to the user, preferring the main image
    pub fn display_image(&self) -> Option<&str> {
        non_empty(self.image_url.as_deref()).or_else(|| non_empty(self.image_front_url.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Sparse nutrient table keyed by the database's nutrient names
///
/// The database mixes numbers, numeric strings and unit strings in this
/// object. Numbers and numeric strings are kept; anything else is dropped
/// without failing the surrounding product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Nutriments(BTreeMap<String, f64>);

impl Nutriments {
    /// Caffeine, mg per 100g
    pub const CAFFEINE: &'static str = "caffeine";
    /// Sugars, g per 100g
    pub const SUGARS: &'static str = "sugars";
    /// Energy, kcal per 100g
    pub const ENERGY_KCAL_100G: &'static str = "energy-kcal_100g";
    /// Fat, g per 100g
    pub const FAT_100G: &'static str = "fat_100g";
    /// Carbohydrates, g per 100g
    pub const CARBOHYDRATES_100G: &'static str = "carbohydrates_100g";
    /// Proteins, g per 100g
    pub const PROTEINS_100G: &'static str = "proteins_100g";
    /// Salt, g per 100g
    pub const SALT_100G: &'static str = "salt_100g";
    /// Sugars, g per 100g (display field)
    pub const SUGARS_100G: &'static str = "sugars_100g";

    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Look up a nutrient value
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Number of numeric entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no numeric entries were kept
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Nutriments {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for Nutriments {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .filter_map(|(key, value)| lenient_f64(&value).map(|v| (key, v)))
                .collect(),
        ))
    }
}

fn lenient_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn optional_lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_f64))
}

/// A list of strings, or `None` when the value is not an array.
/// Non-string elements are dropped.
fn optional_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected barcode string, found {}",
            other
        ))),
    }
}

/// User-assigned importance of an allergen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Lowercase name as stored and displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown severity '{}', expected low, medium or high", other)),
        }
    }
}

/// Outcome of the kid-safety check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    /// Whether the product is considered safe for children
    pub is_safe: bool,

    /// Human-readable trigger, present only when unsafe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SafetyVerdict {
    /// A safe verdict
    pub fn safe() -> Self {
        Self {
            is_safe: true,
            reason: None,
        }
    }

    /// An unsafe verdict with the given reason
    pub fn unsafe_because(reason: impl Into<String>) -> Self {
        Self {
            is_safe: false,
            reason: Some(reason.into()),
        }
    }
}

/// A selected allergen found in a product's ingredients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenWarning {
    /// Lowercased allergen name as matched
    pub allergen_name: String,

    /// Severity the user assigned to this allergen
    pub severity: Severity,
}

impl AllergenWarning {
    /// Create a new warning
    pub fn new(allergen_name: impl Into<String>, severity: Severity) -> Self {
        Self {
            allergen_name: allergen_name.into(),
            severity,
        }
    }
}
