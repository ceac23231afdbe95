//! Allergen catalog and user preference snapshot

use nutriguard_core::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix of ids generated for user-defined allergens
pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// One allergen the user can select
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Create a user-defined entry with a fresh id not present in `existing`
    pub fn custom(name: impl Into<String>, existing: &[CatalogEntry]) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self {
            id: custom_id(millis, existing),
            name: name.into(),
        }
    }
}

/// `custom-<millis>`, bumped until unique among `existing`
pub fn custom_id(mut millis: u128, existing: &[CatalogEntry]) -> String {
    loop {
        let id = format!("{}{}", CUSTOM_ID_PREFIX, millis);
        if !existing.iter().any(|e| e.id == id) {
            return id;
        }
        millis += 1;
    }
}

/// The fixed part of the allergen catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenCatalog {
    /// Allergens shown first in settings
    #[serde(default = "default_common")]
    pub common: Vec<CatalogEntry>,

    /// Less common allergens
    #[serde(default = "default_additional")]
    pub additional: Vec<CatalogEntry>,
}

impl Default for AllergenCatalog {
    fn default() -> Self {
        Self {
            common: default_common(),
            additional: default_additional(),
        }
    }
}

impl AllergenCatalog {
    /// Resolve an id to its display name: common list, then additional,
    /// then the user's custom entries.
    pub fn resolve<'a>(&'a self, id: &str, custom: &'a [CatalogEntry]) -> Option<&'a str> {
        self.fixed()
            .chain(custom.iter())
            .find(|entry| entry.id == id)
            .map(|entry| entry.name.as_str())
    }

    /// Fixed entries in lookup order
    pub fn fixed(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.common.iter().chain(self.additional.iter())
    }
}

fn default_common() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("milk", "Milk"),
        CatalogEntry::new("peanut", "Peanut"),
        CatalogEntry::new("soy", "Soy"),
    ]
}

fn default_additional() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("gluten", "Gluten"),
        CatalogEntry::new("sesame", "Sesame"),
    ]
}

/// Read-only snapshot of the user's allergen settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenPreference {
    /// Selected ids in selection order
    #[serde(default)]
    pub selected: Vec<String>,

    /// Explicit severities by id
    #[serde(default)]
    pub severities: HashMap<String, Severity>,

    /// User-defined catalog entries
    #[serde(default)]
    pub custom: Vec<CatalogEntry>,
}

impl AllergenPreference {
    /// Snapshot with nothing selected
    pub fn empty() -> Self {
        Self::default()
    }

    /// Select an allergen, ignoring duplicates
    pub fn select(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
        self
    }

    /// Assign a severity
    pub fn with_severity(mut self, id: impl Into<String>, severity: Severity) -> Self {
        self.severities.insert(id.into(), severity);
        self
    }

    /// Add a user-defined entry
    pub fn with_custom(mut self, entry: CatalogEntry) -> Self {
        self.custom.push(entry);
        self
    }

    /// Severity for `id`, medium when unset
    pub fn severity_of(&self, id: &str) -> Severity {
        self.severities.get(id).copied().unwrap_or_default()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }
}
