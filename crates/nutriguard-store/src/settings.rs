//! Allergen and general settings on top of a preference store

use crate::store::PreferenceStore;
use nutriguard_classifiers::{AllergenPreference, CatalogEntry};
use nutriguard_core::{Result, Severity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Ordered list of selected allergen ids
pub const SELECTED_ALLERGENS_KEY: &str = "selectedAllergens";
/// User-defined catalog entries
pub const CUSTOM_ALLERGENS_KEY: &str = "customAllergens";
/// Allergen id to severity map
pub const ALLERGEN_SEVERITY_KEY: &str = "allergenSeverity";
pub const NOTIFICATIONS_KEY: &str = "notificationsEnabled";
pub const SCAN_SOUND_KEY: &str = "scanSoundEnabled";
pub const HIGH_CONTRAST_KEY: &str = "highContrastMode";

/// Non-allergen app preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub notifications_enabled: bool,
    pub scan_sound_enabled: bool,
    pub high_contrast_mode: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            scan_sound_enabled: true,
            high_contrast_mode: false,
        }
    }
}

/// User settings persisted in a [`PreferenceStore`]
pub struct Settings<S> {
    store: S,
}

impl<S: PreferenceStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Selected ids, empty when never saved
    pub fn selected(&self) -> Result<Vec<String>> {
        Ok(self.store.get(SELECTED_ALLERGENS_KEY)?.unwrap_or_default())
    }

    /// Custom catalog entries, empty when never saved
    pub fn custom_allergens(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.store.get(CUSTOM_ALLERGENS_KEY)?.unwrap_or_default())
    }

    /// Explicit severities, empty when never saved. Entries that are not
    /// a known severity are dropped so those allergens report medium.
    pub fn severities(&self) -> Result<HashMap<String, Severity>> {
        let raw = match self.store.get_value(ALLERGEN_SEVERITY_KEY)? {
            Some(Value::Object(map)) => map,
            None | Some(Value::Null) => return Ok(HashMap::new()),
            Some(other) => {
                warn!("Ignoring allergen severities stored as {}", other);
                return Ok(HashMap::new());
            }
        };

        Ok(raw
            .into_iter()
            .filter_map(|(id, value)| {
                let severity = value.as_str().and_then(|s| s.parse::<Severity>().ok());
                if severity.is_none() {
                    debug!(allergen = %id, %value, "unrecognised severity, using default");
                }
                severity.map(|severity| (id, severity))
            })
            .collect())
    }

    /// Read the allergen settings, failing on unreadable values
    pub fn load(&self) -> Result<AllergenPreference> {
        let selected = self.selected()?;
        if selected.is_empty() {
            return Ok(AllergenPreference::empty());
        }

        let prefs = AllergenPreference {
            selected: Vec::new(),
            severities: self.severities()?,
            custom: self.custom_allergens()?,
        };
        Ok(selected.into_iter().fold(prefs, |prefs, id| prefs.select(id)))
    }

    /// Read the allergen settings for evaluation. An unreadable store
    /// yields an empty snapshot so the matcher reports nothing.
    pub fn snapshot(&self) -> AllergenPreference {
        self.load().unwrap_or_else(|e| {
            warn!("Allergen preferences unavailable, using none: {}", e);
            AllergenPreference::empty()
        })
    }

    /// Select `id` if unselected, otherwise unselect it. Returns whether
    /// it is selected afterwards.
    pub fn toggle_allergen(&self, id: &str) -> Result<bool> {
        let mut selected = self.selected()?;
        let now_selected = match selected.iter().position(|s| s == id) {
            Some(idx) => {
                selected.remove(idx);
                false
            }
            None => {
                selected.push(id.to_string());
                true
            }
        };
        self.store.set(SELECTED_ALLERGENS_KEY, &selected)?;

        info!(allergen = id, selected = now_selected, "allergen toggled");
        Ok(now_selected)
    }

    /// Create a custom allergen and select it. Blank names are ignored.
    pub fn add_custom_allergen(&self, name: &str) -> Result<Option<CatalogEntry>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let mut custom = self.custom_allergens()?;
        let mut selected = self.selected()?;
        let entry = CatalogEntry::custom(name, &custom);

        custom.push(entry.clone());
        selected.push(entry.id.clone());
        self.store.set(CUSTOM_ALLERGENS_KEY, &custom)?;
        self.store.set(SELECTED_ALLERGENS_KEY, &selected)?;

        info!(id = %entry.id, name = %entry.name, "custom allergen added");
        Ok(Some(entry))
    }

    /// Delete a custom allergen with its selection and severity. Returns
    /// whether an entry was removed.
    pub fn remove_custom_allergen(&self, id: &str) -> Result<bool> {
        let mut custom = self.custom_allergens()?;
        let before = custom.len();
        custom.retain(|entry| entry.id != id);
        if custom.len() == before {
            return Ok(false);
        }

        let mut selected = self.selected()?;
        selected.retain(|s| s != id);
        let mut severities = self.severities()?;
        severities.remove(id);

        self.store.set(CUSTOM_ALLERGENS_KEY, &custom)?;
        self.store.set(SELECTED_ALLERGENS_KEY, &selected)?;
        self.store.set(ALLERGEN_SEVERITY_KEY, &severities)?;

        info!(id, "custom allergen removed");
        Ok(true)
    }

    /// Assign a severity to an allergen
    pub fn set_severity(&self, id: &str, severity: Severity) -> Result<()> {
        let mut severities = self.severities()?;
        severities.insert(id.to_string(), severity);
        self.store.set(ALLERGEN_SEVERITY_KEY, &severities)?;

        info!(allergen = id, %severity, "severity set");
        Ok(())
    }

    /// General app preferences, with defaults for unsaved values
    pub fn general(&self) -> Result<GeneralSettings> {
        let defaults = GeneralSettings::default();
        Ok(GeneralSettings {
            notifications_enabled: self
                .store
                .get(NOTIFICATIONS_KEY)?
                .unwrap_or(defaults.notifications_enabled),
            scan_sound_enabled: self
                .store
                .get(SCAN_SOUND_KEY)?
                .unwrap_or(defaults.scan_sound_enabled),
            high_contrast_mode: self
                .store
                .get(HIGH_CONTRAST_KEY)?
                .unwrap_or(defaults.high_contrast_mode),
        })
    }

    /// Save general app preferences
    pub fn set_general(&self, general: &GeneralSettings) -> Result<()> {
        self.store.set(NOTIFICATIONS_KEY, &general.notifications_enabled)?;
        self.store.set(SCAN_SOUND_KEY, &general.scan_sound_enabled)?;
        self.store.set(HIGH_CONTRAST_KEY, &general.high_contrast_mode)?;
        Ok(())
    }

    /// Clear all allergens and restore general defaults
    pub fn reset(&self) -> Result<()> {
        self.store.set(SELECTED_ALLERGENS_KEY, &Vec::<String>::new())?;
        self.store.set(CUSTOM_ALLERGENS_KEY, &Vec::<CatalogEntry>::new())?;
        self.store.set(ALLERGEN_SEVERITY_KEY, &HashMap::<String, Severity>::new())?;
        self.set_general(&GeneralSettings::default())?;

        info!("settings reset");
        Ok(())
    }
}
