//! Settings persisted through the JSON file backend

use nutriguard_classifiers::{AllergenMatcher, AllergenPreference};
use nutriguard_core::{AllergenWarning, Product, Severity};
use nutriguard_store::{JsonFileStore, PreferenceStore, Settings};

#[test]
fn test_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    {
        let settings = Settings::new(JsonFileStore::new(&path));
        settings.toggle_allergen("peanut").unwrap();
        settings.set_severity("peanut", Severity::High).unwrap();
        settings.add_custom_allergen("Kiwi").unwrap();
    }

    let settings = Settings::new(JsonFileStore::new(&path));
    let prefs = settings.snapshot();
    assert_eq!(prefs.selected.len(), 2);
    assert_eq!(prefs.severity_of("peanut"), Severity::High);

    let product = Product::new("1").with_ingredients("Kiwi, peanut oil");
    assert_eq!(
        AllergenMatcher::default().evaluate(&product, &prefs),
        vec![
            AllergenWarning::new("peanut", Severity::High),
            AllergenWarning::new("kiwi", Severity::Medium),
        ]
    );
}

#[test]
fn test_stored_format_matches_app_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let settings = Settings::new(JsonFileStore::new(&path));

    settings.toggle_allergen("milk").unwrap();
    settings.set_severity("milk", Severity::Low).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["selectedAllergens"], serde_json::json!(["milk"]));
    assert_eq!(raw["allergenSeverity"]["milk"], "low");
}

#[test]
fn test_corrupt_file_degrades_to_no_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "selectedAllergens=milk").unwrap();

    let settings = Settings::new(JsonFileStore::new(&path));
    assert_eq!(settings.snapshot(), AllergenPreference::empty());
    assert!(settings.store().get_value("selectedAllergens").is_err());
}
