//! Text rendering of reports and settings

use nutriguard_classifiers::{AllergenCatalog, AllergenPreference, CatalogEntry, ProductReport};
use nutriguard_client::{Category, FEATURED_CATEGORIES, MORE_CATEGORIES};
use nutriguard_core::{AllergenWarning, SafetyVerdict};
use nutriguard_store::GeneralSettings;

/// Width of the health bar in characters
const HEALTH_BAR_WIDTH: usize = 20;

/// Full report for a scanned product
pub fn report(report: &ProductReport) -> String {
    let mut out = String::new();

    match &report.product {
        Some(product) => {
            let grade = product
                .grade
                .map(|g| g.to_string())
                .unwrap_or_else(|| "?".to_string());
            out.push_str(&format!("{} ({})\n", product.name, product.code));
            out.push_str(&format!("Brand: {}\n", product.brand));
            out.push_str(&format!("Nutri-Score: {}  {}\n", grade, stars(product.rating)));
            out.push_str(&format!("Health score: {}\n", health_bar(product.health)));
        }
        None => out.push_str("Product not found\n"),
    }

    out.push_str(&format!("Kid safety: {}\n", verdict(&report.kid_safety)));
    out.push_str(&warnings(&report.allergen_warnings));

    if let Some(product) = &report.product {
        let lines = product.nutrition.lines();
        if !lines.is_empty() {
            out.push_str("Nutrition facts (per 100g):\n");
            for (label, value) in lines {
                out.push_str(&format!("  {}: {}\n", label, value));
            }
        }
    }

    out
}

/// One line per listed product
pub fn summary_line(report: &ProductReport) -> String {
    let mut line = match &report.product {
        Some(product) => format!("{}  {} - {}", product.code, product.name, product.brand),
        None => "?".to_string(),
    };

    line.push_str(&format!("  [{}]", verdict(&report.kid_safety)));
    if report.has_allergens() {
        let names: Vec<String> = report
            .allergen_warnings
            .iter()
            .map(|w| format!("{} ({})", w.allergen_name, w.severity))
            .collect();
        line.push_str(&format!("  allergens: {}", names.join(", ")));
    }
    line
}

fn verdict(verdict: &SafetyVerdict) -> String {
    match (&verdict.is_safe, &verdict.reason) {
        (true, _) => "safe for kids".to_string(),
        (false, Some(reason)) => format!("NOT SAFE: {}", reason),
        (false, None) => "NOT SAFE".to_string(),
    }
}

fn warnings(warnings: &[AllergenWarning]) -> String {
    if warnings.is_empty() {
        return "Allergens: none of your allergens found\n".to_string();
    }

    let mut out = String::from("Allergens:\n");
    for warning in warnings {
        out.push_str(&format!("  ! {} ({})\n", warning.allergen_name, warning.severity));
    }
    out
}

fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Bar for a 0.0-1.0 fill fraction, e.g. `[#####---------------]  25%`
fn health_bar(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = (fraction * HEALTH_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(HEALTH_BAR_WIDTH - filled),
        (fraction * 100.0).round() as u32
    )
}

/// Built-in browse categories
pub fn category_list() -> String {
    let mut out = String::new();
    category_section(&mut out, "Featured categories", FEATURED_CATEGORIES);
    category_section(&mut out, "More categories", MORE_CATEGORIES);
    out
}

fn category_section(out: &mut String, title: &str, categories: &[Category]) {
    out.push_str(&format!("{}:\n", title));
    for category in categories {
        out.push_str(&format!("  {:<20} {}\n", category.id, category.name));
    }
}

/// Allergen catalog with selection marks and severities
pub fn allergen_list(catalog: &AllergenCatalog, preferences: &AllergenPreference) -> String {
    let mut out = String::new();
    section(&mut out, "Common allergens", &catalog.common, preferences);
    section(&mut out, "Additional allergens", &catalog.additional, preferences);
    if preferences.custom.is_empty() {
        out.push_str("Custom allergens:\n  (none)\n");
    } else {
        section(&mut out, "Custom allergens", &preferences.custom, preferences);
    }
    out
}

fn section(out: &mut String, title: &str, entries: &[CatalogEntry], preferences: &AllergenPreference) {
    out.push_str(&format!("{}:\n", title));
    for entry in entries {
        let selected = preferences.selected.contains(&entry.id);
        let mark = if selected { "x" } else { " " };
        out.push_str(&format!("  [{}] {:<24} {}", mark, entry.id, entry.name));
        if selected {
            out.push_str(&format!(" ({})", preferences.severity_of(&entry.id)));
        }
        out.push('\n');
    }
}

/// General settings as `key: value` lines
pub fn general(settings: &GeneralSettings) -> String {
    format!(
        "notifications: {}\nscan sound: {}\nhigh contrast: {}\n",
        on_off(settings.notifications_enabled),
        on_off(settings.scan_sound_enabled),
        on_off(settings.high_contrast_mode),
    )
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
