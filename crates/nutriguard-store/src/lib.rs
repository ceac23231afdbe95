//! NutriGuard Store
//!
//! Local persistence of user preferences.
//!
//! Provides:
//! - A key-value preference store with in-memory and JSON-file backends
//! - Allergen settings: selection, severities, and custom allergens
//! - General app settings (notifications, scan sound, contrast)

pub mod settings;
pub mod store;

pub use settings::{GeneralSettings, Settings};
pub use store::{JsonFileStore, MemoryStore, PreferenceStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::settings::{GeneralSettings, Settings};
    pub use crate::store::{JsonFileStore, MemoryStore, PreferenceStore};
}
