//! Settings module
//!
//! Loads and persists the product catalog.

pub mod store;

pub use store::{
    catalog_from_json, catalog_to_json, default_settings_path, load_settings, save_settings,
    CatalogStore, SettingsError, SettingsResult, SETTINGS_PATH_ENV,
};
