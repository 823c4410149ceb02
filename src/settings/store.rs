//! Catalog settings file
//!
//! The catalog lives in a JSON object mapping product name to unit grams, in
//! catalog order. A missing file is created from the reference catalog.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Catalog, CatalogError};

/// Environment variable overriding the settings file location
pub const SETTINGS_PATH_ENV: &str = "DISPENSARY_SETTINGS_PATH";

/// Settings store error types
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings file must hold a JSON object of product weights")]
    NotAnObject,

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Get the settings path from environment or use default
pub fn default_settings_path() -> PathBuf {
    std::env::var(SETTINGS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("config");
            path.push("settings.cfg");
            path
        })
}

/// Parse a settings document.
///
/// Entries that are not a positive number, or that repeat a name, are skipped
/// with a warning rather than failing the whole file.
pub fn catalog_from_json(text: &str) -> SettingsResult<Catalog> {
    let Value::Object(map) = serde_json::from_str::<Value>(text)? else {
        return Err(SettingsError::NotAnObject);
    };

    let mut catalog = Catalog::default();
    for (name, value) in map {
        let Some(weight) = value.as_f64() else {
            tracing::warn!("Skipping settings entry '{}': {} is not a weight", name, value);
            continue;
        };
        if let Err(e) = catalog.insert(name.as_str(), weight) {
            tracing::warn!("Skipping settings entry '{}': {}", name, e);
        }
    }
    Ok(catalog)
}

/// Serialize a catalog as a settings document
pub fn catalog_to_json(catalog: &Catalog) -> SettingsResult<String> {
    let map: Map<String, Value> = catalog
        .entries()
        .iter()
        .map(|e| (e.name.clone(), Value::from(e.weight_grams)))
        .collect();
    Ok(serde_json::to_string_pretty(&Value::Object(map))?)
}

/// Load the catalog, writing `defaults` to disk first if the file is missing
pub fn load_settings(path: &Path, defaults: &Catalog) -> SettingsResult<Catalog> {
    let catalog = match fs::read_to_string(path) {
        Ok(text) => catalog_from_json(&text)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No settings file found at {}, creating one now", path.display());
            save_settings(path, defaults)?;
            defaults.clone()
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("Settings loaded: {} products", catalog.len());
    Ok(catalog)
}

/// Overwrite the settings file with the catalog
pub fn save_settings(path: &Path, catalog: &Catalog) -> SettingsResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, catalog_to_json(catalog)?)?;
    tracing::info!("Settings saved to {}", path.display());
    Ok(())
}

/// Shared catalog backed by the settings file.
///
/// Calculations take a snapshot; edits go through `with_catalog_mut`, which
/// persists before the change becomes visible.
#[derive(Clone)]
pub struct CatalogStore {
    path: Arc<PathBuf>,
    catalog: Arc<Mutex<Catalog>>,
}

impl CatalogStore {
    /// Open the store, creating the settings file from the reference catalog if needed
    pub fn open<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let catalog = load_settings(&path, &Catalog::reference())?;
        Ok(Self {
            path: Arc::new(path),
            catalog: Arc::new(Mutex::new(catalog)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the settings file, if it exists
    pub fn file_size(&self) -> Option<u64> {
        fs::metadata(self.path.as_path()).ok().map(|m| m.len())
    }

    fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the current catalog for one calculation
    pub fn snapshot(&self) -> Catalog {
        self.lock().clone()
    }

    /// Edit the catalog. The edit runs on a copy; it is saved and then swapped
    /// in only if both the closure and the save succeed.
    pub fn with_catalog_mut<F, T>(&self, f: F) -> SettingsResult<T>
    where
        F: FnOnce(&mut Catalog) -> SettingsResult<T>,
    {
        let mut guard = self.lock();
        let mut edited = guard.clone();
        let result = f(&mut edited)?;
        save_settings(&self.path, &edited)?;
        *guard = edited;
        Ok(result)
    }
}
