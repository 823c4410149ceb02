//! Catalog MCP Tools
//!
//! Viewing and editing product weights. Every edit is written to the settings
//! file before it takes effect.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::allotment::grams_to_ounces;
use crate::models::{Catalog, CatalogError, SkippedEdit};
use crate::settings::{CatalogStore, SettingsError};

/// Summary of a catalog product
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub weight_grams: f64,
    pub weight_ounces: f64,
    /// 1 = picked first
    pub priority: usize,
}

/// Response for get_catalog and the catalog edit tools
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<ProductSummary>,
    pub priority_order: Vec<String>,
    pub settings_path: String,
}

impl CatalogResponse {
    fn from_catalog(catalog: &Catalog, store: &CatalogStore) -> Self {
        let priority_order: Vec<String> = catalog
            .priority_order()
            .into_iter()
            .map(|e| e.name.clone())
            .collect();

        let products = catalog
            .entries()
            .iter()
            .map(|e| ProductSummary {
                name: e.name.clone(),
                weight_grams: e.weight_grams,
                weight_ounces: grams_to_ounces(e.weight_grams),
                priority: priority_order
                    .iter()
                    .position(|name| *name == e.name)
                    .map(|i| i + 1)
                    .unwrap_or(0),
            })
            .collect();

        Self {
            products,
            priority_order,
            settings_path: store.path().display().to_string(),
        }
    }
}

/// Response for update_product_weights
#[derive(Debug, Serialize)]
pub struct UpdateWeightsResponse {
    pub updated: Vec<String>,
    pub skipped: Vec<SkippedEdit>,
    pub catalog: CatalogResponse,
}

/// Get the current catalog in catalog order, with its priority order
pub fn get_catalog(store: &CatalogStore) -> CatalogResponse {
    CatalogResponse::from_catalog(&store.snapshot(), store)
}

/// Change product weights. Unknown products and bad weights are skipped and reported.
pub fn update_product_weights(
    store: &CatalogStore,
    weights: &BTreeMap<String, f64>,
) -> Result<UpdateWeightsResponse, String> {
    let (outcome, catalog) = store
        .with_catalog_mut(|catalog| Ok((catalog.update_weights(weights), catalog.clone())))
        .map_err(|e| format!("Failed to save settings: {}", e))?;

    Ok(UpdateWeightsResponse {
        updated: outcome.updated,
        skipped: outcome.skipped,
        catalog: CatalogResponse::from_catalog(&catalog, store),
    })
}

/// Add a product at the end of the catalog
pub fn add_product(store: &CatalogStore, name: &str, weight_grams: f64) -> Result<CatalogResponse, String> {
    let catalog = store
        .with_catalog_mut(|catalog| {
            catalog.insert(name, weight_grams)?;
            Ok(catalog.clone())
        })
        .map_err(|e| e.to_string())?;

    tracing::info!("Added product '{}' at {} g", name.trim(), weight_grams);
    Ok(CatalogResponse::from_catalog(&catalog, store))
}

/// Remove a product. Returns None if it was not in the catalog.
pub fn remove_product(store: &CatalogStore, name: &str) -> Result<Option<CatalogResponse>, String> {
    let result = store.with_catalog_mut(|catalog| {
        catalog.remove(name)?;
        Ok(catalog.clone())
    });

    match result {
        Ok(catalog) => {
            tracing::info!("Removed product '{}'", name);
            Ok(Some(CatalogResponse::from_catalog(&catalog, store)))
        }
        Err(SettingsError::Catalog(CatalogError::ProductNotFound(_))) => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

/// Restore the reference catalog
pub fn reset_catalog(store: &CatalogStore) -> Result<CatalogResponse, String> {
    let catalog = store
        .with_catalog_mut(|catalog| {
            *catalog = Catalog::reference();
            Ok(catalog.clone())
        })
        .map_err(|e| format!("Failed to save settings: {}", e))?;

    tracing::info!("Catalog reset to defaults");
    Ok(CatalogResponse::from_catalog(&catalog, store))
}
