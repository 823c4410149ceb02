//! Product catalog
//!
//! Ordered list of product names and their unit weights in grams. The order is
//! the order staff entered them in; it also breaks ties in the priority order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Enablement, Product};

/// Catalog validation errors
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product name cannot be empty")]
    EmptyName,

    #[error("Product '{0}' is already in the catalog")]
    DuplicateProduct(String),

    #[error("Product '{name}' has invalid weight {weight}; weights must be positive grams")]
    InvalidWeight { name: String, weight: f64 },

    #[error("Product '{0}' is not in the catalog")]
    ProductNotFound(String),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// The reference catalog shipped with the tool
pub const DEFAULT_PRODUCTS: [(&str, f64); 5] = [
    ("Ground Flower", 7.0),
    ("Whole Flower", 3.5),
    ("10ct Pre-Rolls", 3.5),
    ("5ct Pre-Rolls", 2.5),
    ("2ct Pre-Rolls", 1.0),
];

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub weight_grams: f64,
}

/// A weight edit that was not applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEdit {
    pub name: String,
    pub reason: String,
}

/// Outcome of applying a batch of weight edits
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightUpdate {
    pub updated: Vec<String>,
    pub skipped: Vec<SkippedEdit>,
}

/// Ordered product catalog with unique names and positive weights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

fn validate_weight(name: &str, weight: f64) -> CatalogResult<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidWeight {
            name: name.to_string(),
            weight,
        })
    }
}

impl Catalog {
    /// Build a catalog from (name, grams) pairs, validating each
    #[cfg(test)]
    pub(crate) fn from_pairs<I, S>(pairs: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for (name, weight) in pairs {
            catalog.insert(name, weight)?;
        }
        Ok(catalog)
    }

    /// The five-product reference catalog
    pub fn reference() -> Self {
        Self {
            entries: DEFAULT_PRODUCTS
                .iter()
                .map(|(name, weight)| CatalogEntry {
                    name: (*name).to_string(),
                    weight_grams: *weight,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append a product at the end of the catalog
    pub fn insert(&mut self, name: impl Into<String>, weight_grams: f64) -> CatalogResult<()> {
        let name: String = name.into();
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.contains(&name) {
            return Err(CatalogError::DuplicateProduct(name));
        }
        validate_weight(&name, weight_grams)?;
        self.entries.push(CatalogEntry { name, weight_grams });
        Ok(())
    }

    /// Remove a product, returning its entry
    pub fn remove(&mut self, name: &str) -> CatalogResult<CatalogEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| CatalogError::ProductNotFound(name.to_string()))?;
        Ok(self.entries.remove(index))
    }

    /// Change one product's weight, keeping its position
    pub fn set_weight(&mut self, name: &str, weight_grams: f64) -> CatalogResult<()> {
        validate_weight(name, weight_grams)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| CatalogError::ProductNotFound(name.to_string()))?;
        entry.weight_grams = weight_grams;
        Ok(())
    }

    /// Apply a batch of weight edits. Bad edits are skipped and reported, the
    /// rest still apply.
    pub fn update_weights(&mut self, edits: &BTreeMap<String, f64>) -> WeightUpdate {
        let mut outcome = WeightUpdate::default();
        for (name, weight) in edits {
            match self.set_weight(name, *weight) {
                Ok(()) => outcome.updated.push(name.clone()),
                Err(e) => {
                    tracing::warn!("Problem updating product weight for '{}': {}", name, e);
                    outcome.skipped.push(SkippedEdit {
                        name: name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// Entries ranked heaviest first. Equal weights keep catalog order.
    pub fn priority_order(&self) -> Vec<&CatalogEntry> {
        let mut ranked: Vec<&CatalogEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.weight_grams.total_cmp(&a.weight_grams));
        ranked
    }

    /// Product records for a calculation, in catalog order.
    ///
    /// Flags naming products that are not in the catalog are ignored with a
    /// warning.
    pub fn products(&self, enabled: &Enablement) -> Vec<Product> {
        for name in enabled.flagged_names() {
            if !self.contains(name) {
                tracing::warn!("Ignoring enable flag for unknown product '{}'", name);
            }
        }

        self.entries
            .iter()
            .map(|e| {
                Product::new(e.name.clone(), e.weight_grams).with_enabled(enabled.is_enabled(&e.name))
            })
            .collect()
    }
}
