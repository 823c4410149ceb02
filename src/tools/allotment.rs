//! Allotment MCP Tools
//!
//! Calculating a patient's maximized allotment and converting weights.

use serde::Serialize;

use crate::allotment::{self, render_table, WeightUnit};
use crate::models::{AllocationLine, Enablement};
use crate::settings::CatalogStore;

/// Response for calculate_allotment
#[derive(Debug, Serialize)]
pub struct CalculateAllotmentResponse {
    pub allotment_ounces: f64,
    pub budget_grams: f64,
    pub lines: Vec<AllocationLine>,
    pub total_units: u32,
    pub dispensed_grams: f64,
    pub remainder_grams: f64,
    pub remainder_ounces: f64,
    pub disabled_products: Vec<String>,
    /// Disabled names that are not in the catalog
    pub unknown_products: Vec<String>,
    /// The counter display table
    pub table: String,
    pub calculated_at: String,
}

/// Response for convert_weight
#[derive(Debug, Serialize)]
pub struct ConvertWeightResponse {
    pub weight: f64,
    pub unit: WeightUnit,
    pub converted: f64,
    pub converted_unit: WeightUnit,
}

/// Maximize an allotment against the current catalog
pub fn calculate_allotment(
    store: &CatalogStore,
    allotment_oz: &str,
    disabled_products: &[String],
) -> Result<CalculateAllotmentResponse, String> {
    let ounces = allotment::parse_allotment(allotment_oz).map_err(|e| e.to_string())?;
    let catalog = store.snapshot();

    let unknown_products: Vec<String> = disabled_products
        .iter()
        .filter(|name| !catalog.contains(name.as_str()))
        .cloned()
        .collect();

    let enabled = Enablement::disabling(disabled_products.iter().cloned());
    let allocation =
        allotment::maximize_allotment(ounces, &catalog, &enabled).map_err(|e| e.to_string())?;

    tracing::info!(
        "Calculated {} oz allotment: {} units, {:.1} g remaining",
        ounces,
        allocation.total_units(),
        allocation.remainder_grams
    );

    Ok(CalculateAllotmentResponse {
        allotment_ounces: allocation.allotment_ounces,
        budget_grams: allocation.budget_grams,
        total_units: allocation.total_units(),
        dispensed_grams: allocation.dispensed_grams(),
        remainder_grams: allocation.remainder_grams,
        remainder_ounces: allocation.remainder_ounces,
        table: render_table(&allocation),
        lines: allocation.lines,
        disabled_products: disabled_products.to_vec(),
        unknown_products,
        calculated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    })
}

/// Convert a weight between grams and ounces
pub fn convert_weight(weight: f64, unit: &str) -> Result<ConvertWeightResponse, String> {
    if !weight.is_finite() {
        return Err(format!("The value {} was out of bounds.", weight));
    }
    let unit = WeightUnit::from_str(unit);
    Ok(ConvertWeightResponse {
        weight,
        unit,
        converted: allotment::convert_weight(weight, unit),
        converted_unit: unit.converts_to(),
    })
}
