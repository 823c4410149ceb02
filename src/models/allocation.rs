//! Allocation result
//!
//! What the allocator hands back: one line per selected product plus whatever
//! part of the allotment could not be filled.

use serde::Serialize;

use crate::allotment::units::grams_to_ounces;

/// One selected product and how much of it is dispensed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationLine {
    pub product: String,
    pub quantity: u32,
    pub unit_grams: f64,
    pub total_grams: f64,
    pub total_ounces: f64,
}

impl AllocationLine {
    pub fn new(product: impl Into<String>, quantity: u32, unit_grams: f64) -> Self {
        let total_grams = unit_grams * f64::from(quantity);
        Self {
            product: product.into(),
            quantity,
            unit_grams,
            total_grams,
            total_ounces: grams_to_ounces(total_grams),
        }
    }

    /// e.g. `= 70.0 g / 2.469 oz`
    pub fn summary(&self) -> String {
        format!("= {:.1} g / {:.3} oz", self.total_grams, self.total_ounces)
    }
}

/// Result of maximizing one allotment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub allotment_ounces: f64,
    /// The allotment after conversion to grams
    pub budget_grams: f64,
    /// Sorted by quantity, largest first
    pub lines: Vec<AllocationLine>,
    pub remainder_grams: f64,
    pub remainder_ounces: f64,
}

impl Allocation {
    /// An allocation that selected nothing
    pub fn empty(allotment_ounces: f64, budget_grams: f64) -> Self {
        Self {
            allotment_ounces,
            budget_grams,
            lines: Vec::new(),
            remainder_grams: budget_grams,
            remainder_ounces: grams_to_ounces(budget_grams),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all products
    pub fn total_units(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn dispensed_grams(&self) -> f64 {
        self.lines.iter().map(|l| l.total_grams).sum()
    }

    #[cfg(test)]
    pub(crate) fn quantity_of(&self, product: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product == product)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// e.g. `0.8 g / 0.028 oz`
    pub fn remaining_summary(&self) -> String {
        format!("{:.1} g / {:.3} oz", self.remainder_grams, self.remainder_ounces)
    }
}
