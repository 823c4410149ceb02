//! Product model
//!
//! A dispensable product as the allocator sees it: name, unit weight, and
//! whether it may be picked in the current calculation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// A product record for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub weight_grams: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Product {
    /// Create an enabled product
    pub fn new(name: impl Into<String>, weight_grams: f64) -> Self {
        Self {
            name: name.into(),
            weight_grams,
            enabled: true,
        }
    }

    /// Builder-style enable flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether the weight can take part in a calculation at all
    pub fn has_usable_weight(&self) -> bool {
        self.weight_grams.is_finite() && self.weight_grams > 0.0
    }
}

/// Per-product enable flags for a calculation.
///
/// Products without an explicit flag are enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Enablement {
    flags: HashMap<String, bool>,
}

impl Enablement {
    /// Everything enabled
    pub fn all_enabled() -> Self {
        Self::default()
    }

    /// Enable everything except the named products
    pub fn disabling<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut enablement = Self::default();
        for name in names {
            enablement.set(name, false);
        }
        enablement
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.flags.insert(name.into(), enabled);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(true)
    }

    /// Names with an explicit flag
    pub fn flagged_names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_defaults_enabled() {
        let product = Product::new("Ground Flower", 7.0);
        assert!(product.enabled);
        assert!(!product.with_enabled(false).enabled);
    }

    #[test]
    fn test_usable_weight() {
        assert!(Product::new("a", 1.0).has_usable_weight());
        assert!(!Product::new("b", 0.0).has_usable_weight());
        assert!(!Product::new("c", -2.0).has_usable_weight());
        assert!(!Product::new("d", f64::NAN).has_usable_weight());
    }

    #[test]
    fn test_enablement_defaults_and_set() {
        let mut flags = Enablement::all_enabled();
        assert!(flags.is_enabled("Whole Flower"));
        assert_eq!(flags.flagged_names().count(), 0);

        flags.set("Whole Flower", false);
        assert!(!flags.is_enabled("Whole Flower"));
        flags.set("Whole Flower", true);
        assert!(flags.is_enabled("Whole Flower"));
        assert_eq!(flags.flagged_names().collect::<Vec<_>>(), vec!["Whole Flower"]);
    }

    #[test]
    fn test_enablement_disabling() {
        let flags = Enablement::disabling(["Ground Flower", "2ct Pre-Rolls"]);
        assert!(!flags.is_enabled("Ground Flower"));
        assert!(!flags.is_enabled("2ct Pre-Rolls"));
        assert!(flags.is_enabled("Whole Flower"));
    }

    #[test]
    fn test_product_deserialize_without_flag() {
        let product: Product =
            serde_json::from_str(r#"{"name": "5ct Pre-Rolls", "weight_grams": 2.5}"#).unwrap();
        assert!(product.enabled);
        assert_eq!(product.weight_grams, 2.5);
    }
}
