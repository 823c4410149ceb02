//! Weight units and conversion
//!
//! Grams and ounces, with the scale calibration applied on the way into grams.

use serde::{Deserialize, Serialize};

/// Grams per ounce
pub const G_PER_OZ: f64 = 28.34952;

/// Subtracted from every ounce-to-gram conversion to match the dispensary scales
pub const SCALE_OFFSET_G: f64 = 0.04;

/// The unit a weight is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Gram,
    Ounce,
    /// Anything unrecognized; converts to itself
    #[serde(other)]
    Other,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Gram => "gram",
            WeightUnit::Ounce => "ounce",
            WeightUnit::Other => "other",
        }
    }

    /// Parse a unit token. Unknown tokens become `Other` rather than an error.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => WeightUnit::Gram,
            "oz" | "ounce" | "ounces" => WeightUnit::Ounce,
            _ => WeightUnit::Other,
        }
    }

    /// The unit a value in this unit converts into
    pub fn converts_to(&self) -> WeightUnit {
        match self {
            WeightUnit::Gram => WeightUnit::Ounce,
            WeightUnit::Ounce => WeightUnit::Gram,
            WeightUnit::Other => WeightUnit::Other,
        }
    }
}

/// Round to one decimal place, folding negative zero into zero
pub fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

/// Grams to ounces. No rounding; display code rounds.
pub fn grams_to_ounces(grams: f64) -> f64 {
    grams / G_PER_OZ
}

/// Ounces to grams, minus the scale offset, rounded to one decimal
pub fn ounces_to_grams(ounces: f64) -> f64 {
    round_to_tenths(ounces * G_PER_OZ - SCALE_OFFSET_G)
}

/// Convert a weight out of `from` into the other unit
pub fn convert_weight(weight: f64, from: WeightUnit) -> f64 {
    match from {
        WeightUnit::Gram => grams_to_ounces(weight),
        WeightUnit::Ounce => ounces_to_grams(weight),
        WeightUnit::Other => weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(WeightUnit::from_str("g"), WeightUnit::Gram);
        assert_eq!(WeightUnit::from_str("Grams"), WeightUnit::Gram);
        assert_eq!(WeightUnit::from_str(" oz "), WeightUnit::Ounce);
        assert_eq!(WeightUnit::from_str("ounce"), WeightUnit::Ounce);
        assert_eq!(WeightUnit::from_str("lb"), WeightUnit::Other);
    }

    #[test]
    fn test_grams_to_ounces_unrounded() {
        let oz = convert_weight(7.0, WeightUnit::Gram);
        assert!((oz - 7.0 / 28.34952).abs() < 1e-12);
        assert!((oz - 0.24692).abs() < 0.00001);
    }

    #[test]
    fn test_ounces_to_grams_applies_offset() {
        // 2.5 * 28.34952 = 70.8738, minus 0.04 = 70.8338, rounds to 70.8
        assert_eq!(convert_weight(2.5, WeightUnit::Ounce), 70.8);
        // 1.0 * 28.34952 - 0.04 = 28.30952 -> 28.3
        assert_eq!(convert_weight(1.0, WeightUnit::Ounce), 28.3);
    }

    #[test]
    fn test_zero_ounces_is_positive_zero() {
        let grams = ounces_to_grams(0.0);
        assert_eq!(grams, 0.0);
        assert!(grams.is_sign_positive());
    }

    #[test]
    fn test_other_unit_passes_through() {
        assert_eq!(convert_weight(12.34, WeightUnit::Other), 12.34);
        assert_eq!(convert_weight(-1.0, WeightUnit::from_str("stone")), -1.0);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        // Offset (0.04) plus half a tenth of rounding error
        for w in [0.5, 1.0, 2.5, 3.5, 7.0, 28.0, 70.8, 113.4, 250.0] {
            let back = ounces_to_grams(grams_to_ounces(w));
            assert!((back - w).abs() <= 0.04 + 0.05 + 1e-9, "w = {}, back = {}", w, back);
        }
    }

    #[test]
    fn test_unit_serde() {
        let unit: WeightUnit = serde_json::from_str("\"ounce\"").unwrap();
        assert_eq!(unit, WeightUnit::Ounce);
        let unit: WeightUnit = serde_json::from_str("\"furlong\"").unwrap();
        assert_eq!(unit, WeightUnit::Other);
        assert_eq!(WeightUnit::Gram.converts_to(), WeightUnit::Ounce);
    }
}
