//! Allotment calculation module
//!
//! Unit conversion, the greedy allocator, and the text report.

pub mod allocator;
pub mod report;
pub mod units;

use thiserror::Error;

pub use allocator::{
    maximize, maximize_allotment, parse_allotment, rank_by_weight, validate_allotment, MAX_ALLOTMENT_OUNCES,
    MAX_UNITS,
};
pub use report::render_table;
pub use units::{convert_weight, grams_to_ounces, ounces_to_grams, WeightUnit, G_PER_OZ, SCALE_OFFSET_G};

/// Allotment calculation errors
#[derive(Debug, Error, PartialEq)]
pub enum AllotmentError {
    /// Not a number, not finite, negative, or too large to fill
    #[error("The value {0} was out of bounds.")]
    InvalidInput(String),
}

/// Result type for allotment calculations
pub type AllotmentResult<T> = Result<T, AllotmentError>;
