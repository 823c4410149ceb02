//! Dispensary Tool Library
//!
//! Maximizes a patient's cannabis allotment over a catalog of fixed-weight
//! products, heaviest first.

pub mod allotment;
pub mod build_info;
pub mod mcp;
pub mod models;
pub mod settings;
pub mod tools;
