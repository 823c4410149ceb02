//! Data models
//!
//! Catalog, product records, and allocation results.

mod allocation;
mod catalog;
mod product;

pub use allocation::{Allocation, AllocationLine};
pub use catalog::{
    Catalog, CatalogEntry, CatalogError, CatalogResult, SkippedEdit, WeightUpdate,
    DEFAULT_PRODUCTS,
};
pub use product::{Enablement, Product};
