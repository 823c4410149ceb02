//! Dispensary Tool tools module
//!
//! MCP tool implementations for the Dispensary Tool.

pub mod allotment;
pub mod catalog;
pub mod status;
