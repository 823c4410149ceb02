//! MCP server module
//!
//! Exposes the allotment and catalog tools over the Model Context Protocol.

pub mod server;

pub use server::DispensaryService;
