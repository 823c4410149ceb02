//! Dispensary Tool
//!
//! An MCP server for maximizing patient allotments at the counter.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use dispensary_tool::build_info;
use dispensary_tool::mcp::DispensaryService;
use dispensary_tool::settings::{default_settings_path, CatalogStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dispensary_tool=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let settings_path = default_settings_path();

    // Creates the settings file from the default catalog if missing
    let catalog = CatalogStore::open(&settings_path)?;

    build_info::print_startup_banner(&settings_path, catalog.snapshot().len());
    eprintln!("Starting MCP server on stdio...");

    let service = DispensaryService::new(catalog);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
