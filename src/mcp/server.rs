//! Dispensary Tool MCP Server Implementation
//!
//! Implements the MCP server with all allotment and catalog tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::settings::CatalogStore;
use crate::tools::allotment;
use crate::tools::catalog;
use crate::tools::status::StatusTracker;

/// Dispensary Tool MCP Service
#[derive(Clone)]
pub struct DispensaryService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    catalog: CatalogStore,
    tool_router: ToolRouter<DispensaryService>,
}

impl DispensaryService {
    pub fn new(catalog: CatalogStore) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new())),
            catalog,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Allotment Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateAllotmentParams {
    /// Patient's remaining allotment in ounces, as entered (e.g. "2.5")
    pub allotment_oz: String,
    /// Products that may not be picked (default: none)
    #[serde(default)]
    pub disabled_products: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertWeightParams {
    /// Weight to convert
    pub weight: f64,
    /// Unit of `weight`: "g"/"gram" or "oz"/"ounce"
    pub unit: String,
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProductWeightsParams {
    /// Product name to new unit weight in grams
    pub weights: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProductParams {
    /// Product name, must be unique
    pub name: String,
    /// Unit weight in grams
    pub weight_grams: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveProductParams {
    /// Product name to remove
    pub name: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl DispensaryService {
    // --- Status ---

    #[tool(description = "Get the current status of the Dispensary Tool including build info, settings file, and process information")]
    async fn dispensary_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status(&self.catalog))
    }

    #[tool(description = "Get instructions for calculating allotments and editing the product catalog. Call this when unsure how to use the dispensary tools.")]
    fn allotment_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::ALLOTMENT_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(ALLOTMENT_INSTRUCTIONS)]))
    }

    // --- Allotment ---

    #[tool(description = "Maximize a patient's allotment (in ounces) over the enabled products, heaviest first. Returns per-product quantities, the remaining weight, and a display table.")]
    fn calculate_allotment(&self, Parameters(p): Parameters<CalculateAllotmentParams>) -> Result<CallToolResult, McpError> {
        let result = allotment::calculate_allotment(&self.catalog, &p.allotment_oz, &p.disabled_products)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Convert a weight between grams and ounces. Ounces to grams subtracts the 0.04 g scale offset and rounds to one decimal.")]
    fn convert_weight(&self, Parameters(p): Parameters<ConvertWeightParams>) -> Result<CallToolResult, McpError> {
        let result = allotment::convert_weight(p.weight, &p.unit)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    // --- Catalog ---

    #[tool(description = "Get the product catalog with unit weights and pick priority")]
    fn get_catalog(&self) -> Result<CallToolResult, McpError> {
        to_json(&catalog::get_catalog(&self.catalog))
    }

    #[tool(description = "Update unit weights (grams) for existing products. Unknown products and non-positive weights are skipped and reported.")]
    fn update_product_weights(&self, Parameters(p): Parameters<UpdateProductWeightsParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::update_product_weights(&self.catalog, &p.weights)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Add a product to the end of the catalog")]
    fn add_product(&self, Parameters(p): Parameters<AddProductParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::add_product(&self.catalog, &p.name, p.weight_grams)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove a product from the catalog")]
    fn remove_product(&self, Parameters(p): Parameters<RemoveProductParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::remove_product(&self.catalog, &p.name)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(response) => to_json(&response),
            None => to_json(&serde_json::json!({ "error": "Product not found", "name": p.name })),
        }
    }

    #[tool(description = "Restore the default five-product catalog")]
    fn reset_catalog(&self) -> Result<CallToolResult, McpError> {
        let result = catalog::reset_catalog(&self.catalog)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for DispensaryService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "dispensary-tool".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Dispensary Tool".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Dispensary Tool - maximizes a patient's cannabis allotment over the product catalog. \
                 Call allotment_instructions first if unsure. \
                 Allotment: calculate_allotment (ounces + disabled products), convert_weight. \
                 Catalog: get_catalog, update_product_weights, add_product, remove_product, reset_catalog. \
                 Status: dispensary_status."
                    .into(),
            ),
        }
    }
}
