//! CRM Assistant MCP server: exposes contact intelligence to MCP clients.
//!
//! Standalone binary that communicates over stdio using the Model Context Protocol.
//! Every tool is read-only; contacts are added through the `crm-assistant` CLI.
//!
//! Build: `cargo build --features mcp --bin crm-assistant-mcp`

use std::sync::Arc;

use rmcp::model::*;
use rmcp::schemars::JsonSchema;
use rmcp::{tool, ServerHandler, ServiceExt};
use serde::{Deserialize, Serialize};

use crm_assistant_lib::error::{CrmError, ErrorResponse};
use crm_assistant_lib::services;
use crm_assistant_lib::state::AppState;

// =============================================================================
// Server State
// =============================================================================

#[derive(Clone)]
struct CrmMcp {
    /// Store and rng are already behind mutexes inside `AppState`.
    state: Arc<AppState>,
}

// =============================================================================
// Tool Parameter Types
// =============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
struct PredictRevenueParams {
    #[schemars(description = "ID of the contact to forecast")]
    contact_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AskParams {
    #[schemars(description = "Free-text question, e.g. \"who is my top client\"")]
    message: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LimitParams {
    #[schemars(description = "Maximum number of contacts to return")]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchParams {
    #[schemars(description = "Text to match against contact names and emails")]
    query: String,
}

// =============================================================================
// Tools
// =============================================================================

#[tool(tool_box)]
impl CrmMcp {
    fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    #[tool(description = "Aggregate insights over every contact: totals, company rollup, revenue forecasts, scores, relationship edges and trends.")]
    fn get_insights(&self) -> String {
        to_json(services::get_insights(&self.state))
    }

    #[tool(description = "Revenue overview, distribution buckets, top performers by revenue, score and company, and pipeline counters.")]
    fn get_analytics(&self) -> String {
        to_json(services::get_analytics(&self.state))
    }

    #[tool(description = "Immediate, weekly and monthly follow-up actions per contact plus pipeline narrative.")]
    fn get_recommendations(&self) -> String {
        to_json(services::get_recommendations(&self.state))
    }

    #[tool(description = "Contact graph: one node per contact and typed, weighted connections between them.")]
    fn relationship_map(&self) -> String {
        to_json(services::relationship_map(&self.state))
    }

    #[tool(description = "Revenue forecast for one contact with confidence, factor labels and advice.")]
    fn predict_revenue(&self, #[tool(aggr)] params: PredictRevenueParams) -> String {
        to_json(services::predict_revenue(&self.state, &params.contact_id))
    }

    #[tool(description = "Ask a question about the contact list in plain English: counts, top or least profitable clients, revenue, companies, analytics or recommendations.")]
    fn ask_crm(&self, #[tool(aggr)] params: AskParams) -> String {
        match services::chat(&self.state, &params.message) {
            Ok(reply) => reply.response,
            Err(e) => format!("Error: {e}"),
        }
    }

    #[tool(description = "Newest contacts with AI score and predicted revenue.")]
    fn list_contacts(&self, #[tool(aggr)] params: LimitParams) -> String {
        to_json(services::list_contacts(&self.state, params.limit))
    }

    #[tool(description = "Contacts with the highest revenue.")]
    fn top_clients(&self, #[tool(aggr)] params: LimitParams) -> String {
        to_json(services::top_clients(&self.state, params.limit))
    }

    #[tool(description = "Find contacts whose name or email contains the query (case-insensitive).")]
    fn search_contacts(&self, #[tool(aggr)] params: SearchParams) -> String {
        to_json(services::search(&self.state, &params.query))
    }
}

// =============================================================================
// ServerHandler: wires tool_box into the MCP protocol
// =============================================================================

#[tool(tool_box)]
impl ServerHandler for CrmMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "crm-assistant".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some(
                "CRM Assistant MCP server. Read-only contact intelligence. \
                 Use ask_crm for plain-language questions, get_insights and get_analytics \
                 for portfolio views, predict_revenue for a single contact, and \
                 list_contacts, top_clients or search_contacts to look contacts up."
                    .to_string(),
            ),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn to_json<T: Serialize>(result: Result<T, CrmError>) -> String {
    match result {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("Error: {e}")),
        Err(e) => serde_json::to_string_pretty(&ErrorResponse::from(&e))
            .unwrap_or_else(|_| format!("Error: {e}")),
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let state =
        AppState::open_default().map_err(|e| anyhow::anyhow!("Failed to open CRM state: {e}"))?;

    let server = CrmMcp::new(state);

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
