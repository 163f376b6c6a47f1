//! MCP (Model Context Protocol) server for the prompt catalog.
//!
//! Lets AI tools browse CEFR levels and programs and render prompts without
//! going through the CLI.

pub mod error;
pub mod tools;

use crate::catalog::PromptCatalog;
use error::McpError;
use rmcp::{
    handler::server::wrapper::Parameters, model::*, service::RoleServer, tool, tool_handler,
    tool_router, ErrorData as McpErrorData, ServerHandler,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tools::*;
use tracing::debug;

/// The MCP server. Catalog access is serialized through a mutex.
#[derive(Clone)]
pub struct DiscuteServer {
    pub catalog: Arc<Mutex<PromptCatalog>>,
    /// Tool router for MCP tool handling.
    pub tool_router: rmcp::handler::server::tool::ToolRouter<Self>,
}

fn json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpErrorData> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::InternalError {
        message: format!("JSON error: {}", e),
    })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl DiscuteServer {
    pub fn new(catalog: PromptCatalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            tool_router: Self::tool_router(),
        }
    }

    /// Run the server until the transport is closed or an error occurs.
    pub async fn serve<T, E, A>(self, transport: T) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        T: rmcp::transport::IntoTransport<RoleServer, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        use rmcp::service::ServiceExt;
        let running = ServiceExt::serve(self, transport).await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?;
        running.waiting().await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?;
        Ok(())
    }

    #[tool(description = "Check if the server is running")]
    async fn ping(&self) -> Result<CallToolResult, McpErrorData> {
        Ok(CallToolResult::success(vec![Content::text("pong")]))
    }

    #[tool(description = "List CEFR levels (A1-C2) known to the catalog")]
    pub async fn list_levels(&self) -> Result<CallToolResult, McpErrorData> {
        let catalog = self.catalog.lock().await;
        let levels = catalog.levels()?;
        json_result(&levels)
    }

    #[tool(description = "List the prompt programs of a CEFR level, ordered by name")]
    pub async fn list_programs(
        &self,
        Parameters(params): Parameters<ListProgramsParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        validate_name("level", &params.level)?;
        let catalog = self.catalog.lock().await;
        let infos: Vec<_> = catalog
            .programs_for_level(params.level.trim())?
            .iter()
            .map(|p| p.info())
            .collect();
        json_result(&infos)
    }

    #[tool(description = "Show metadata and template variables of a prompt program")]
    pub async fn program_info(
        &self,
        Parameters(params): Parameters<ProgramInfoParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        validate_name("name", &params.name)?;
        let catalog = self.catalog.lock().await;
        let info = catalog
            .program_info(&params.name)?
            .ok_or_else(|| McpError::ProgramNotFound {
                name: params.name.clone(),
            })?;
        let variables = catalog.placeholders(&params.name)?;
        json_result(&ProgramInfoResponse { info, variables })
    }

    #[tool(description = "Render a prompt program with {placeholder} variables")]
    pub async fn render_prompt(
        &self,
        Parameters(params): Parameters<RenderPromptParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        validate_name("name", &params.name)?;
        let strict = params.strict.unwrap_or(true);
        debug!(name = %params.name, strict, "render_prompt");

        let catalog = self.catalog.lock().await;
        let rendered = catalog.render(&params.name, &to_variables(params.variables), strict)?;
        Ok(CallToolResult::success(vec![Content::text(rendered)]))
    }

    #[tool(description = "Render the coach review prompt matching a CEFR level")]
    pub async fn coach_prompt(
        &self,
        Parameters(params): Parameters<CoachPromptParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        let catalog = self.catalog.lock().await;
        let rendered =
            catalog.coach_prompt_for_level(params.level.trim(), &to_variables(params.variables))?;
        Ok(CallToolResult::success(vec![Content::text(rendered)]))
    }
}

#[tool_handler]
impl ServerHandler for DiscuteServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Discute serves a CEFR-indexed catalog of conversation prompts for \
                 language learners. Use list_levels and list_programs to browse, \
                 render_prompt to fill a program's template and coach_prompt for \
                 level-appropriate feedback prompts."
                    .to_string(),
            ),
        }
    }
}
