use std::sync::Arc;
use std::future::Future;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::json;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::controller::{Lifecycle, RecipeController};
use crate::view::{TranscriptView, ViewEvent};

// Parameter structs for tools
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchRecipesParams {
    /// Name substring to filter by; empty or missing lists everything
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RecipeFormParams {
    pub name: String,
    pub instructions: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    pub name: String,
}

/// Serves the recipe page over MCP: each tool call is one button press.
///
/// All connections share a single controller, so commands run one at a time.
/// The lifecycle handle is kept outside that lock so shutdown can cancel the
/// command currently holding it.
#[derive(Clone)]
pub struct RecipeMcpServer {
    controller: Arc<Mutex<RecipeController<TranscriptView>>>,
    lifecycle: Lifecycle,
    tool_router: ToolRouter<RecipeMcpServer>,
}

#[tool_router]
impl RecipeMcpServer {
    pub fn new(controller: RecipeController<TranscriptView>) -> Self {
        Self {
            lifecycle: controller.lifecycle().clone(),
            controller: Arc::new(Mutex::new(controller)),
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, anyhow::Error> {
        let controller = RecipeController::from_config(config, TranscriptView::new())?;
        Ok(Self::new(controller))
    }

    /// Runs page load and reports whether the initial list fetch succeeded.
    pub async fn start(&self) -> Result<usize, anyhow::Error> {
        let mut controller = self.controller.lock().await;
        controller.init().await;

        let events = controller.view_mut().drain();
        if let Some(message) = first_alert(&events) {
            anyhow::bail!("{}", message);
        }
        if controller.is_torn_down() {
            anyhow::bail!("Recipe page was torn down before the initial list loaded");
        }

        Ok(controller.store().recipes().len())
    }

    /// Tears the page down. Does not wait for the controller lock, so a
    /// command in flight resolves as cancelled instead of blocking shutdown.
    pub fn shutdown(&self) {
        self.lifecycle.cancel();
    }

    #[tool(description = "List every recipe")]
    async fn list_recipes(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!("MCP tool call: list_recipes");
        let mut controller = self.controller.lock().await;
        controller.list().await;
        Ok(Self::finish(&mut controller))
    }

    #[tool(description = "Search recipes by a name substring")]
    async fn search_recipes(
        &self,
        Parameters(params): Parameters<SearchRecipesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!("MCP tool call: search_recipes");
        let mut controller = self.controller.lock().await;
        controller.on_search(params.name.as_deref().unwrap_or_default()).await;
        Ok(Self::finish(&mut controller))
    }

    #[tool(description = "Create a recipe from a name and instructions")]
    async fn create_recipe(
        &self,
        Parameters(params): Parameters<RecipeFormParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!("MCP tool call: create_recipe");
        let mut controller = self.controller.lock().await;
        controller.on_create(&params.name, &params.instructions).await;
        Ok(Self::finish(&mut controller))
    }

    #[tool(description = "Replace the instructions of the recipe with exactly this name")]
    async fn update_recipe(
        &self,
        Parameters(params): Parameters<RecipeFormParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!("MCP tool call: update_recipe");
        let mut controller = self.controller.lock().await;
        controller.on_update(&params.name, &params.instructions).await;
        Ok(Self::finish(&mut controller))
    }

    #[tool(description = "Delete the listed recipe with exactly this name")]
    async fn delete_recipe(
        &self,
        Parameters(params): Parameters<DeleteRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!("MCP tool call: delete_recipe");
        let mut controller = self.controller.lock().await;
        controller.on_delete(&params.name).await;
        Ok(Self::finish(&mut controller))
    }

    #[tool(description = "Sign out and return to the login page")]
    async fn logout(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!("MCP tool call: logout");
        let mut controller = self.controller.lock().await;
        controller.on_logout().await;
        Ok(Self::finish(&mut controller))
    }

    #[tool(description = "Show whether a user is logged in and which controls are visible")]
    async fn session_status(&self) -> Result<CallToolResult, McpError> {
        let controller = self.controller.lock().await;
        let session = controller.store().session();
        let view = controller.view();

        let result = json!({
            "logged_in": session.is_authenticated(),
            "is_admin": session.is_admin(),
            "token_preview": session.token_preview(),
            "logout_visible": view.logout_visible(),
            "admin_link_visible": view.admin_link_visible(),
            "location": view.location(),
        });

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string()),
        )]))
    }

    fn finish(controller: &mut RecipeController<TranscriptView>) -> CallToolResult {
        let events = controller.view_mut().drain();
        tool_result(events, controller.view())
    }
}

/// Packs the events a command produced, plus the page state it left behind,
/// into a tool result. Any alert marks the result as an error.
pub fn tool_result(events: Vec<ViewEvent>, view: &TranscriptView) -> CallToolResult {
    let alert = first_alert(&events).map(str::to_string);

    let result = json!({
        "events": events,
        "recipes": view.items(),
        "logout_visible": view.logout_visible(),
        "admin_link_visible": view.admin_link_visible(),
        "location": view.location(),
    });
    let text = serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string());

    match alert {
        Some(message) => {
            tracing::debug!("Command ended with alert: {}", message);
            CallToolResult::error(vec![Content::text(text)])
        }
        None => CallToolResult::success(vec![Content::text(text)]),
    }
}

fn first_alert(events: &[ViewEvent]) -> Option<&str> {
    events.iter().find_map(|event| match event {
        ViewEvent::Alert { message } => Some(message.as_str()),
        _ => None,
    })
}

#[tool_handler]
impl ServerHandler for RecipeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server drives a recipe management page. Tools list and search recipes, create a recipe, update or delete a recipe by its exact name, and log out. Every result reports the recipes currently shown and any alert the page raised.".to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }
}
