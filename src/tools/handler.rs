//! The single adapter between tool results and the MCP tool-call envelope.

use serde_json::Value;

use crate::error::ToolResult;
use crate::mcp::server::ToolCallResult;
use crate::sheets::ClientProvider;
use crate::tools::registry::ToolCall;

/// Runs tool `name` and wraps the outcome.
///
/// Success yields the pretty-printed JSON result as text. Any failure
/// (validation, authentication, network, remote rejection) yields
/// `"Error: <message>"` with the error flag set. Nothing is retried.
pub async fn handle_tool_call(
    provider: &ClientProvider,
    name: &str,
    arguments: &Value,
) -> ToolCallResult {
    match run_tool(provider, name, arguments).await {
        Ok(text) => ToolCallResult::text(text),
        Err(e) => {
            tracing::warn!(tool = name, error = %e, "Tool call failed");
            ToolCallResult::error(format!("Error: {e}"))
        }
    }
}

async fn run_tool(provider: &ClientProvider, name: &str, arguments: &Value) -> ToolResult<String> {
    // Validate before the client is built: a bad call must not trigger
    // credential discovery or any request.
    let call = ToolCall::parse(name, arguments)?;
    tracing::debug!(tool = name, "Calling tool");

    let api = provider.client().await?;
    let value = call.execute(api.as_ref()).await?;
    Ok(serde_json::to_string_pretty(&value)?)
}
