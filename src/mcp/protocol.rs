// ABOUTME: MCP protocol message handling and the stdio server loop
// ABOUTME: Handles initialize, ping, tools/list, and tools/call over JSON-RPC
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! MCP stdio server.
//!
//! One JSON-RPC request per line on stdin, one response per line on
//! stdout. Logs go to stderr; stdout belongs to the protocol.

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use remy_core::errors::{AppError, AppResult};

use crate::constants::protocol;
use crate::jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse};

use super::schema::tool_definitions;
use super::tool_handlers::ToolHandlers;

/// The MCP server
pub struct McpServer {
    handlers: ToolHandlers,
}

impl McpServer {
    /// Create a server over the given tool dispatcher
    #[must_use]
    pub const fn new(handlers: ToolHandlers) -> Self {
        Self { handlers }
    }

    /// Serve JSON-RPC over stdin/stdout until stdin closes
    ///
    /// # Errors
    ///
    /// Returns an error when stdin/stdout fail; per-request failures are
    /// reported to the client, not surfaced here.
    pub async fn run_stdio(&self) -> AppResult<()> {
        info!(
            server = protocol::SERVER_NAME,
            version = protocol::SERVER_VERSION,
            "MCP server listening on stdio"
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| AppError::internal(format!("stdin read failed: {e}")))?
        {
            if line.trim().is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let payload = serde_json::to_string(&response)?;
            stdout
                .write_all(payload.as_bytes())
                .await
                .map_err(|e| AppError::internal(format!("stdout write failed: {e}")))?;
            stdout
                .write_all(b"\n")
                .await
                .map_err(|e| AppError::internal(format!("stdout write failed: {e}")))?;
            stdout
                .flush()
                .await
                .map_err(|e| AppError::internal(format!("stdout flush failed: {e}")))?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw input line; `None` means no response (notification)
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ))
            }
        }
    }

    /// Handle one parsed request; `None` means no response (notification)
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            // notifications/initialized and friends need no reply
            return None;
        }
        let id = request.id.clone();

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": protocol::mcp_protocol_version(),
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": protocol::SERVER_NAME,
                        "version": protocol::SERVER_VERSION,
                    }
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => {
                JsonRpcResponse::success(id, json!({"tools": tool_definitions()}))
            }
            "tools/call" => self.handle_tool_call(id, request.params.as_ref()).await,
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };

        Some(response)
    }

    async fn handle_tool_call(
        &self,
        id: Option<Value>,
        params: Option<&Value>,
    ) -> JsonRpcResponse {
        let Some(name) = params
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
        else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "tools/call requires a tool name",
            );
        };

        let empty_args = json!({});
        let args = params
            .and_then(|p| p.get("arguments"))
            .unwrap_or(&empty_args);

        match self.handlers.call(name, args).await {
            Ok(result) => {
                let text = result.to_string();
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{"type": "text", "text": text}],
                        "isError": false
                    }),
                )
            }
            Err(error) => {
                warn!(tool = name, error = %error, "tool call failed");
                JsonRpcResponse::error(id, error.jsonrpc_code(), error.to_string())
            }
        }
    }
}
