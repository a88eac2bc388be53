// ABOUTME: Model Context Protocol (MCP) implementation for AI assistant integration
// ABOUTME: stdio JSON-RPC transport, tool schemas, and tool dispatch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! # MCP Module
//!
//! The Model Context Protocol surface: a JSON-RPC 2.0 server over
//! stdin/stdout exposing the nutrition tools to AI assistants. The
//! transport is deliberately thin: every tool dispatches straight into
//! the intelligence engines through [`tool_handlers::ToolHandlers`].

/// stdio JSON-RPC server loop
pub mod protocol;

/// Tool definitions for tools/list
pub mod schema;

/// Tool dispatch and per-tool handlers
pub mod tool_handlers;

pub use protocol::McpServer;
pub use schema::{tool_definitions, ToolDef};
pub use tool_handlers::ToolHandlers;
