// ABOUTME: Remy MCP server binary - stdio JSON-RPC tool server for AI assistants
// ABOUTME: Wires config, SQLite store, and USDA client into the MCP transport
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Remy MCP server.
//!
//! Typically configured in an MCP client:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "remy": {
//!       "command": "/path/to/remy-mcp-server",
//!       "env": {"USDA_API_KEY": "..."}
//!     }
//!   }
//! }
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use remy_mcp_server::config::environment::ServerConfig;
use remy_mcp_server::database::SqliteStore;
use remy_mcp_server::external::{FoodSource, UsdaClient, UsdaClientConfig};
use remy_mcp_server::logging::LoggingConfig;
use remy_mcp_server::mcp::{McpServer, ToolHandlers};

#[derive(Parser)]
#[command(
    name = "remy-mcp-server",
    about = "Remy nutrition assistant - MCP stdio server",
    version
)]
struct Args {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let store = SqliteStore::new(&config.database_url).await?;
    store.migrate().await?;

    let foods: Option<Arc<dyn FoodSource>> = config.usda_api_key.as_ref().map(|key| {
        Arc::new(UsdaClient::new(UsdaClientConfig {
            api_key: key.clone(),
            ..UsdaClientConfig::default()
        })) as Arc<dyn FoodSource>
    });
    if foods.is_none() {
        warn!("USDA_API_KEY not set; food database tools will report an error");
    }

    let handlers = ToolHandlers::new(
        Arc::new(store),
        foods,
        config.user_id.clone(),
        config.lookback_days,
    );

    McpServer::new(handlers).run_stdio().await?;
    Ok(())
}
