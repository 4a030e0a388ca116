//! Semantic Search MCP Server - Entry Point
//!
//! Provides both stdio and streamable HTTP transports.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use semantic_search_mcp::config::{Config, Transport};
use semantic_search_mcp::server::McpServer;
use semantic_search_mcp::tools::ToolContext;

#[derive(Parser, Debug)]
#[command(name = "semantic-search-mcp")]
#[command(about = "MCP server for the Semantic Scholar academic graph API")]
#[command(version)]
struct Cli {
    /// Transport mode (overrides MCP_TRANSPORT)
    #[arg(long, value_enum)]
    transport: Option<Transport>,

    /// HTTP bind host (overrides MCP_SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// HTTP server port (overrides MCP_SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Log level: trace, debug, info, warn, error (overrides MCP_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(transport) = self.transport {
            config.transport = transport;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

/// Logs always go to stderr; stdout carries the stdio protocol stream.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_ascii_lowercase()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let json_logs = cli.json_logs;
    let config = cli.apply(Config::from_env()?);

    init_tracing(&config.log_level, json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = config.transport.as_str(),
        has_api_key = config.has_api_key(),
        "Starting Semantic Search MCP server"
    );

    let ctx = ToolContext::from_config(config)?;
    McpServer::new(ctx).run().await
}
