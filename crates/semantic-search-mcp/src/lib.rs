//! Semantic Search MCP Server
//!
//! A Model Context Protocol (MCP) server for the Semantic Scholar Graph API.
//! Lets LLM agents search papers and authors and walk citation links.
//!
//! # Features
//!
//! - **8 MCP Tools**: paper and author search, details, authors, citations, references
//! - **Validated parameters**: bad limits, field names and date ranges never reach the API
//! - **Paced**: a fixed pre-request delay chosen by API key presence
//! - **Total**: every tool failure is returned as a JSON error envelope
//!
//! # Example
//!
//! ```no_run
//! use semantic_search_mcp::{config::Config, models::WireParams, SemanticScholarClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = SemanticScholarClient::new(config)?;
//!
//!     let paper = client.get("/graph/v1/paper/DOI:10.1038/nature14539", &WireParams::new()).await?;
//!     println!("{}", paper["title"]);
//!
//!     client.close();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod tools;

pub use client::SemanticScholarClient;
pub use config::Config;
pub use error::{ApiError, ToolError, ValidationError};
