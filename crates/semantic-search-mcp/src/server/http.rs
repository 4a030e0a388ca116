//! Stateless streamable HTTP transport.
//!
//! Every `POST /mcp` carries one JSON-RPC message and gets one JSON
//! response; notifications are acknowledged with `202 Accepted`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::McpServer;
use super::protocol::parse_request;

/// Create the HTTP router for MCP.
pub fn create_router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/mcp", post(handle_mcp_post))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(server: McpServer, host: &str, port: u16) -> anyhow::Result<()> {
    let router = create_router(Arc::new(server));

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn health_check(State(server): State<Arc<McpServer>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": server.context().config.server_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn handle_mcp_post(State(server): State<Arc<McpServer>>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(error) => return (StatusCode::BAD_REQUEST, Json(*error)).into_response(),
    };

    match server.handle(request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
