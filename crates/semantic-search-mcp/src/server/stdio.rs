//! Stdio transport for MCP protocol.
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout. Logs go to stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::McpServer;
use super::protocol::{JsonRpcResponse, parse_request};

/// Serve requests from stdin until it closes.
pub async fn run_stdio(server: &McpServer) -> anyhow::Result<()> {
    tracing::info!("MCP stdio server ready, waiting for requests...");
    serve_lines(server, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    tracing::info!("Stdin closed, shutting down");
    Ok(())
}

/// Answer one JSON-RPC message per line until `reader` is exhausted.
///
/// Lines are handled as raw bytes; one that is not valid UTF-8 or JSON gets
/// a parse-error response and the loop carries on.
async fn serve_lines<R, W>(server: &McpServer, mut reader: R, mut out: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(());
        }

        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        let response = match parse_request(trimmed) {
            Ok(request) => server.handle(request).await,
            Err(error) => {
                tracing::warn!(bytes = trimmed.len(), "Unparseable stdin line");
                Some(*error)
            }
        };

        if let Some(response) = response {
            write_response(&mut out, &response).await?;
        }
    }
}

async fn write_response<W>(out: &mut W, response: &JsonRpcResponse) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(response)?;
    out.write_all(json.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::config::Config;
    use crate::tools::ToolContext;

    #[tokio::test]
    async fn test_write_response_is_one_line() {
        let mut out = Vec::new();
        let response = JsonRpcResponse::success(Some(json!(1)), json!({"a": {"b": 1}}));
        write_response(&mut out, &response).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_gets_parse_error_and_loop_continues() {
        let server = McpServer::new(ToolContext::from_config(Config::for_testing("http://localhost:1")).unwrap());

        let mut input = b"{\"jsonrpc\": \"2.0\", \"id\": 1, \"method\": \"ping\"}\n".to_vec();
        input.extend_from_slice(b"{\"jsonrpc\": \"2.0\", \"id\": \"\xff\xfe\"}\n");
        input.extend_from_slice(b"\n{\"jsonrpc\": \"2.0\", \"id\": 2, \"method\": \"ping\"}\n");

        let mut out = Vec::new();
        serve_lines(&server, input.as_slice(), &mut out).await.unwrap();

        let responses: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["error"]["code"], -32700);
        assert_eq!(responses[2]["id"], 2);
        assert_eq!(responses[2]["result"], json!({}));
    }
}
