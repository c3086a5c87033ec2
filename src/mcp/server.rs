//! pmcp server exposing `search_papers` and `download_paper`.
//!
//! Each tool of the [`ToolRegistry`] is registered as a [`RegisteredTool`].
//! The server answers on stdio by default, or over streamable HTTP.

use crate::mcp::tools::{Tool, ToolRegistry};
use crate::service::PaperService;
use async_trait::async_trait;
use pmcp::{
    server::streamable_http_server::StreamableHttpServer, Error, RequestHandlerExtra, Server,
    ServerCapabilities, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Name the server reports during initialization
pub const SERVER_NAME: &str = "arxiv";

/// MCP server for arXiv search and PDF download
#[derive(Debug, Clone)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
}

impl McpServer {
    /// Build a server whose tools run against `service`
    pub fn new(service: PaperService) -> Result<Self, pmcp::Error> {
        let registry = ToolRegistry::from_service(&service);

        let mut builder = Server::builder()
            .name(SERVER_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .capabilities(ServerCapabilities::default());
        for tool in registry.all() {
            builder = builder.tool(tool.name.clone(), RegisteredTool::from(tool));
        }

        Ok(Self {
            server: Arc::new(Mutex::new(builder.build()?)),
        })
    }

    /// Serve JSON-RPC on stdin/stdout until the client disconnects
    pub async fn run(self) -> Result<(), pmcp::Error> {
        tracing::info!(server = SERVER_NAME, "Serving MCP on stdio");

        let server = Arc::try_unwrap(self.server)
            .map_err(|_| Error::internal("MCP server is shared with an HTTP listener"))?
            .into_inner();

        server.run_stdio().await
    }

    /// Bind the streamable HTTP transport on `addr` and return the bound address
    /// with the listener task
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), pmcp::Error> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid listen address '{}': {}", addr, e)))?;

        tracing::info!(server = SERVER_NAME, %socket_addr, "Serving MCP over streamable HTTP");
        StreamableHttpServer::new(socket_addr, self.server.clone())
            .start()
            .await
    }
}

/// A registry tool as pmcp sees it. Tool errors become internal errors.
#[derive(Clone)]
struct RegisteredTool {
    name: String,
    description: String,
    input_schema: Value,
    handler: Arc<dyn crate::mcp::tools::ToolHandler>,
}

impl From<&Tool> for RegisteredTool {
    fn from(tool: &Tool) -> Self {
        Self {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: tool.input_schema.clone(),
            handler: tool.handler.clone(),
        }
    }
}

#[async_trait]
impl ToolHandler for RegisteredTool {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        self.handler.execute(args).await.map_err(|e| {
            tracing::warn!(tool = %self.name, error = %e, "Tool call failed");
            Error::internal(&e)
        })
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            Some(self.description.clone()),
            self.input_schema.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::provider::mock::MockProvider;

    #[tokio::test]
    async fn test_run_http_rejects_bad_address() {
        let dir = tempfile::tempdir().unwrap();
        let service = PaperService::new(
            Arc::new(MockProvider::new()),
            Arc::new(Config::new(dir.path())),
        );
        let server = McpServer::new(service).unwrap();

        assert!(server.run_http("not-an-address").await.is_err());
    }
}
