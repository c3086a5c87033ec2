use anyhow::{Context, Result};
use arxiv_mcp_server::config::load_config;
use arxiv_mcp_server::mcp::McpServer;
use arxiv_mcp_server::models::{DownloadRequest, SearchRequest, SortCriterion, SortOrder};
use arxiv_mcp_server::{ArxivClient, PaperService};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv MCP server - search arXiv and download paper PDFs
#[derive(Parser, Debug)]
#[command(name = "arxiv-mcp-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search arXiv and download paper PDFs over MCP", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (default)
    Serve {
        /// Use the streamable HTTP transport instead of stdio
        #[arg(long)]
        http: bool,

        /// Host to bind in HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind in HTTP mode
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },

    /// Search arXiv and print the results as JSON
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Maximum number of results
        #[arg(long, short, default_value_t = 10)]
        max_results: usize,

        /// Sort criterion: relevance, last_updated_date or submitted_date
        #[arg(long, default_value = "submitted_date")]
        sort_by: String,

        /// Sort order: ascending or descending
        #[arg(long, default_value = "descending")]
        sort_order: String,
    },

    /// Download a paper PDF into the storage directory
    #[command(alias = "d")]
    Download {
        /// arXiv ID or URL (e.g. 2301.12345, https://arxiv.org/abs/2301.12345v2)
        paper_id: String,
    },
}

fn init_tracing(cli: &Cli) {
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let level = if cli.quiet { "error" } else { log_level };

    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_mcp_server={}", level)),
    );

    // stdout carries the stdio transport; logs always go to stderr
    let registry = tracing_subscriber::registry().with(env_filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli);

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let storage = config.prepare_storage().with_context(|| {
        format!(
            "Failed to create storage directory {}",
            config.storage_path.display()
        )
    })?;
    tracing::info!("Storing papers in {}", storage.display());

    let provider = Arc::new(ArxivClient::new(&config.arxiv)?);
    let service = PaperService::new(provider, Arc::new(config));

    let command = cli.command.unwrap_or(Commands::Serve {
        http: false,
        host: "127.0.0.1".to_string(),
        port: 3000,
    });

    match command {
        Commands::Serve { http, host, port } => {
            let server = McpServer::new(service)?;

            if http {
                let addr = format!("{}:{}", host, port);
                let (bound_addr, handle) = server.run_http(&addr).await?;
                tracing::info!("MCP server listening on {}", bound_addr);

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
            } else {
                server.run().await?;
            }
        }

        Commands::Search {
            query,
            max_results,
            sort_by,
            sort_order,
        } => {
            let request = SearchRequest::new(query)
                .max_results(max_results)
                .sort_by(SortCriterion::from_arg(&sort_by))
                .sort_order(SortOrder::from_arg(&sort_order));

            let records = service.search(&request).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Commands::Download { paper_id } => {
            let result = service.download(&DownloadRequest::new(paper_id)).await;
            println!("{}", result);
            if !result.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
