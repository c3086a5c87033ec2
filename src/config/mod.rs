//! Configuration management.
//!
//! Configuration is layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional configuration file (TOML, YAML, JSON, ... by extension)
//! 3. `ARXIV_MCP_*` environment variables, nested keys separated by `__`
//!    (e.g. `ARXIV_MCP_ARXIV__PAGE_SIZE=50`)
//! 4. `ARXIV_PAPER_STORAGE_PATH`, which always wins for the storage directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the download directory
pub const STORAGE_PATH_ENV: &str = "ARXIV_PAPER_STORAGE_PATH";

/// Prefix for layered environment overrides
pub const ENV_PREFIX: &str = "ARXIV_MCP";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory downloaded PDFs are written to
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// arXiv client settings
    #[serde(default)]
    pub arxiv: ArxivConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            arxiv: ArxivConfig::default(),
        }
    }
}

impl Config {
    /// Create a configuration with the given storage directory and default client settings
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            arxiv: ArxivConfig::default(),
        }
    }

    /// Replace the storage path when an override is present and non-empty
    pub fn with_storage_override(mut self, value: Option<String>) -> Self {
        if let Some(path) = value.filter(|p| !p.trim().is_empty()) {
            self.storage_path = PathBuf::from(path);
        }
        self
    }

    /// Create the storage directory (and parents) if it does not exist yet
    pub fn prepare_storage(&self) -> std::io::Result<&Path> {
        std::fs::create_dir_all(&self.storage_path)?;
        Ok(&self.storage_path)
    }
}

/// arXiv API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Atom export API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL used to build a PDF link when an entry has none
    #[serde(default = "default_pdf_base_url")]
    pub pdf_base_url: String,

    /// Entries requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Delay between consecutive page requests, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Whole-request timeout for API queries, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whole-request timeout for PDF downloads, in seconds; unbounded when unset
    #[serde(default)]
    pub pdf_timeout_secs: Option<u64>,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            pdf_base_url: default_pdf_base_url(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay_ms(),
            timeout_secs: default_timeout_secs(),
            pdf_timeout_secs: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ArxivConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pdf_timeout(&self) -> Option<Duration> {
        self.pdf_timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_storage_path() -> PathBuf {
    std::env::current_dir()
        .map(|dir| dir.join("downloads"))
        .unwrap_or_else(|_| PathBuf::from("./downloads"))
}

fn default_api_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_pdf_base_url() -> String {
    "https://arxiv.org/pdf".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_page_delay_ms() -> u64 {
    3000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Load configuration from an optional file, the environment and defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    Ok(config.with_storage_override(std::env::var(STORAGE_PATH_ENV).ok()))
}
