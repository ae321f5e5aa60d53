use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Per-connection timeout in seconds
    pub request_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Served root directory; created at startup when missing
    pub root: String,
    /// Default document substituted for a bare `/` request
    pub index: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
}

impl Config {
    /// Load configuration from `config.toml` (optional) and
    /// `SERVER`-prefixed environment variables, with defaults for every key.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.request_timeout", 30)?
            .set_default("files.root", "public")?
            .set_default("files.index", "index.html")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Shared per-process state: the configuration and the canonicalized served
/// root. Both are immutable after startup and safe to share across request
/// tasks.
pub struct AppState {
    pub config: Config,
    pub root: PathBuf,
}

impl AppState {
    #[must_use]
    pub const fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }
}
