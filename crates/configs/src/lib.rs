use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0} is not set")]
    MissingConfig(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("cannot read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

/// Location of the holiday file. Used for both loading and persisting.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

#[derive(Clone, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub api_key: String,
}

// keep the secret out of logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig").field("api_key", &"***").finish()
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_data_file() -> PathBuf { PathBuf::from("feriados.json") }

/// Parse a TOML document into an `AppConfig` without applying env overrides.
pub fn from_toml_str(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read the config file named by `CONFIG_PATH` (default `config.toml`).
/// A missing file is not an error: defaults plus environment apply.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => from_toml_str(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(%path, "config file not found; using defaults and environment");
            Ok(AppConfig::default())
        }
        Err(source) => Err(ConfigError::Read { path, source }),
    }
}

impl AppConfig {
    /// Load from file, overlay process environment, then validate.
    pub fn load_and_validate() -> Result<Self, ConfigError> {
        let mut cfg = load_default()?;
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Overlay values from an environment lookup. Non-empty env values win over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(host) = get("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = get("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(path) = get("FERIADOS_FILE") {
            self.directory.data_file = PathBuf::from(path);
        }
        if let Some(key) = get("API_KEY") {
            self.auth.api_key = key;
        }
    }

    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.server.normalize()?;
        if self.directory.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("directory.data_file must not be empty".into()));
        }
        if self.auth.api_key.trim().is_empty() {
            return Err(ConfigError::MissingConfig("API_KEY"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("server.port must be in 1..=65535".into()));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
