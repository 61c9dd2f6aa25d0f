//! Demo configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `ARTICLE_SEARCH_*` environment variables (a `.env` file is loaded first if
//! present). With nothing set, the defaults reproduce the demo's fixed
//! settings exactly.

use article_search_opensearch::{ClientConfig, DEFAULT_URL};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "ARTICLE_SEARCH";

/// File read from the working directory when `ARTICLE_SEARCH_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "article-search.toml";

/// Index the demo creates and queries.
pub const DEFAULT_INDEX: &str = "simply-recipes";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment variable held a value of the wrong shape.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },

    /// The config file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A `.env` file exists but could not be loaded.
    #[error("Failed to load .env file: {0}")]
    EnvFile(dotenvy::Error),

    /// The assembled configuration is unusable.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which search backend the demo talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// A real OpenSearch/Elasticsearch node over HTTP.
    #[default]
    OpenSearch,
    /// Dry run against the in-process backend; no server is contacted.
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "opensearch" | "elasticsearch" | "http" => Ok(BackendKind::OpenSearch),
            "memory" | "embedded" => Ok(BackendKind::Memory),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}

/// Settings for one demo run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Search service endpoint.
    pub url: String,
    /// Index to create and query.
    pub index: String,
    /// Shard count for the created index.
    pub shards: u32,
    /// Replica count for the created index.
    pub replicas: u32,
    /// Insert the sample articles before querying.
    pub seed_data: bool,
    /// Backend selection.
    pub backend: BackendKind,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            index: DEFAULT_INDEX.to_string(),
            shards: 1,
            replicas: 1,
            seed_data: false,
            backend: BackendKind::OpenSearch,
            username: None,
            password: None,
            request_timeout_secs: 30,
        }
    }
}

impl DemoConfig {
    /// Load from `.env`, the config file and the process environment.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::EnvFile(e)),
        }

        let explicit = env::var(format!("{}_CONFIG", ENV_PREFIX)).ok();
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from `ARTICLE_SEARCH_*` variables found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{}_{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, url)) = var("URL") {
            self.url = url;
        }
        if let Some((_, index)) = var("INDEX") {
            self.index = index;
        }
        if let Some((key, value)) = var("SHARDS") {
            self.shards = parse(&key, &value)?;
        }
        if let Some((key, value)) = var("REPLICAS") {
            self.replicas = parse(&key, &value)?;
        }
        if let Some((key, value)) = var("SEED_DATA") {
            self.seed_data = parse_flag(&key, &value)?;
        }
        if let Some((key, value)) = var("BACKEND") {
            self.backend = parse(&key, &value)?;
        }
        if let Some((_, username)) = var("USERNAME") {
            self.username = Some(username);
        }
        if let Some((_, password)) = var("PASSWORD") {
            self.password = Some(password);
        }
        if let Some((key, value)) = var("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse(&key, &value)?;
        }

        Ok(())
    }

    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(ConfigError::Validation("index must not be empty".to_string()));
        }
        if self.shards == 0 {
            return Err(ConfigError::Validation("shards must be at least 1".to_string()));
        }
        if self.backend == BackendKind::OpenSearch
            && !(self.url.starts_with("http://") || self.url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "url must start with http:// or https://, got {:?}",
                self.url
            )));
        }
        Ok(())
    }

    /// Connection settings for the HTTP client.
    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new(&self.url, &self.index)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs));

        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            client = client.with_basic_auth(user, pass);
        }

        client
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
