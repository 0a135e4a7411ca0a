//! Service configuration loaded from the environment

use std::collections::HashMap;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::middleware::CorsPolicy;

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// HTTP server configuration
///
/// # Environment Variables
/// - `HOST`: listen address (default: "0.0.0.0")
/// - `PORT`: listen port (default: 3000)
/// - `STORAGE_BACKEND`: "postgres" or "memory" (default: "postgres")
/// - `ALLOWED_ORIGINS`: comma-separated origins allowed in addition to the
///   development origin and the platform suffix
/// - `ALLOWED_ORIGIN_SUFFIX`: deployment platform domain (default: ".netlify.app")
/// - `DEV_ORIGIN`: development client origin (default: "http://localhost:5173")
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub allowed_origins: Vec<String>,
    pub allowed_origin_suffix: String,
    pub dev_origin: String,
}

impl ServerConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(None)
    }

    /// Load configuration from an explicit variable map, or the process
    /// environment when `source` is `None`
    pub fn from_source(source: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("storage_backend", "postgres")?
            .set_default("allowed_origins", Vec::<String>::new())?
            .set_default("allowed_origin_suffix", ".netlify.app")?
            .set_default("dev_origin", "http://localhost:5173")?
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .ignore_empty(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins")
                    .source(source),
            )
            .build()?
            .try_deserialize()
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_policy(&self) -> CorsPolicy {
        CorsPolicy::new(
            self.dev_origin.clone(),
            self.allowed_origin_suffix.clone(),
            self.allowed_origins.clone(),
        )
    }
}
