//! Configuration file handling for bagd

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use bag_proxy::RegistrySettings;
use serde::Deserialize;
use tokio::net::TcpListener;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 18080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound for one registry lookup, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ServerSettings {
    /// Bind the listener; `host` may be a name, an IPv4 or a bare IPv6 address
    pub async fn bind(&self) -> Result<TcpListener> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        TcpListener::bind((host, self.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", self.host, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Daemon configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerSettings,
    pub bag: RegistrySettings,
}

/// Values given on the command line or through the environment
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub location: Option<&'a str>,
    pub api_key: Option<&'a str>,
    pub port: Option<u16>,
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Reject values that would make every lookup fail
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.server.request_timeout_secs > 0,
            "[server] request_timeout_secs must be greater than 0"
        );
        ensure!(
            self.bag.timeout_secs > 0,
            "[bag] timeout_secs must be greater than 0"
        );
        ensure!(
            self.bag.connect_timeout_secs > 0,
            "[bag] connect_timeout_secs must be greater than 0"
        );
        Ok(())
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply CLI/env values over file values
    pub fn merge(mut self, overrides: Overrides<'_>) -> Self {
        if let Some(location) = overrides.location {
            self.bag.location = location.to_string();
        }
        if let Some(api_key) = overrides.api_key {
            self.bag.api_key = Some(api_key.to_string());
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        self
    }
}
