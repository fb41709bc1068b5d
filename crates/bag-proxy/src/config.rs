//! Registry connection settings

use std::time::Duration;

use bag_core::selector::HUIDIGE_BEVRAGINGEN_LOCATION;
use serde::Deserialize;

use crate::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};

/// `[bag]` section of the gateway configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Registry base URL; decides which provider is used
    pub location: String,
    /// Sent as `X-Api-Key` when set
    pub api_key: Option<String>,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            location: HUIDIGE_BEVRAGINGEN_LOCATION.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl RegistrySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let settings: RegistrySettings = serde_json::from_str(r#"{"api_key": "secret"}"#).unwrap();
        assert_eq!(settings.location, HUIDIGE_BEVRAGINGEN_LOCATION);
        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
    }
}
