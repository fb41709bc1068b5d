//! Application state for the gateway API

use std::sync::Arc;

use bag_core::ProviderConfiguration;

use crate::gateway::Gateway;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    /// State with a default gateway around an already resolved provider
    pub fn from_config(config: ProviderConfiguration) -> Self {
        Self::new(Gateway::new(config))
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}
