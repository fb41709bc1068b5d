//! bag-proxy - HTTP address providers
//!
//! Implements `AddressProvider` for the three Kadaster BAG registries and
//! resolves the configured registry location into the provider the gateway
//! uses for its whole lifetime.

mod client;
pub mod config;
mod providers;
mod records;

use std::sync::Arc;

use bag_core::selector::HUIDIGE_BEVRAGINGEN_LOCATION;
use bag_core::{
    AddressProvider, ProviderConfiguration, ProviderError, ProviderKind, ProviderResult,
};
use url::Url;

pub use client::{RegistryClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use config::RegistrySettings;
pub use providers::{HuidigeBevragingenProvider, IndividueleBevragingenProvider, KadasterProvider};

/// Select and construct the provider for `settings.location`.
///
/// An unrecognized location is not an error: it selects the huidige
/// bevragingen provider, which talks to the configured URL when it parses as
/// an http(s) URL and to the public huidige bevragingen endpoint otherwise.
pub fn connect(settings: &RegistrySettings) -> ProviderResult<ProviderConfiguration> {
    let kind = ProviderKind::select(&settings.location);
    if !ProviderKind::is_known_location(&settings.location)
        && settings.location != HUIDIGE_BEVRAGINGEN_LOCATION
    {
        tracing::warn!(
            location = %settings.location,
            provider = %kind,
            "Unrecognized BAG location, using fallback provider"
        );
    }

    let base_url = resolve_base_url(&settings.location)?;
    let client = RegistryClient::new(
        base_url,
        settings.api_key.as_deref(),
        settings.timeout(),
        settings.connect_timeout(),
    )?;

    let provider: Arc<dyn AddressProvider> = match kind {
        ProviderKind::Kadaster => Arc::new(KadasterProvider::new(client)),
        ProviderKind::IndividueleBevragingen => {
            Arc::new(IndividueleBevragingenProvider::new(client))
        }
        ProviderKind::HuidigeBevragingen => Arc::new(HuidigeBevragingenProvider::new(client)),
    };

    tracing::info!(location = %settings.location, provider = %kind, "Selected BAG provider");
    Ok(ProviderConfiguration::new(settings.location.clone(), provider))
}

fn resolve_base_url(location: &str) -> ProviderResult<Url> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => {
            tracing::warn!(location, "BAG location is not an http(s) URL");
            Url::parse(HUIDIGE_BEVRAGINGEN_LOCATION)
                .map_err(|e| ProviderError::Transport(format!("Invalid default location: {}", e)))
        }
    }
}
