//! AddressProvider trait - the abstraction over the address registries

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::models::{Address, Postcode};
use crate::selector::ProviderKind;

/// A backend that can answer address queries.
///
/// Implementations talk to one external registry. The gateway holds exactly
/// one provider for its whole lifetime and shares it read-only between
/// concurrent requests, hence `Send + Sync`.
///
/// Calls are not retried by the gateway. Dropping the returned future
/// cancels the in-flight registry request.
#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Which registry flavour this provider talks to
    fn kind(&self) -> ProviderKind;

    /// Fetch a single address by its registry identifier
    async fn get_by_id(&self, id: &str) -> ProviderResult<Address>;

    /// Fetch every address registered under a house number and postcode.
    ///
    /// Suffix narrowing happens in the gateway, so all additions for the
    /// house number are expected back.
    async fn get_by_tuple(
        &self,
        house_number: u32,
        postcode: &Postcode,
    ) -> ProviderResult<Vec<Address>>;
}

/// The process-wide provider choice: the configured location and the
/// provider resolved from it.
///
/// Built once at startup and shared read-only by all requests.
#[derive(Clone)]
pub struct ProviderConfiguration {
    location: String,
    provider: Arc<dyn AddressProvider>,
}

impl ProviderConfiguration {
    pub fn new(location: impl Into<String>, provider: Arc<dyn AddressProvider>) -> Self {
        Self {
            location: location.into(),
            provider,
        }
    }

    /// The registry base URL as configured (not as resolved)
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn provider(&self) -> &Arc<dyn AddressProvider> {
        &self.provider
    }

    pub fn kind(&self) -> ProviderKind {
        self.provider.kind()
    }
}

impl std::fmt::Debug for ProviderConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfiguration")
            .field("location", &self.location)
            .field("kind", &self.kind())
            .finish()
    }
}
