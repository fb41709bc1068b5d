//! Address gateway - classifies, looks up, filters and shapes

use std::time::Duration;

use bag_core::{filter_by_suffix, LookupRequest, ProviderConfiguration, ProviderError};
use tracing::{debug, info, instrument};

use crate::classify::{classify, RequestShape};
use crate::error::ApiError;
use crate::render::{Format, ResponseEnvelope};

/// Default upper bound for a single registry lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// The single entry point for address requests.
///
/// Holds the provider chosen at startup; never re-reads configuration.
#[derive(Debug, Clone)]
pub struct Gateway {
    config: ProviderConfiguration,
    lookup_timeout: Duration,
}

impl Gateway {
    pub fn new(config: ProviderConfiguration) -> Self {
        Self {
            config,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn config(&self) -> &ProviderConfiguration {
        &self.config
    }

    /// Handle one request.
    ///
    /// Returns `Ok(None)` when the request is not an address lookup.
    /// Validation errors are returned before the registry is contacted;
    /// registry errors are returned as they come, without retry.
    pub async fn handle(
        &self,
        request: &RequestShape,
        accept: Option<&str>,
    ) -> Result<Option<ResponseEnvelope>, ApiError> {
        let Some(lookup) = classify(request)? else {
            return Ok(None);
        };
        let format = Format::negotiate(accept);

        self.lookup(lookup, format).await.map(Some)
    }

    #[instrument(skip(self), fields(provider = %self.config.kind()))]
    async fn lookup(
        &self,
        lookup: LookupRequest,
        format: Format,
    ) -> Result<ResponseEnvelope, ApiError> {
        let provider = self.config.provider();
        let context = lookup.to_string();

        match lookup {
            LookupRequest::ById { id } => {
                let address = self.bounded(&context, provider.get_by_id(&id)).await?;
                debug!(%id, "Address found");
                Ok(ResponseEnvelope::item(format, address))
            }
            LookupRequest::ByTuple {
                house_number,
                postcode,
                suffix,
            } => {
                let mut addresses = self
                    .bounded(&context, provider.get_by_tuple(house_number, &postcode))
                    .await?;
                let candidates = addresses.len();

                if let Some(suffix) = suffix.as_deref() {
                    addresses = filter_by_suffix(addresses, suffix);
                }
                info!(
                    candidates,
                    matched = addresses.len(),
                    "Address collection lookup"
                );

                Ok(ResponseEnvelope::collection(
                    format,
                    addresses,
                    house_number,
                    &postcode,
                ))
            }
        }
    }

    async fn bounded<T>(
        &self,
        context: &str,
        call: impl std::future::Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        tokio::time::timeout(self.lookup_timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout(context.to_string()))?
    }
}
