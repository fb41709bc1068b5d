//! The three registry backends
//!
//! All of them speak HAL+JSON over HTTPS and differ in resource names,
//! identifier fields and search parameters.

use async_trait::async_trait;
use bag_core::{Address, AddressProvider, Postcode, ProviderKind, ProviderResult};

use crate::client::RegistryClient;
use crate::records::{map_collection, map_record, RecordLayout};

async fn fetch_one(
    client: &RegistryClient,
    resource: &str,
    id: &str,
    layout: &RecordLayout,
) -> ProviderResult<Address> {
    let url = client.resource_url(&[resource, id], &[])?;
    let body = client.get_json(url, &format!("bagid {}", id)).await?;
    map_record(&body, layout)
}

async fn search(
    client: &RegistryClient,
    resource: &str,
    query: &[(&str, String)],
    context: String,
    layout: &RecordLayout,
) -> ProviderResult<Vec<Address>> {
    let url = client.resource_url(&[resource], query)?;
    let body = client.get_json(url, &context).await?;
    let addresses = map_collection(&body, layout)?;
    tracing::debug!(count = addresses.len(), %context, "Registry search returned");
    Ok(addresses)
}

fn tuple_context(house_number: u32, postcode: &Postcode) -> String {
    format!("huisnummer {}, postcode {}", house_number, postcode)
}

// =============================================================================
// Kadaster BAG API v1
// =============================================================================

const KADASTER_LAYOUT: RecordLayout = RecordLayout {
    id_field: "identificatiecode",
    embedded_key: "nummeraanduidingen",
};

/// Kadaster BAG API v1 (`bag.basisregistraties.overheid.nl`).
///
/// Addresses are exposed as `nummeraanduidingen`.
pub struct KadasterProvider {
    client: RegistryClient,
}

impl KadasterProvider {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AddressProvider for KadasterProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kadaster
    }

    async fn get_by_id(&self, id: &str) -> ProviderResult<Address> {
        fetch_one(&self.client, "nummeraanduidingen", id, &KADASTER_LAYOUT).await
    }

    async fn get_by_tuple(
        &self,
        house_number: u32,
        postcode: &Postcode,
    ) -> ProviderResult<Vec<Address>> {
        search(
            &self.client,
            "nummeraanduidingen",
            &[
                ("postcode", postcode.to_string()),
                ("huisnummer", house_number.to_string()),
            ],
            tuple_context(house_number, postcode),
            &KADASTER_LAYOUT,
        )
        .await
    }
}

// =============================================================================
// LVBAG individuele bevragingen v2
// =============================================================================

const INDIVIDUELE_LAYOUT: RecordLayout = RecordLayout {
    id_field: "nummeraanduidingIdentificatie",
    embedded_key: "adressen",
};

/// LVBAG individuele bevragingen v2 (acceptance and production)
pub struct IndividueleBevragingenProvider {
    client: RegistryClient,
}

impl IndividueleBevragingenProvider {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AddressProvider for IndividueleBevragingenProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::IndividueleBevragingen
    }

    async fn get_by_id(&self, id: &str) -> ProviderResult<Address> {
        fetch_one(&self.client, "adressen", id, &INDIVIDUELE_LAYOUT).await
    }

    async fn get_by_tuple(
        &self,
        house_number: u32,
        postcode: &Postcode,
    ) -> ProviderResult<Vec<Address>> {
        search(
            &self.client,
            "adressen",
            &[
                ("postcode", postcode.to_string()),
                ("huisnummer", house_number.to_string()),
            ],
            tuple_context(house_number, postcode),
            &INDIVIDUELE_LAYOUT,
        )
        .await
    }
}

// =============================================================================
// Haal Centraal BAG huidige bevragingen v1
// =============================================================================

const HUIDIGE_LAYOUT: RecordLayout = RecordLayout {
    id_field: "nummeraanduidingIdentificatie",
    embedded_key: "adressen",
};

/// Haal Centraal BAG huidige bevragingen v1, the default backend.
///
/// Searches ask for non-exact matches so every addition registered under the
/// house number comes back; narrowing is left to the gateway.
pub struct HuidigeBevragingenProvider {
    client: RegistryClient,
}

impl HuidigeBevragingenProvider {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AddressProvider for HuidigeBevragingenProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuidigeBevragingen
    }

    async fn get_by_id(&self, id: &str) -> ProviderResult<Address> {
        fetch_one(&self.client, "adressen", id, &HUIDIGE_LAYOUT).await
    }

    async fn get_by_tuple(
        &self,
        house_number: u32,
        postcode: &Postcode,
    ) -> ProviderResult<Vec<Address>> {
        search(
            &self.client,
            "adressen",
            &[
                ("postcode", postcode.to_string()),
                ("huisnummer", house_number.to_string()),
                ("exacteMatch", "false".to_string()),
            ],
            tuple_context(house_number, postcode),
            &HUIDIGE_LAYOUT,
        )
        .await
    }
}
