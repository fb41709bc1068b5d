//! Content negotiation and response shaping
//!
//! Three formats are recognized by exact, case-sensitive match on the
//! `Accept` header. Anything else gets HAL.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bag_core::{Address, Postcode};
use serde::Serialize;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_JSON_LD: &str = "application/ld+json";
pub const CONTENT_TYPE_HAL_JSON: &str = "application/hal+json";

/// Negotiated output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    JsonLd,
    HalJson,
}

impl Format {
    /// Pick the format for an `Accept` header value
    pub fn negotiate(accept: Option<&str>) -> Self {
        match accept {
            Some(CONTENT_TYPE_JSON) => Format::Json,
            Some(CONTENT_TYPE_JSON_LD) => Format::JsonLd,
            _ => Format::HalJson,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Json => CONTENT_TYPE_JSON,
            Format::JsonLd => CONTENT_TYPE_JSON_LD,
            Format::HalJson => CONTENT_TYPE_HAL_JSON,
        }
    }
}

/// Hydra collection, for JSON-LD clients
#[derive(Debug, Serialize)]
pub struct HydraCollection {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@id")]
    pub id: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "hydra:member")]
    pub member: Vec<Address>,
    #[serde(rename = "hydra:totalItems")]
    pub total_items: usize,
}

/// Plain collection with a self link, for JSON and HAL clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCollection {
    pub adressen: Vec<Address>,
    pub total_items: usize,
    pub items_per_page: usize,
    #[serde(rename = "_links")]
    pub links: SelfLink,
}

#[derive(Debug, Serialize)]
pub struct SelfLink {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// What goes on the wire
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Item(Address),
    Hydra(HydraCollection),
    Collection(AddressCollection),
}

/// A shaped response, tagged with the format it was shaped for
#[derive(Debug)]
pub struct ResponseEnvelope {
    pub format: Format,
    pub payload: Payload,
}

impl ResponseEnvelope {
    /// A single address, passed through as is
    pub fn item(format: Format, address: Address) -> Self {
        Self {
            format,
            payload: Payload::Item(address),
        }
    }

    /// Result of a tuple lookup.
    ///
    /// There is no paging: `itemsPerPage` always equals `totalItems`.
    pub fn collection(
        format: Format,
        addresses: Vec<Address>,
        house_number: u32,
        postcode: &Postcode,
    ) -> Self {
        let total_items = addresses.len();
        let payload = match format {
            Format::JsonLd => Payload::Hydra(HydraCollection {
                context: "/contexts/Adres",
                id: "/adressen",
                kind: "hydra:Collection",
                member: addresses,
                total_items,
            }),
            Format::Json | Format::HalJson => Payload::Collection(AddressCollection {
                adressen: addresses,
                total_items,
                items_per_page: total_items,
                links: SelfLink {
                    self_link: format!(
                        "/adressen?huisnummer={}&postcode={}",
                        house_number, postcode
                    ),
                },
            }),
        };
        Self { format, payload }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.payload) {
            Ok(body) => (
                StatusCode::OK,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(self.format.content_type()),
                )],
                body,
            )
                .into_response(),
            Err(e) => {
                crate::error::ApiError::Internal(format!("Failed to serialize response: {}", e))
                    .into_response()
            }
        }
    }
}
