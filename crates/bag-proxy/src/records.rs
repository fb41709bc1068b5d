//! Mapping of registry HAL records onto [`Address`]

use bag_core::{Address, Postcode, ProviderError, ProviderResult};
use serde_json::{Map, Value};

/// Where a registry keeps the fields the gateway interprets
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecordLayout {
    /// Field holding the address identifier
    pub id_field: &'static str,
    /// Key under `_embedded` holding search results
    pub embedded_key: &'static str,
}

const HOUSE_NUMBER: &str = "huisnummer";
const POSTCODE: &str = "postcode";
const HOUSE_LETTER: &str = "huisletter";
const ADDITION: &str = "huisnummertoevoeging";

/// Keys never copied into the pass-through payload
const CONSUMED: &[&str] = &[
    "id",
    HOUSE_NUMBER,
    POSTCODE,
    HOUSE_LETTER,
    ADDITION,
    "_links",
    "_embedded",
];

/// Map a single registry record
pub(crate) fn map_record(record: &Value, layout: &RecordLayout) -> ProviderResult<Address> {
    let object = record
        .as_object()
        .ok_or_else(|| ProviderError::Malformed("address record is not an object".to_string()))?;

    let id = match object.get(layout.id_field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(ProviderError::Malformed(format!(
                "address record without '{}'",
                layout.id_field
            )))
        }
    };

    let house_number = object
        .get(HOUSE_NUMBER)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ProviderError::Malformed(format!("address {} without huisnummer", id)))?;

    let postcode = match object.get(POSTCODE).and_then(Value::as_str) {
        Some(raw) => match Postcode::parse(raw) {
            Ok(pc) => Some(pc),
            Err(e) => {
                tracing::warn!(address = %id, error = %e, "Dropping unusable registry postcode");
                None
            }
        },
        None => None,
    };

    let mut address = Address::new(id, house_number);
    address.postcode = postcode;
    address.suffix = compose_suffix(
        object.get(HOUSE_LETTER).and_then(Value::as_str),
        object.get(ADDITION).and_then(Value::as_str),
    );
    address.extra = passthrough(object, layout);

    Ok(address)
}

/// Map the `_embedded.<key>` array of a search response.
///
/// Registries leave `_embedded` out entirely when nothing matched.
pub(crate) fn map_collection(body: &Value, layout: &RecordLayout) -> ProviderResult<Vec<Address>> {
    let Some(embedded) = body.get("_embedded") else {
        return Ok(Vec::new());
    };

    let records = embedded
        .get(layout.embedded_key)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ProviderError::Malformed(format!("_embedded.{} is not a list", layout.embedded_key))
        })?;

    records.iter().map(|r| map_record(r, layout)).collect()
}

/// House letter and addition combined, e.g. `A` + `3` gives `A-3`
fn compose_suffix(letter: Option<&str>, addition: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [letter, addition]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("-"))
    }
}

fn passthrough(object: &Map<String, Value>, layout: &RecordLayout) -> Map<String, Value> {
    object
        .iter()
        .filter(|(key, _)| key.as_str() != layout.id_field && !CONSUMED.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
