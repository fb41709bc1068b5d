//! Address registry data model

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Length of a Dutch postal code once whitespace is removed ("1234AB")
pub const POSTCODE_LEN: usize = 6;

/// Raised when a postal code does not normalize to six characters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid postcode: '{0}'")]
pub struct InvalidPostcode(pub String);

/// A normalized postal code: exactly six characters, uppercase, no whitespace.
///
/// ```
/// # use bag_core::Postcode;
/// assert_eq!(Postcode::parse(" 12 34ab ").unwrap().as_str(), "1234AB");
/// assert!(Postcode::parse("12 34").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Postcode(String);

impl Postcode {
    /// Strip all whitespace, upper-case, and require exactly six characters
    pub fn parse(raw: &str) -> Result<Self, InvalidPostcode> {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        let normalized = normalized.trim();

        if normalized.chars().count() != POSTCODE_LEN {
            return Err(InvalidPostcode(normalized.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Postcode {
    type Error = InvalidPostcode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Postcode> for String {
    fn from(value: Postcode) -> Self {
        value.0
    }
}

/// One registry record, as returned by an [`AddressProvider`](crate::AddressProvider).
///
/// Registry fields the gateway does not interpret (street name, city,
/// geometry, ...) travel in `extra` and are serialized inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Registry identifier (nummeraanduiding identificatie)
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<Postcode>,
    #[serde(rename = "huisnummer")]
    pub house_number: u32,
    #[serde(
        rename = "huisnummertoevoeging",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub suffix: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Address {
    pub fn new(id: impl Into<String>, house_number: u32) -> Self {
        Self {
            id: id.into(),
            postcode: None,
            house_number,
            suffix: None,
            extra: Map::new(),
        }
    }

    pub fn with_postcode(mut self, postcode: Postcode) -> Self {
        self.postcode = Some(postcode);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Attach an opaque registry field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A normalized address query.
///
/// `ById` wins whenever an identifier was supplied, even alongside tuple
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupRequest {
    ById {
        id: String,
    },
    ByTuple {
        house_number: u32,
        postcode: Postcode,
        suffix: Option<String>,
    },
}

impl fmt::Display for LookupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupRequest::ById { id } => write!(f, "bagid {}", id),
            LookupRequest::ByTuple {
                house_number,
                postcode,
                suffix: Some(suffix),
            } => write!(
                f,
                "huisnummer {}, postcode {}, toevoeging {}",
                house_number, postcode, suffix
            ),
            LookupRequest::ByTuple {
                house_number,
                postcode,
                suffix: None,
            } => write!(f, "huisnummer {}, postcode {}", house_number, postcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn postcode_strips_inner_and_outer_whitespace() {
        assert_eq!(Postcode::parse("1234 ab").unwrap().as_str(), "1234AB");
        assert_eq!(Postcode::parse("\t12 34\nAb ").unwrap().as_str(), "1234AB");
    }

    #[test]
    fn postcode_rejects_wrong_length() {
        assert_eq!(Postcode::parse("1234A"), Err(InvalidPostcode("1234A".into())));
        assert_eq!(
            Postcode::parse("1234 ABC"),
            Err(InvalidPostcode("1234ABC".into()))
        );
        assert!(Postcode::parse("").is_err());
        assert!(Postcode::parse("      ").is_err());
    }

    #[test]
    fn postcode_deserialization_normalizes() {
        let pc: Postcode = serde_json::from_value(json!("9999 zz")).unwrap();
        assert_eq!(pc.as_str(), "9999ZZ");
        assert!(serde_json::from_value::<Postcode>(json!("99")).is_err());
    }

    #[test]
    fn address_serializes_with_registry_names() {
        let address = Address::new("0363200000123456", 12)
            .with_postcode(Postcode::parse("1234AB").unwrap())
            .with_suffix("A")
            .with_field("straat", "Dorpsstraat");

        assert_eq!(
            serde_json::to_value(&address).unwrap(),
            json!({
                "id": "0363200000123456",
                "postcode": "1234AB",
                "huisnummer": 12,
                "huisnummertoevoeging": "A",
                "straat": "Dorpsstraat"
            })
        );
    }

    #[test]
    fn address_without_optional_fields() {
        let value = serde_json::to_value(Address::new("X", 1)).unwrap();
        assert_eq!(value, json!({ "id": "X", "huisnummer": 1 }));
    }

    #[test]
    fn lookup_display_includes_tuple() {
        let lookup = LookupRequest::ByTuple {
            house_number: 12,
            postcode: Postcode::parse("1234AB").unwrap(),
            suffix: None,
        };
        assert_eq!(lookup.to_string(), "huisnummer 12, postcode 1234AB");
    }
}
