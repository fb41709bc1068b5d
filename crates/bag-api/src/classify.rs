//! Request classification.
//!
//! Decides whether an incoming request is an address lookup at all, and if
//! so whether it asks for one address by identifier or for the collection of
//! addresses at a house number and postcode.
//!
//! Identifier precedence, highest first:
//! 1. `bagid` query parameter (also overrides tuple parameters; deprecated)
//! 2. final path segment, for item routes
//!
//! Suffix precedence: `huisnummer_toevoeging`, then the deprecated
//! `huisnummertoevoeging`.

use std::collections::HashMap;

use axum::http::{Method, Uri};
use bag_core::{LookupRequest, Postcode};
use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Name of the address collection route
pub const COLLECTION_ROUTE: &str = "api_adres_get_collection";
/// Name of the single-address route
pub const ITEM_ROUTE: &str = "api_adres_get_item";

/// Path segments that mark an address resource
pub const ADDRESS_SEGMENTS: &[&str] = &["addresses", "adressen"];

pub const PARAM_BAGID: &str = "bagid";
pub const PATH_ID: &str = "id";
pub const PARAM_HOUSE_NUMBER: &str = "huisnummer";
pub const PARAM_POSTCODE: &str = "postcode";
pub const PARAM_SUFFIX: &str = "huisnummer_toevoeging";
pub const PARAM_SUFFIX_DEPRECATED: &str = "huisnummertoevoeging";

/// Identifier sources, in precedence order
const ID_PARAMS: &[&str] = &[PARAM_BAGID];
/// Suffix parameters, in precedence order
const SUFFIX_PARAMS: &[&str] = &[PARAM_SUFFIX, PARAM_SUFFIX_DEPRECATED];

/// Validation failures, reported before any registry call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("Invalid {field}: '{value}'")]
    InvalidArgument { field: &'static str, value: String },
}

/// The parts of an HTTP request the classifier looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestShape {
    pub method: Method,
    /// Non-empty path segments, in order, still percent-encoded
    pub segments: Vec<String>,
    /// Matched route name, if the path is one of the address routes
    pub route: Option<&'static str>,
    /// Query parameters; for repeated keys the last value wins
    pub query: HashMap<String, String>,
}

impl RequestShape {
    pub fn from_parts(method: &Method, uri: &Uri) -> Self {
        let segments: Vec<String> = uri
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let query: HashMap<String, String> = uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self {
            method: method.clone(),
            route: route_name(&segments),
            segments,
            query,
        }
    }

    fn is_collection_route(&self) -> bool {
        self.route == Some(COLLECTION_ROUTE)
    }

    fn has_address_segment(&self) -> bool {
        self.segments
            .iter()
            .any(|s| ADDRESS_SEGMENTS.contains(&s.as_str()))
    }

    /// Non-blank query value
    fn param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    fn first_param(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.param(name))
    }
}

/// Route name for a path, mirroring the router's address routes
pub fn route_name(segments: &[String]) -> Option<&'static str> {
    match segments {
        [resource] if ADDRESS_SEGMENTS.contains(&resource.as_str()) => Some(COLLECTION_ROUTE),
        [resource, _] if ADDRESS_SEGMENTS.contains(&resource.as_str()) => Some(ITEM_ROUTE),
        _ => None,
    }
}

/// Classify a request.
///
/// `Ok(None)` means the request is not an address lookup and should pass
/// through to the rest of the router untouched.
pub fn classify(request: &RequestShape) -> Result<Option<LookupRequest>, ClassifyError> {
    let is_collection = request.is_collection_route();

    if request.method != Method::GET || (!is_collection && !request.has_address_segment()) {
        return Ok(None);
    }

    if let Some(id) = request.first_param(ID_PARAMS) {
        return Ok(Some(LookupRequest::ById { id: id.to_string() }));
    }

    if !is_collection {
        // Item lookup: the identifier is the last path segment
        let raw = request.segments.last().map(String::as_str).unwrap_or("");
        let id = decode_segment(raw)?;
        return Ok(Some(LookupRequest::ById { id }));
    }

    let house_number = parse_house_number(request.query.get(PARAM_HOUSE_NUMBER))?;
    let raw_postcode = request
        .query
        .get(PARAM_POSTCODE)
        .map(String::as_str)
        .unwrap_or("");
    let postcode = Postcode::parse(raw_postcode).map_err(|e| ClassifyError::InvalidArgument {
        field: PARAM_POSTCODE,
        value: e.0,
    })?;
    let suffix = request.first_param(SUFFIX_PARAMS).map(String::from);

    Ok(Some(LookupRequest::ByTuple {
        house_number,
        postcode,
        suffix,
    }))
}

/// Percent-decode a path segment, so ids match their query-string form
fn decode_segment(raw: &str) -> Result<String, ClassifyError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|id| id.into_owned())
        .map_err(|_| ClassifyError::InvalidArgument {
            field: PATH_ID,
            value: raw.to_string(),
        })
}

fn parse_house_number(raw: Option<&String>) -> Result<u32, ClassifyError> {
    let raw = raw.map(String::as_str).unwrap_or("");
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ClassifyError::InvalidArgument {
            field: PARAM_HOUSE_NUMBER,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape(method: Method, uri: &str) -> RequestShape {
        RequestShape::from_parts(&method, &uri.parse::<Uri>().unwrap())
    }

    fn get(uri: &str) -> Result<Option<LookupRequest>, ClassifyError> {
        classify(&shape(Method::GET, uri))
    }

    fn by_id(id: &str) -> Option<LookupRequest> {
        Some(LookupRequest::ById { id: id.to_string() })
    }

    fn by_tuple(house_number: u32, postcode: &str, suffix: Option<&str>) -> Option<LookupRequest> {
        Some(LookupRequest::ByTuple {
            house_number,
            postcode: Postcode::parse(postcode).unwrap(),
            suffix: suffix.map(String::from),
        })
    }

    fn invalid(field: &'static str, value: &str) -> ClassifyError {
        ClassifyError::InvalidArgument {
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn route_names() {
        assert_eq!(shape(Method::GET, "/addresses").route, Some(COLLECTION_ROUTE));
        assert_eq!(shape(Method::GET, "/adressen/").route, Some(COLLECTION_ROUTE));
        assert_eq!(shape(Method::GET, "/addresses/X1").route, Some(ITEM_ROUTE));
        assert_eq!(shape(Method::GET, "/health").route, None);
        assert_eq!(shape(Method::GET, "/v1/addresses/X1").route, None);
    }

    #[test]
    fn non_get_is_not_applicable() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::HEAD] {
            assert_eq!(classify(&shape(method, "/addresses?huisnummer=1")), Ok(None));
        }
    }

    #[test]
    fn unrelated_paths_are_not_applicable() {
        assert_eq!(get("/health"), Ok(None));
        assert_eq!(get("/streets/12"), Ok(None));
        assert_eq!(get("/"), Ok(None));
    }

    #[test]
    fn item_route_uses_last_segment() {
        assert_eq!(get("/addresses/XYZ123"), Ok(by_id("XYZ123")));
        assert_eq!(get("/adressen/0363200000123456"), Ok(by_id("0363200000123456")));
    }

    #[test]
    fn item_segment_is_percent_decoded() {
        assert_eq!(get("/addresses/a%20b"), Ok(by_id("a b")));
        assert_eq!(get("/addresses/a%20b"), get("/addresses?bagid=a%20b"));
        // `+` is only a space in query strings
        assert_eq!(get("/adressen/a+b"), Ok(by_id("a+b")));
    }

    #[test]
    fn undecodable_item_segment_is_rejected() {
        assert_eq!(get("/addresses/%FF%FE"), Err(invalid("id", "%FF%FE")));
    }

    #[test]
    fn address_segment_anywhere_means_id_lookup() {
        assert_eq!(get("/api/addresses/ABC"), Ok(by_id("ABC")));
    }

    #[test]
    fn bagid_beats_path_segment() {
        assert_eq!(get("/addresses/XYZ123?bagid=OTHER"), Ok(by_id("OTHER")));
    }

    #[test]
    fn bagid_overrides_tuple_parameters() {
        assert_eq!(
            get("/addresses?bagid=0363&huisnummer=abc&postcode=1"),
            Ok(by_id("0363"))
        );
    }

    #[test]
    fn blank_bagid_is_ignored() {
        assert_eq!(
            get("/addresses?bagid=%20&huisnummer=12&postcode=1234AB"),
            Ok(by_tuple(12, "1234AB", None))
        );
    }

    #[test]
    fn tuple_lookup_normalizes_postcode() {
        assert_eq!(
            get("/addresses?huisnummer=12&postcode=12%2034ab"),
            Ok(by_tuple(12, "1234AB", None))
        );
        assert_eq!(
            get("/addresses?huisnummer=12&postcode=+1234+Ab+"),
            Ok(by_tuple(12, "1234AB", None))
        );
    }

    #[test]
    fn postcode_must_have_six_characters() {
        assert_eq!(
            get("/addresses?huisnummer=12&postcode=1234%20A"),
            Err(invalid("postcode", "1234A"))
        );
        assert_eq!(get("/addresses?huisnummer=12"), Err(invalid("postcode", "")));
    }

    #[test]
    fn house_number_must_be_a_positive_integer() {
        for raw in ["0", "-3", "abc", "12a", "1.5", ""] {
            let uri = format!("/addresses?huisnummer={}&postcode=1234AB", raw);
            assert_eq!(get(&uri), Err(invalid("huisnummer", raw)), "huisnummer {:?}", raw);
        }
        assert_eq!(
            get("/addresses?postcode=1234AB"),
            Err(invalid("huisnummer", ""))
        );
    }

    #[test]
    fn house_number_is_checked_before_postcode() {
        assert_eq!(get("/addresses?huisnummer=x&postcode=1"), Err(invalid("huisnummer", "x")));
    }

    #[test]
    fn suffix_parameter_precedence() {
        assert_eq!(
            get("/addresses?huisnummer=12&postcode=1234AB&huisnummer_toevoeging=A&huisnummertoevoeging=B"),
            Ok(by_tuple(12, "1234AB", Some("A")))
        );
        assert_eq!(
            get("/addresses?huisnummer=12&postcode=1234AB&huisnummertoevoeging=B"),
            Ok(by_tuple(12, "1234AB", Some("B")))
        );
        // Blank primary falls through to the deprecated alias
        assert_eq!(
            get("/addresses?huisnummer=12&postcode=1234AB&huisnummer_toevoeging=&huisnummertoevoeging=B"),
            Ok(by_tuple(12, "1234AB", Some("B")))
        );
    }

    #[test]
    fn whitespace_suffix_is_absent() {
        assert_eq!(
            get("/addresses?huisnummer=12&postcode=1234AB&huisnummer_toevoeging=%20%20"),
            Ok(by_tuple(12, "1234AB", None))
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let request = shape(
            Method::GET,
            "/adressen?huisnummer=7&postcode=9999zz&huisnummertoevoeging=bis",
        );
        assert_eq!(classify(&request), classify(&request));
    }

    #[test]
    fn repeated_query_key_last_wins() {
        assert_eq!(
            get("/addresses?huisnummer=1&huisnummer=2&postcode=1234AB"),
            Ok(by_tuple(2, "1234AB", None))
        );
    }
}
