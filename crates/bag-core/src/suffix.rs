//! House-number suffix matching.
//!
//! Registries spell additions inconsistently ("a", "A ", "3-A"), so a
//! tuple lookup with a suffix keeps every candidate whose normalized suffix
//! equals the query or contains it.

use crate::models::Address;

/// Remove all whitespace and lower-case.
///
/// ```
/// # use bag_core::normalize_suffix;
/// assert_eq!(normalize_suffix(" 3 - A "), "3-a");
/// ```
pub fn normalize_suffix(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keep the addresses whose suffix matches `query`, preserving input order.
///
/// A match is normalized equality or normalized substring. Equality is
/// already covered by the substring test; both are kept so the rule reads
/// the same as the registry documentation until confirmed against real
/// data. Addresses without a suffix compare as the empty string.
pub fn filter_by_suffix(addresses: Vec<Address>, query: &str) -> Vec<Address> {
    let wanted = normalize_suffix(query);

    addresses
        .into_iter()
        .filter(|address| {
            let own = normalize_suffix(address.suffix.as_deref().unwrap_or(""));
            own == wanted || own.contains(&wanted)
        })
        .collect()
}
