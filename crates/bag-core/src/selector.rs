//! Provider selection from the configured registry location.
//!
//! The gateway picks its backend once, at startup, by comparing the
//! configured base URL against the known registry endpoints. Matching is
//! exact: a URL that differs by a trailing slash or scheme is not
//! recognized and falls through to the default provider.

use std::fmt;

/// Kadaster BAG API v1 ("current registry")
pub const KADASTER_V1_LOCATION: &str = "https://bag.basisregistraties.overheid.nl/api/v1/";
/// LVBAG individuele bevragingen v2, acceptance environment
pub const INDIVIDUELE_BEVRAGINGEN_ACCEPTANCE: &str =
    "https://api.bag.acceptatie.kadaster.nl/lvbag/individuelebevragingen/v2/";
/// LVBAG individuele bevragingen v2, production environment
pub const INDIVIDUELE_BEVRAGINGEN_PRODUCTION: &str =
    "https://api.bag.kadaster.nl/lvbag/individuelebevragingen/v2/";
/// Haal Centraal BAG huidige bevragingen v1, used when nothing is configured
pub const HUIDIGE_BEVRAGINGEN_LOCATION: &str =
    "https://api.bag.kadaster.nl/esd/huidigebevragingen/v1/";

/// The three interchangeable registry backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Kadaster BAG API v1
    Kadaster,
    /// LVBAG individuele bevragingen v2
    IndividueleBevragingen,
    /// Haal Centraal huidige bevragingen (fallback)
    HuidigeBevragingen,
}

impl ProviderKind {
    /// Map a configured base URL onto a provider.
    ///
    /// Never fails: anything unrecognized, including an empty string,
    /// selects [`ProviderKind::HuidigeBevragingen`].
    ///
    /// ```
    /// # use bag_core::selector::{ProviderKind, KADASTER_V1_LOCATION};
    /// assert_eq!(ProviderKind::select(KADASTER_V1_LOCATION), ProviderKind::Kadaster);
    /// assert_eq!(ProviderKind::select(""), ProviderKind::HuidigeBevragingen);
    /// ```
    pub fn select(location: &str) -> Self {
        match location {
            KADASTER_V1_LOCATION => ProviderKind::Kadaster,
            INDIVIDUELE_BEVRAGINGEN_ACCEPTANCE | INDIVIDUELE_BEVRAGINGEN_PRODUCTION => {
                ProviderKind::IndividueleBevragingen
            }
            _ => ProviderKind::HuidigeBevragingen,
        }
    }

    /// Whether `location` is one of the endpoints `select` matches explicitly
    pub fn is_known_location(location: &str) -> bool {
        matches!(
            location,
            KADASTER_V1_LOCATION
                | INDIVIDUELE_BEVRAGINGEN_ACCEPTANCE
                | INDIVIDUELE_BEVRAGINGEN_PRODUCTION
        )
    }

    /// Stable identifier used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Kadaster => "kadaster",
            ProviderKind::IndividueleBevragingen => "individuele_bevragingen",
            ProviderKind::HuidigeBevragingen => "huidige_bevragingen",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kadaster_location_selects_kadaster() {
        assert_eq!(
            ProviderKind::select(KADASTER_V1_LOCATION),
            ProviderKind::Kadaster
        );
    }

    #[test]
    fn both_individuele_environments_select_individuele() {
        assert_eq!(
            ProviderKind::select(INDIVIDUELE_BEVRAGINGEN_ACCEPTANCE),
            ProviderKind::IndividueleBevragingen
        );
        assert_eq!(
            ProviderKind::select(INDIVIDUELE_BEVRAGINGEN_PRODUCTION),
            ProviderKind::IndividueleBevragingen
        );
    }

    #[test]
    fn unrecognized_locations_fall_back() {
        for location in [
            "",
            "not a url",
            HUIDIGE_BEVRAGINGEN_LOCATION,
            // No partial matching
            "https://bag.basisregistraties.overheid.nl/api/v1",
            "http://bag.basisregistraties.overheid.nl/api/v1/",
            "https://api.bag.kadaster.nl/lvbag/individuelebevragingen/v2/adressen",
        ] {
            assert_eq!(
                ProviderKind::select(location),
                ProviderKind::HuidigeBevragingen,
                "location {:?}",
                location
            );
            assert!(!ProviderKind::is_known_location(location));
        }
    }

    #[test]
    fn display_matches_log_identifier() {
        assert_eq!(ProviderKind::Kadaster.to_string(), "kadaster");
        assert_eq!(
            ProviderKind::HuidigeBevragingen.to_string(),
            "huidige_bevragingen"
        );
    }
}
