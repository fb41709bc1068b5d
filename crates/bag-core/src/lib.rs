//! bag-core - Core traits and types for the BAG address gateway
//!
//! This crate provides the abstractions that allow the different national
//! address registry backends (Kadaster BAG API v1, LVBAG individuele
//! bevragingen, Haal Centraal huidige bevragingen) to serve the same gateway.

pub mod error;
pub mod models;
pub mod provider;
pub mod selector;
pub mod suffix;

pub use error::{ProviderError, ProviderResult};
pub use models::{Address, InvalidPostcode, LookupRequest, Postcode};
pub use provider::{AddressProvider, ProviderConfiguration};
pub use selector::ProviderKind;
pub use suffix::{filter_by_suffix, normalize_suffix};
