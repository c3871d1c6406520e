//! Record extraction from rendered pages.
//!
//! This module turns the markup of listing, product, property and broker
//! pages into typed records using per-profile selector rules.

// Sub-modules
pub mod extractors;
pub mod schema;
pub mod selectors;

// Re-exports for public API
pub use extractors::{RecordExtractor, parse_document};
pub use schema::{
    BrokerRecord, Extracted, LinkRecord, PageRecords, ProductRecord, PropertyRecord,
};
pub use selectors::{SelectorRules, SiteProfile};
