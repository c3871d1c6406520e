use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ExtractionGap;
use crate::page_identity::PageIdentity;

/// A detail-page reference discovered on a listing page.
///
/// Serialized flat as `{id, slug, path, scraped}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(flatten)]
    pub identity: PageIdentity,
    /// Set once the detail page has been fetched successfully
    #[serde(default)]
    pub scraped: bool,
}

impl LinkRecord {
    #[must_use]
    pub fn new(identity: PageIdentity) -> Self {
        Self {
            identity,
            scraped: false,
        }
    }
}

/// Attributes of a catalog product page.
///
/// `title`, `size` and `price` are `None` when the page lacks them; they
/// still serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(flatten)]
    pub identity: PageIdentity,
    pub title: Option<String>,
    pub size: Option<String>,
    /// `itemprop` name → displayed value, e.g. `price` → `21.00`
    pub price: Option<BTreeMap<String, String>>,
}

/// One property tile of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(rename = "property-name")]
    pub name: Option<String>,
    #[serde(rename = "property-price")]
    pub price: Option<String>,
    #[serde(rename = "property-details")]
    pub details: Option<String>,
    /// Absolute URL of the property detail page
    #[serde(rename = "property_link")]
    pub link: Option<String>,
}

/// A broker block of a property detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerRecord {
    pub name: String,
    /// Logo image sources in document order; empty when none
    pub logos: Vec<String>,
    /// Detail page the broker was listed on
    #[serde(rename = "property_link")]
    pub page: String,
}

/// Every record extracted from one page, grouped by kind.
///
/// A failed or timed-out task carries `PageRecords::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecords {
    pub links: Vec<LinkRecord>,
    pub products: Vec<ProductRecord>,
    pub properties: Vec<PropertyRecord>,
    pub brokers: Vec<BrokerRecord>,
}

impl PageRecords {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
            && self.products.is_empty()
            && self.properties.is_empty()
            && self.brokers.is_empty()
    }
}

/// Records of one extractor together with the gaps it recovered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    pub records: T,
    pub gaps: Vec<ExtractionGap>,
}

impl<T: Default> Default for Extracted<T> {
    fn default() -> Self {
        Self {
            records: T::default(),
            gaps: Vec::new(),
        }
    }
}
