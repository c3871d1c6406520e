//! Selector rules per page type.
//!
//! Rules are plain strings so they can live in the serialized config; they
//! are compiled once when a [`RecordExtractor`](super::RecordExtractor) is built.

use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::HarvestError;

/// Which site family a run targets.
///
/// - `Catalog`: listing pages link to `<prefix>/<id>-<slug>` product pages.
/// - `Property`: listing pages hold property tiles whose detail pages list brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteProfile {
    Catalog,
    Property,
}

impl fmt::Display for SiteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Property => write!(f, "property"),
        }
    }
}

impl FromStr for SiteProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "property" => Ok(Self::Property),
            other => Err(format!("unknown site profile '{other}' (expected catalog|property)")),
        }
    }
}

/// CSS selectors used by the extractors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorRules {
    pub product_title: String,
    pub product_size: String,
    pub product_price_block: String,
    /// Element inside the price block whose children carry `itemprop`
    pub product_price_list: String,

    pub property_tile: String,
    pub property_name: String,
    pub property_price: String,
    pub property_details: String,
    pub property_link: String,

    pub broker_block: String,
    pub broker_name: String,
    pub broker_logo: String,
}

impl Default for SelectorRules {
    fn default() -> Self {
        Self {
            product_title: ".design-title".to_string(),
            product_size: "#fabric-size".to_string(),
            product_price_block: ".b-item-price".to_string(),
            product_price_list: ".visuallyhidden".to_string(),
            property_tile: "crx-property-tile-aggregate.ng-star-inserted".to_string(),
            property_name: "div.property-name".to_string(),
            property_price: "div.property-price".to_string(),
            property_details: "div.property-details".to_string(),
            property_link: "a.cover-link".to_string(),
            broker_block: ".broker-info".to_string(),
            broker_name: ".broker-name".to_string(),
            broker_logo: "img.broker-logo".to_string(),
        }
    }
}

fn compile(rule: &str, name: &str) -> Result<Selector, HarvestError> {
    Selector::parse(rule)
        .map_err(|e| HarvestError::Config(format!("invalid selector for {name} '{rule}': {e}")))
}

/// Parsed form of [`SelectorRules`]
#[derive(Debug, Clone)]
pub(crate) struct CompiledSelectors {
    pub anchors: Selector,
    pub product_title: Selector,
    pub product_size: Selector,
    pub product_price_block: Selector,
    pub product_price_list: Selector,
    pub property_tile: Selector,
    pub property_name: Selector,
    pub property_price: Selector,
    pub property_details: Selector,
    pub property_link: Selector,
    pub broker_block: Selector,
    pub broker_name: Selector,
    pub broker_logo: Selector,
}

impl CompiledSelectors {
    pub(crate) fn compile(rules: &SelectorRules) -> Result<Self, HarvestError> {
        Ok(Self {
            anchors: compile("a[href]", "anchors")?,
            product_title: compile(&rules.product_title, "product_title")?,
            product_size: compile(&rules.product_size, "product_size")?,
            product_price_block: compile(&rules.product_price_block, "product_price_block")?,
            product_price_list: compile(&rules.product_price_list, "product_price_list")?,
            property_tile: compile(&rules.property_tile, "property_tile")?,
            property_name: compile(&rules.property_name, "property_name")?,
            property_price: compile(&rules.property_price, "property_price")?,
            property_details: compile(&rules.property_details, "property_details")?,
            property_link: compile(&rules.property_link, "property_link")?,
            broker_block: compile(&rules.broker_block, "broker_block")?,
            broker_name: compile(&rules.broker_name, "broker_name")?,
            broker_logo: compile(&rules.broker_logo, "broker_logo")?,
        })
    }
}
