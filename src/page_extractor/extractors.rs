//! Record extraction from rendered page markup
//!
//! Every extractor isolates failures per item: a tile or block that lacks its
//! primary region is skipped, a missing secondary field becomes `None`, and
//! both are reported as [`ExtractionGap`]s instead of aborting the page.

use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashSet};

use super::schema::{BrokerRecord, Extracted, LinkRecord, PageRecords, ProductRecord, PropertyRecord};
use super::selectors::{CompiledSelectors, SelectorRules, SiteProfile};
use crate::config::HarvestConfig;
use crate::crawl_engine::{ContextTag, DetailTarget};
use crate::errors::{ExtractionGap, HarvestError};
use crate::page_identity::extract_page_identity;
use crate::utils::{absolutize, resolve_against};

/// Attribute naming a price entry; it labels the entry and is never its value
const SEMANTIC_ATTRIBUTE: &str = "itemprop";

/// Attributes that carry a displayed value, most specific first
const VALUE_ATTRIBUTES: [&str; 2] = ["content", "value"];

/// Text of an element with runs of whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse rendered markup into a queryable document
#[must_use]
pub fn parse_document(content: &str) -> Html {
    Html::parse_document(content)
}

/// Applies the selector rules of one site profile to rendered pages
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    profile: SiteProfile,
    link_prefix: String,
    base_url: Option<String>,
    selectors: CompiledSelectors,
}

impl RecordExtractor {
    pub fn new(
        profile: SiteProfile,
        rules: &SelectorRules,
        link_prefix: impl Into<String>,
        base_url: Option<String>,
    ) -> Result<Self, HarvestError> {
        Ok(Self {
            profile,
            link_prefix: link_prefix.into(),
            base_url,
            selectors: CompiledSelectors::compile(rules)?,
        })
    }

    pub fn from_config(config: &HarvestConfig) -> Result<Self, HarvestError> {
        Self::new(
            config.profile(),
            config.selectors(),
            config.link_prefix(),
            config.base_url().map(str::to_string),
        )
    }

    #[must_use]
    pub fn profile(&self) -> SiteProfile {
        self.profile
    }

    /// Extract every record the profile defines for a page of the given context
    #[must_use]
    pub fn extract(&self, context: ContextTag, page_url: &str, content: &str) -> Extracted<PageRecords> {
        let document = parse_document(content);
        let mut records = PageRecords::default();
        let mut gaps = Vec::new();

        match (self.profile, context) {
            (SiteProfile::Catalog, ContextTag::Listing) => {
                records.links = self.extract_links(&document);
                let product = self.extract_product(page_url, &document);
                records.products.push(product.records);
                gaps.extend(product.gaps);
            }
            (SiteProfile::Catalog, ContextTag::DetailSecondary) => {
                let product = self.extract_product(page_url, &document);
                records.products.push(product.records);
                gaps.extend(product.gaps);
            }
            (SiteProfile::Property, ContextTag::Listing) => {
                let properties = self.extract_properties(page_url, &document);
                records.properties = properties.records;
                gaps.extend(properties.gaps);
            }
            (SiteProfile::Property, ContextTag::DetailSecondary) => {
                let brokers = self.extract_brokers(page_url, &document);
                records.brokers = brokers.records;
                gaps.extend(brokers.gaps);
            }
        }

        if !gaps.is_empty() {
            log::debug!("{} extraction gap(s) on {page_url}", gaps.len());
            for gap in &gaps {
                log::trace!("{page_url}: {gap}");
            }
        }

        Extracted { records, gaps }
    }

    /// Hyperlinks under the configured prefix, as unscraped link records.
    ///
    /// Document order is kept; repeated hrefs are reported once.
    #[must_use]
    pub fn extract_links(&self, document: &Html) -> Vec<LinkRecord> {
        let mut seen = HashSet::new();
        document
            .select(&self.selectors.anchors)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| href.starts_with(self.link_prefix.as_str()))
            .filter(|href| seen.insert(href.to_string()))
            .map(|href| LinkRecord::new(extract_page_identity(href)))
            .collect()
    }

    /// Product attributes of a catalog page.
    ///
    /// Without a title the record carries only the page identity.
    #[must_use]
    pub fn extract_product(&self, page_url: &str, document: &Html) -> Extracted<ProductRecord> {
        let mut record = ProductRecord {
            identity: extract_page_identity(page_url),
            title: None,
            size: None,
            price: None,
        };
        let mut gaps = Vec::new();

        let Some(title) = document.select(&self.selectors.product_title).next() else {
            gaps.push(ExtractionGap::new(0, "product title"));
            return Extracted { records: record, gaps };
        };
        record.title = Some(element_text(title));

        match document.select(&self.selectors.product_size).next() {
            Some(size) => record.size = Some(element_text(size)),
            None => gaps.push(ExtractionGap::new(0, "product size")),
        }

        match self.extract_price(document) {
            Some(price) => record.price = Some(price),
            None => gaps.push(ExtractionGap::new(0, "product price")),
        }

        Extracted { records: record, gaps }
    }

    /// Walk the children of the price list and map each `itemprop` to its value
    fn extract_price(&self, document: &Html) -> Option<BTreeMap<String, String>> {
        let block = document.select(&self.selectors.product_price_block).next()?;
        let list = block.select(&self.selectors.product_price_list).next()?;

        let mut price = BTreeMap::new();
        for child in list.children().filter_map(ElementRef::wrap) {
            let element = child.value();
            let Some(name) = element.attr(SEMANTIC_ATTRIBUTE) else {
                continue;
            };
            let value = VALUE_ATTRIBUTES
                .iter()
                .find_map(|attr| element.attr(attr))
                .or_else(|| {
                    element
                        .attrs()
                        .find(|(attr, _)| *attr != SEMANTIC_ATTRIBUTE)
                        .map(|(_, value)| value)
                })
                .map_or_else(|| element_text(child), str::to_string);
            price.insert(name.to_string(), value);
        }
        Some(price)
    }

    /// Property tiles of a listing page.
    ///
    /// A tile without a name is skipped; other missing fields become `None`.
    #[must_use]
    pub fn extract_properties(&self, page_url: &str, document: &Html) -> Extracted<Vec<PropertyRecord>> {
        let mut out = Extracted::<Vec<PropertyRecord>>::default();
        let base_url = self.base_url.as_deref();

        for (index, tile) in document.select(&self.selectors.property_tile).enumerate() {
            let Some(name) = tile.select(&self.selectors.property_name).next() else {
                out.gaps.push(ExtractionGap::new(index, "property name"));
                continue;
            };

            let mut field = |selector: &Selector, region: &str| {
                let value = tile.select(selector).next().map(element_text);
                if value.is_none() {
                    out.gaps.push(ExtractionGap::new(index, region));
                }
                value
            };
            let price = field(&self.selectors.property_price, "property price");
            let details = field(&self.selectors.property_details, "property details");

            let link = tile
                .select(&self.selectors.property_link)
                .find_map(|a| a.value().attr("href"))
                .and_then(|href| match base_url {
                    Some(base) => Some(absolutize(base, href)),
                    None => resolve_against(page_url, href).ok(),
                });
            if link.is_none() {
                out.gaps.push(ExtractionGap::new(index, "property link"));
            }

            out.records.push(PropertyRecord {
                name: Some(element_text(name)),
                price,
                details,
                link,
            });
        }

        out
    }

    /// Broker blocks of a property detail page.
    ///
    /// A block without a name is skipped; logos default to an empty list.
    #[must_use]
    pub fn extract_brokers(&self, page_url: &str, document: &Html) -> Extracted<Vec<BrokerRecord>> {
        let mut out = Extracted::<Vec<BrokerRecord>>::default();

        for (index, block) in document.select(&self.selectors.broker_block).enumerate() {
            let Some(name) = block.select(&self.selectors.broker_name).next() else {
                out.gaps.push(ExtractionGap::new(index, "broker name"));
                continue;
            };

            let logos = block
                .select(&self.selectors.broker_logo)
                .filter_map(|img| img.value().attr("src"))
                .map(str::to_string)
                .collect();

            out.records.push(BrokerRecord {
                name: element_text(name),
                logos,
                page: page_url.to_string(),
            });
        }

        out
    }

    /// Detail pages derived from a listing page, first `limit` only.
    ///
    /// Catalog links without an id-slug identity are category pages and are
    /// never followed. Catalog targets carry the key of the link row they
    /// came from.
    #[must_use]
    pub fn detail_targets(&self, page_url: &str, records: &PageRecords, limit: usize) -> Vec<DetailTarget> {
        match self.profile {
            SiteProfile::Catalog => records
                .links
                .iter()
                .filter(|link| link.identity.is_matched())
                .filter_map(|link| match resolve_against(page_url, &link.identity.path) {
                    Ok(url) => Some(DetailTarget {
                        url,
                        source_key: Some(link.identity.key().to_string()),
                    }),
                    Err(e) => {
                        log::warn!("Skipping detail link {}: {e}", link.identity.path);
                        None
                    }
                })
                .take(limit)
                .collect(),
            SiteProfile::Property => records
                .properties
                .iter()
                .filter_map(|p| p.link.clone())
                .map(|url| DetailTarget { url, source_key: None })
                .take(limit)
                .collect(),
        }
    }
}
