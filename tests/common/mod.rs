//! Test utilities for the listing_harvest test suite: HTML fixtures and a
//! scripted in-memory browser session.

#![allow(dead_code, async_fn_in_trait)]

use listing_harvest::crawl_engine::{BrowserSession, SessionFactory, TaskSettings};
use listing_harvest::{HarvestError, HarvestResult, RecordExtractor, SelectorRules, SiteProfile};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const CATALOG_BASE: &str = "https://www.spoonflower.com";
pub const PROPERTY_BASE: &str = "https://www.crexi.com";

/// Creates a temporary directory for test output
pub fn create_test_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

/// Wraps a body fragment in a minimal HTML document
pub fn create_test_html(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Fixture</title></head>
<body>
{body}
</body>
</html>"#
    )
}

/// Catalog listing page with the given detail link paths plus noise links
pub fn catalog_listing_html(paths: &[&str]) -> String {
    let links: String = paths
        .iter()
        .map(|p| format!(r#"<a href="{p}">design</a>"#))
        .collect();
    create_test_html(&format!(
        r#"<nav><a href="/en/about">About</a><a href="https://elsewhere.example/">Out</a></nav>
<div class="grid">{links}</div>"#
    ))
}

/// Catalog product page with title, size and a price list
pub fn catalog_product_html(title: &str) -> String {
    create_test_html(&format!(
        r#"<h1 class="design-title"> {title} </h1>
<div id="fabric-size">Fat Quarter</div>
<div class="b-item-price">
  <span class="visuallyhidden">
    <meta itemprop="priceCurrency" content="USD">
    <span itemprop="price">21.00</span>
  </span>
</div>"#
    ))
}

/// One property tile; `None` name yields a malformed tile
pub fn property_tile(name: Option<&str>, link: &str) -> String {
    let name = name
        .map(|n| format!(r#"<div class="property-name">{n}</div>"#))
        .unwrap_or_default();
    format!(
        r#"<crx-property-tile-aggregate class="ng-star-inserted">
  {name}
  <div class="property-price">$1,250,000</div>
  <div class="property-details">Retail · 12,000 SF</div>
  <a class="cover-link" href="{link}"></a>
</crx-property-tile-aggregate>"#
    )
}

/// Property listing with five tiles, the third missing its name
pub fn property_listing_html() -> String {
    let tiles: String = [
        property_tile(Some("Plaza One"), "/properties/1001/plaza-one"),
        property_tile(Some("Plaza Two"), "/properties/1002/plaza-two"),
        property_tile(None, "/properties/1003/nameless"),
        property_tile(Some("Plaza Four"), "/properties/1004/plaza-four"),
        property_tile(Some("Plaza Five"), "/properties/1005/plaza-five"),
    ]
    .concat();
    create_test_html(&tiles)
}

/// Property detail page with two brokers, the second without a logo
pub fn property_detail_html() -> String {
    create_test_html(
        r#"<div class="broker-info">
  <span class="broker-name">Jane Broker</span>
  <img class="broker-logo" src="https://cdn.example/a.png">
  <img class="broker-logo" src="https://cdn.example/b.png">
</div>
<div class="broker-info">
  <span class="broker-name">John Agent</span>
</div>"#,
    )
}

pub fn catalog_extractor() -> RecordExtractor {
    RecordExtractor::new(
        SiteProfile::Catalog,
        &SelectorRules::default(),
        "/en/fabric",
        Some(CATALOG_BASE.to_string()),
    )
    .expect("default selectors compile")
}

pub fn property_extractor() -> RecordExtractor {
    RecordExtractor::new(
        SiteProfile::Property,
        &SelectorRules::default(),
        "/en/fabric",
        Some(PROPERTY_BASE.to_string()),
    )
    .expect("default selectors compile")
}

pub fn settings(timeout: Duration, fanout: usize, max_concurrent: Option<usize>) -> TaskSettings {
    TaskSettings {
        task_timeout: timeout,
        render_settle: Duration::from_millis(100),
        detail_fanout_limit: fanout,
        max_concurrent_tasks: max_concurrent,
    }
}

/// How the mock browser answers one URL
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    pub html: String,
    pub navigate_delay: Duration,
    pub fail: Option<String>,
}

impl PageScript {
    pub fn ok(html: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            html: html.into(),
            navigate_delay: Duration::from_millis(delay_ms),
            fail: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionCounters {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub live: AtomicUsize,
    pub max_live: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
}

impl SessionCounters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().expect("visited lock").clone()
    }
}

/// In-memory session factory answering from a URL → script table.
/// Unknown URLs render an empty document immediately.
#[derive(Clone, Default)]
pub struct MockSessionFactory {
    scripts: Arc<HashMap<String, PageScript>>,
    pub counters: Arc<SessionCounters>,
}

impl MockSessionFactory {
    pub fn new<I, S>(scripts: I) -> Self
    where
        I: IntoIterator<Item = (S, PageScript)>,
        S: Into<String>,
    {
        Self {
            scripts: Arc::new(scripts.into_iter().map(|(u, s)| (u.into(), s)).collect()),
            counters: Arc::new(SessionCounters::default()),
        }
    }
}

pub struct MockSession {
    scripts: Arc<HashMap<String, PageScript>>,
    counters: Arc<SessionCounters>,
    current: Option<PageScript>,
}

impl SessionFactory for MockSessionFactory {
    type Session = MockSession;

    async fn open(&self) -> HarvestResult<MockSession> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_live.fetch_max(live, Ordering::SeqCst);
        Ok(MockSession {
            scripts: Arc::clone(&self.scripts),
            counters: Arc::clone(&self.counters),
            current: None,
        })
    }
}

impl BrowserSession for MockSession {
    async fn navigate(&mut self, url: &str) -> HarvestResult<()> {
        self.counters
            .visited
            .lock()
            .expect("visited lock")
            .push(url.to_string());
        let script = self
            .scripts
            .get(url)
            .cloned()
            .unwrap_or_else(|| PageScript::ok(create_test_html(""), 0));
        tokio::time::sleep(script.navigate_delay).await;
        if let Some(reason) = &script.fail {
            return Err(HarvestError::Browser(reason.clone()));
        }
        self.current = Some(script);
        Ok(())
    }

    async fn rendered_content(&mut self) -> HarvestResult<String> {
        self.current
            .as_ref()
            .map(|s| s.html.clone())
            .ok_or_else(|| HarvestError::Browser("no page loaded".to_string()))
    }

    async fn close(self) -> HarvestResult<()> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
