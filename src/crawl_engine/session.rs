//! Browser session boundary.
//!
//! A session is one exclusively owned browser tab. The runner only needs to
//! navigate, read the rendered markup and close; everything else about the
//! browser stays behind [`SessionFactory`].

#![allow(async_fn_in_trait)]

use chromiumoxide::browser::Browser;
use chromiumoxide::{Page, cdp};

use crate::errors::{HarvestError, HarvestResult};

/// One browser session owned by a single task
pub trait BrowserSession {
    /// Navigate to `url` and wait for the page load
    async fn navigate(&mut self, url: &str) -> HarvestResult<()>;

    /// Markup of the page as currently rendered
    async fn rendered_content(&mut self) -> HarvestResult<String>;

    /// Release the session
    async fn close(self) -> HarvestResult<()>;
}

/// Creates sessions; owns the browser configuration
pub trait SessionFactory {
    type Session: BrowserSession;

    async fn open(&self) -> HarvestResult<Self::Session>;
}

/// Opens one tab per session on a single Chromium process
pub struct ChromiumSessionFactory {
    browser: Browser,
}

impl ChromiumSessionFactory {
    #[must_use]
    pub fn new(browser: Browser) -> Self {
        Self { browser }
    }

    /// Give the browser back for shutdown once every session is closed
    #[must_use]
    pub fn into_browser(self) -> Browser {
        self.browser
    }
}

impl SessionFactory for ChromiumSessionFactory {
    type Session = ChromiumSession;

    async fn open(&self) -> HarvestResult<ChromiumSession> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| HarvestError::Browser(format!("failed to open page: {e}")))?;

        // Consistent desktop rendering for listing layouts
        let viewport = cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams::builder()
            .width(1920)
            .height(1080)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(HarvestError::Browser)?;
        if let Err(e) = page.execute(viewport).await {
            log::warn!("Failed to set viewport: {e}");
        }

        Ok(ChromiumSession { page: Some(page) })
    }
}

/// A Chromium tab. Closed explicitly by the runner; a tab dropped without
/// `close()` is closed in the background.
pub struct ChromiumSession {
    page: Option<Page>,
}

impl ChromiumSession {
    fn page(&self) -> HarvestResult<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| HarvestError::Browser("session already closed".to_string()))
    }
}

impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> HarvestResult<()> {
        self.page()?
            .goto(url)
            .await
            .map_err(|e| HarvestError::Browser(format!("navigation to {url} failed: {e}")))?;
        Ok(())
    }

    async fn rendered_content(&mut self) -> HarvestResult<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| HarvestError::Browser(format!("failed to read page content: {e}")))
    }

    async fn close(mut self) -> HarvestResult<()> {
        match self.page.take() {
            Some(page) => page
                .close()
                .await
                .map_err(|e| HarvestError::Browser(format!("failed to close page: {e}"))),
            None => Ok(()),
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                log::debug!("ChromiumSession dropped without close - closing tab in background");
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        log::debug!("Background tab close failed: {e}");
                    }
                });
            }
            Err(_) => log::warn!("ChromiumSession dropped outside a runtime; tab left open"),
        }
    }
}
