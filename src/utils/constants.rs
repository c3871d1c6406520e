//! Shared configuration constants for listing_harvest
//!
//! Default values used by the config builder and the CLI so that both agree.

/// Per-task navigation timeout: 60 seconds
pub const DEFAULT_TASK_TIMEOUT_SECS: u64 = 60;

/// Fixed wait after navigation before the rendered content is read.
///
/// Listing pages fill their tiles client-side after the load event, so the
/// content is read after a fixed delay instead of on a render signal.
pub const DEFAULT_RENDER_SETTLE_SECS: u64 = 10;

/// Number of detail pages fetched per listing page
pub const DEFAULT_DETAIL_FANOUT_LIMIT: usize = 10;

/// Number of listing pages generated per seed URL
pub const DEFAULT_PAGE_COUNT: usize = 1;

/// Path prefix of catalog detail links
pub const DEFAULT_LINK_PREFIX: &str = "/en/fabric";

/// Chrome user agent string
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
