//! Stable page identities derived from listing and detail URLs.
//!
//! Detail pages on catalog sites end in `<digits>-<slug>`, e.g.
//! `/en/fabric/7137786-genevieve-floral-by-crystal_walen`. The numeric part
//! is the dedup key across runs; the slug is kept for readability.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use url::Url;

/// Final path segment must be `<digits>-<word chars and hyphens>`,
/// preceded by at least one non-whitespace character and a slash.
static ID_SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+/(?P<id>\d+)-(?P<slug>[\w-]+)$").expect("ID_SLUG_PATTERN is a valid regex")
});

/// Identity of a page: numeric id, slug and the path it was derived from.
///
/// `id` and `slug` are empty when the path does not follow the id-slug
/// shape. That is not an error; most internal links look like that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PageIdentity {
    pub id: String,
    pub slug: String,
    pub path: String,
}

impl PageIdentity {
    /// Whether the id-slug pattern matched
    #[must_use]
    pub fn is_matched(&self) -> bool {
        !self.id.is_empty()
    }

    /// Dedup key: the id when present, the path otherwise
    #[must_use]
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.path
        } else {
            &self.id
        }
    }
}

/// Reduce `http(s)://host/path?query` to `/path`. Anything that is not an
/// absolute http URL is returned unchanged.
fn strip_to_path(input: &str) -> Cow<'_, str> {
    if !input.starts_with("http") {
        return Cow::Borrowed(input);
    }
    match Url::parse(input) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            Cow::Owned(parsed.path().to_string())
        }
        _ => Cow::Borrowed(input),
    }
}

/// Parse a URL or path into a [`PageIdentity`]. Never fails.
#[must_use]
pub fn extract_page_identity(input: &str) -> PageIdentity {
    let path = strip_to_path(input);

    match ID_SLUG_PATTERN.captures(&path) {
        Some(caps) => PageIdentity {
            id: caps["id"].to_string(),
            slug: caps["slug"].to_string(),
            path: path.to_string(),
        },
        None => PageIdentity {
            id: String::new(),
            slug: String::new(),
            path: path.to_string(),
        },
    }
}
