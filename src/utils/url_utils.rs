//! URL and path manipulation utilities.

use anyhow::Result;
use std::path::{Path, PathBuf};
use url::Url;

/// Check if a URL is an absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Resolve a site-relative path against the origin of `page_url`.
///
/// Already absolute targets are returned unchanged.
pub fn resolve_against(page_url: &str, target: &str) -> Result<String> {
    if is_valid_url(target) {
        return Ok(target.to_string());
    }
    let base = Url::parse(page_url).map_err(|e| anyhow::anyhow!("Failed to parse URL {page_url}: {e}"))?;
    let joined = base
        .join(target)
        .map_err(|e| anyhow::anyhow!("Failed to join {target} onto {page_url}: {e}"))?;
    Ok(joined.to_string())
}

/// Prefix a site-relative link with a base URL, e.g. `https://www.crexi.com` + `/properties/1`.
#[must_use]
pub fn absolutize(base_url: &str, link: &str) -> String {
    if is_valid_url(link) {
        return link.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if link.starts_with('/') {
        format!("{base}{link}")
    } else {
        format!("{base}/{link}")
    }
}

/// Path of the detail table written next to the primary table:
/// `out/links.json` → `out/links.details.json`
#[must_use]
pub fn details_table_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map_or_else(|| "results".to_string(), |s| s.to_string_lossy().into_owned());
    let extension = output_path
        .extension()
        .map_or_else(|| "json".to_string(), |e| e.to_string_lossy().into_owned());
    output_path.with_file_name(format!("{stem}.details.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_origin() {
        let resolved = resolve_against(
            "https://www.spoonflower.com/en/shop?on=fabric",
            "/en/fabric/12-red",
        )
        .expect("relative path should resolve");
        assert_eq!(resolved, "https://www.spoonflower.com/en/fabric/12-red");
    }

    #[test]
    fn test_resolve_keeps_absolute() {
        let resolved = resolve_against("https://a.com/x", "https://b.com/y").expect("absolute");
        assert_eq!(resolved, "https://b.com/y");
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://www.crexi.com", "/properties/77/tx-land"),
            "https://www.crexi.com/properties/77/tx-land"
        );
        assert_eq!(absolutize("https://www.crexi.com/", "p/1"), "https://www.crexi.com/p/1");
        assert_eq!(absolutize("https://www.crexi.com", "https://x.io/p"), "https://x.io/p");
    }

    #[test]
    fn test_details_table_path() {
        assert_eq!(
            details_table_path(Path::new("/tmp/out/links.json")),
            PathBuf::from("/tmp/out/links.details.json")
        );
        assert_eq!(
            details_table_path(Path::new("props")),
            PathBuf::from("props.details.json")
        );
    }
}
