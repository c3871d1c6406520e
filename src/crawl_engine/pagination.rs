//! Listing page URL generation

/// Page 1 is the base URL itself; pages 2..=`page_count` get `?page=N`.
///
/// ```
/// use listing_harvest::crawl_engine::generate_pages;
///
/// let pages = generate_pages("https://www.crexi.com/properties", 3);
/// assert_eq!(pages, vec![
///     "https://www.crexi.com/properties",
///     "https://www.crexi.com/properties?page=2",
///     "https://www.crexi.com/properties?page=3",
/// ]);
/// ```
#[must_use]
pub fn generate_pages(base_url: &str, page_count: usize) -> Vec<String> {
    (1..=page_count)
        .map(|page| {
            if page == 1 {
                base_url.to_string()
            } else {
                format!("{base_url}?page={page}")
            }
        })
        .collect()
}

/// Expand every seed into its pages, seeds in order
#[must_use]
pub fn expand_seeds(seed_urls: &[String], page_count: usize) -> Vec<String> {
    seed_urls
        .iter()
        .flat_map(|seed| generate_pages(seed, page_count))
        .collect()
}
