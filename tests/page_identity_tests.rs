//! Property tests for page identity extraction

use listing_harvest::extract_page_identity;
use proptest::prelude::*;

proptest! {
    #[test]
    fn matching_paths_yield_id_and_slug(id in "[1-9][0-9]{0,9}", slug in "[a-z_][a-z0-9_-]{0,30}") {
        let path = format!("/en/fabric/{id}-{slug}");
        let identity = extract_page_identity(&path);
        prop_assert_eq!(&identity.id, &id);
        prop_assert_eq!(&identity.slug, &slug);
        prop_assert_eq!(&identity.path, &path);
    }

    #[test]
    fn scheme_urls_match_bare_paths(id in "[0-9]{1,8}", slug in "[a-z][a-z-]{0,20}") {
        let path = format!("/en/fabric/{id}-{slug}");
        let url = format!("https://www.spoonflower.com{path}");
        prop_assert_eq!(extract_page_identity(&url), extract_page_identity(&path));
    }

    #[test]
    fn non_matching_paths_keep_the_input(segment in "[a-z]{1,12}") {
        let path = format!("/en/{segment}");
        let identity = extract_page_identity(&path);
        prop_assert!(identity.id.is_empty());
        prop_assert!(identity.slug.is_empty());
        prop_assert_eq!(identity.path, path);
    }

    #[test]
    fn never_panics(input in "\\PC{0,64}") {
        let _ = extract_page_identity(&input);
    }
}
