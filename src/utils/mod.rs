pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{absolutize, details_table_path, is_valid_url, resolve_against};
