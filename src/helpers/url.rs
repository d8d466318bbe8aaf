//! URL helper functions
//!
//! Every link the site emits goes through [`url_for`], which applies the
//! configured `base_path` prefix.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the base path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/") // -> "/site/blog/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.base_path.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

/// URL of the listing page
pub fn blog_url(config: &SiteConfig) -> String {
    url_for(config, &with_trailing_slash(config, &config.blog_dir))
}

/// URL of a post's detail page
///
/// # Examples
/// ```ignore
/// post_url(&config, "hello world") // -> "/blog/hello%20world/"
/// ```
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    let path = format!("{}/{}", config.blog_dir, encode_segment(slug));
    url_for(config, &with_trailing_slash(config, &path))
}

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

fn with_trailing_slash(config: &SiteConfig, path: &str) -> String {
    let path = path.trim_matches('/');
    if config.trailing_slash {
        format!("{}/", path)
    } else {
        path.to_string()
    }
}
