//! URL collectors.
//!
//! Each collector turns one source into location strings that are already
//! prefixed with the configured base URL:
//!
//! - [`statics`]: hand-curated priority pages and router-declared routes
//! - [`categories`]: `/kategoriler/...` pages from the category taxonomy
//! - [`products`]: product pages from an explicit URL or a SKU fallback
//!
//! Collectors never fail. Records that cannot produce a location are skipped.

pub mod categories;
pub mod products;
pub mod statics;

pub use categories::{category_paths, collect_category_urls};
pub use products::{ProductSource, collect_product_urls, product_location};
pub use statics::{collect_priority_urls, collect_router_urls};

/// Prefix a site-relative path with `base`, inserting `/` only when missing.
#[must_use]
pub fn join_base(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Replace the scheme and host of an absolute `http`/`https` URL with `base`.
///
/// The path, query and fragment are kept verbatim. Returns `None` when `url`
/// is not absolute.
///
/// ```rust
/// use sitegen_core::collect::rebase_absolute;
///
/// assert_eq!(
///     rebase_absolute("https://example.com", "https://old-host.com/p/xyz?ref=1"),
///     Some("https://example.com/p/xyz?ref=1".to_string())
/// );
/// assert_eq!(rebase_absolute("https://example.com", "/p/xyz"), None);
/// ```
#[must_use]
pub fn rebase_absolute(base: &str, url: &str) -> Option<String> {
    let lowered = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    if !lowered.starts_with("http://") && !lowered.starts_with("https://") {
        return None;
    }

    let authority_start = url.find("://")? + 3;
    let rest = &url[authority_start..];
    let remainder = match rest.find(['/', '?', '#']) {
        Some(idx) if rest[idx..].starts_with('/') => rest[idx..].to_string(),
        Some(idx) => format!("/{}", &rest[idx..]),
        None => "/".to_string(),
    };

    Some(format!("{base}{remainder}"))
}

/// Resolve a cleaned URL field against `base`: absolute URLs are rebased,
/// anything else is treated as a site-relative path.
#[must_use]
pub fn resolve_location(base: &str, url: &str) -> String {
    rebase_absolute(base, url).unwrap_or_else(|| join_base(base, url))
}
