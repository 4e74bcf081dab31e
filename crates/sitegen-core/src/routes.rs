//! Static route extraction from a front-end router definition.
//!
//! The router file is scanned for `path="..."` (or `path='...'`) attributes.
//! Only absolute, parameter-free paths survive: nested route fragments such as
//! `path="kolver"` have no meaning without their parent and are never joined
//! onto anything.
//!
//! ```rust
//! use sitegen_core::routes::extract_static_routes;
//!
//! let source = r#"
//!     <Route path="/" element={<Home />} />
//!     <Route path="/iletisim" element={<Contact />} />
//!     <Route path="/urun/:sku" element={<Product />} />
//!     <Route path="kolver" element={<Kolver />} />
//!     <Route path="*" element={<NotFound />} />
//! "#;
//!
//! assert_eq!(extract_static_routes(source), vec!["/", "/iletisim/"]);
//! ```

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Regex for router path attributes: path="..." or path='...'
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static PATH_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"path\s*=\s*(?:"([^"]+)"|'([^']+)')"#).unwrap());

/// Extract absolute, parameter-free route paths in first-seen order.
///
/// Paths containing `:` or `*` are dropped, as are relative paths. Every
/// survivor except `/` gets a trailing slash, and duplicates after that
/// normalization are removed.
#[must_use]
pub fn extract_static_routes(source: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut routes = Vec::new();

    for cap in PATH_ATTR_RE.captures_iter(source) {
        let Some(raw) = cap.get(1).or_else(|| cap.get(2)) else {
            continue;
        };
        let Some(route) = normalize_route(raw.as_str()) else {
            continue;
        };
        if seen.insert(route.clone()) {
            routes.push(route);
        }
    }

    routes
}

/// Normalize one declared path, or `None` if it cannot be a static page.
///
/// Parameterized, wildcard and relative paths are rejected; every other path
/// except `/` gains a trailing slash.
#[must_use]
pub fn normalize_route(path: &str) -> Option<String> {
    if path.contains(':') || path.contains('*') || !path.starts_with('/') {
        return None;
    }
    if path == "/" || path.ends_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("{path}/"))
    }
}

/// Read a router source file and extract its static routes.
///
/// A missing or unreadable file yields an empty list.
#[must_use]
pub fn extract_static_routes_from_file(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => {
            let routes = extract_static_routes(&source);
            tracing::debug!(path = %path.display(), routes = routes.len(), "Extracted router paths");
            routes
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Router source not found, skipping route extraction");
            Vec::new()
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read router source");
            Vec::new()
        },
    }
}

/// Returns `true` if `route` (or a full URL) belongs to an internal admin area.
///
/// Matching is a lowercase substring test against each marker.
#[must_use]
pub fn is_internal_route(route: &str, markers: &[String]) -> bool {
    let lowered = route.to_lowercase();
    markers
        .iter()
        .any(|marker| lowered.contains(&marker.to_lowercase()))
}

/// Drop routes that match any internal marker, keeping order.
#[must_use]
pub fn filter_internal_routes(routes: Vec<String>, markers: &[String]) -> Vec<String> {
    routes
        .into_iter()
        .filter(|route| {
            let internal = is_internal_route(route, markers);
            if internal {
                tracing::debug!(route = %route, "Excluding internal route");
            }
            !internal
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const APP_ROUTES: &str = r#"
        <Routes>
            <Route path="/admin/login" element={<AdminLogin />} />
            <Route path="/admin" element={<RequireAuth><AdminLayout /></RequireAuth>}>
              <Route path="kategori-fotograflari" element={<CategoryPhotos />} />
              <Route path="site-gorselleri" element={<SiteImagesAdmin />} />
            </Route>
            <Route path="/" element={<HomePage />} />
            <Route path="/hakkimizda" element={<Hakkimizda />}>
              <Route path="kolver" element={<Kolver />} />
            </Route>
            <Route path="/kategoriler" element={<Categories />} />
            <Route path="/kategoriler/:tier" element={<Subcategories />} />
            <Route path="/urun/:sku" element={<ProductDetails />} />
            <Route path = '/sss' element={<FAQ />} />
            <Route path="/blog/" element={<Blog />} />
            <Route path="/blog" element={<Blog />} />
            <Route path="*" element={<NotFound />} />
        </Routes>
    "#;

    #[test]
    fn test_extracts_absolute_static_routes_in_order() {
        let routes = extract_static_routes(APP_ROUTES);
        assert_eq!(
            routes,
            vec![
                "/admin/login/",
                "/admin/",
                "/",
                "/hakkimizda/",
                "/kategoriler/",
                "/sss/",
                "/blog/",
            ]
        );
    }

    #[test]
    fn test_skips_relative_nested_routes() {
        let routes = extract_static_routes(APP_ROUTES);
        assert!(!routes.iter().any(|r| r.contains("kolver")));
        assert!(!routes.iter().any(|r| r.contains("site-gorselleri")));
    }

    #[test]
    fn test_skips_parameter_and_wildcard_routes() {
        let routes = extract_static_routes(r#"path="/a/:id" path="/files/*" path="/b""#);
        assert_eq!(routes, vec!["/b/"]);
    }

    #[test]
    fn test_root_keeps_single_slash() {
        assert_eq!(extract_static_routes(r#"path="/""#), vec!["/"]);
    }

    #[test]
    fn test_empty_source() {
        assert!(extract_static_routes("").is_empty());
        assert!(extract_static_routes("const x = 1;").is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(extract_static_routes_from_file(&dir.path().join("App.tsx")).is_empty());
    }

    #[test]
    fn test_reads_routes_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("App.tsx");
        std::fs::write(&path, APP_ROUTES).unwrap();
        assert_eq!(extract_static_routes_from_file(&path).len(), 7);
    }

    #[test]
    fn test_internal_route_markers() {
        let markers = vec!["kategori-fotograf".to_string(), "SITE-GORSEL".to_string()];
        assert!(is_internal_route("https://x.com/Kategori-Fotograflari/", &markers));
        assert!(is_internal_route("/admin/site-gorselleri/", &markers));
        assert!(!is_internal_route("/kategoriler/", &markers));
    }

    #[test]
    fn test_filter_internal_routes_keeps_order() {
        let markers = vec!["/admin".to_string()];
        let routes = extract_static_routes(APP_ROUTES);
        let filtered = filter_internal_routes(routes, &markers);
        assert_eq!(filtered[0], "/");
        assert!(filtered.iter().all(|r| !r.starts_with("/admin")));
    }
}
