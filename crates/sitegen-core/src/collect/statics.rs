//! Priority pages and router-declared static routes.

use super::join_base;
use crate::config::SiteConfig;
use crate::routes::{extract_static_routes_from_file, filter_internal_routes, normalize_route};
use crate::text::is_xml_safe;
use tracing::{debug, info};

/// Hand-curated priority pages in configured order, prefixed with the base.
#[must_use]
pub fn collect_priority_urls(config: &SiteConfig) -> Vec<String> {
    config
        .static_pages
        .iter()
        .filter(|page| is_xml_safe(page))
        .map(|page| join_base(&config.base_url, page))
        .collect()
}

/// Router-declared static routes minus internal admin routes.
///
/// An injected `static_routes` list takes precedence over the router source
/// file and goes through the same normalization. With neither configured no
/// routes are produced.
#[must_use]
pub fn collect_router_urls(config: &SiteConfig) -> Vec<String> {
    let routes = match (&config.static_routes, &config.route_source) {
        (Some(routes), _) => {
            debug!(routes = routes.len(), "Using configured static routes");
            let mut seen = std::collections::HashSet::new();
            routes
                .iter()
                .filter_map(|route| normalize_route(route.trim()))
                .filter(|route| seen.insert(route.clone()))
                .collect()
        },
        (None, Some(source)) => extract_static_routes_from_file(source),
        (None, None) => Vec::new(),
    };

    let public = filter_internal_routes(routes, &config.internal_route_markers);
    info!(routes = public.len(), "Collected router routes");

    public
        .iter()
        .filter(|route| is_xml_safe(route))
        .map(|route| join_base(&config.base_url, route))
        .collect()
}
