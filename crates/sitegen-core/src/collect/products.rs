//! Product page locations.
//!
//! An explicit URL field wins. Without one the SKU is slugified into
//! `/urun/<slug>`; the local export links carry a trailing slash and the
//! API links do not, and that difference is kept as-is.

use super::{join_base, resolve_location};
use crate::config::SiteConfig;
use crate::records::{RawRecord, field_text};
use crate::text::{clean_input, is_null_like, is_xml_safe, slugify};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

const URL_KEYS: &[&str] = &["URL", "Url", "url", "link"];
const SKU_KEYS: &[&str] = &["sku", "SKU"];

/// Where product records came from; decides the SKU path convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSource {
    /// Local JSON export: `/urun/<slug>/`.
    #[default]
    LocalExport,
    /// Export API payload: `/urun/<slug>`.
    Api,
}

impl ProductSource {
    /// Canonical product path for a SKU slug.
    #[must_use]
    pub fn sku_path(self, slug: &str) -> String {
        match self {
            Self::LocalExport => format!("/urun/{slug}/"),
            Self::Api => format!("/urun/{slug}"),
        }
    }
}

fn usable_field(record: &RawRecord, keys: &[&str]) -> Option<String> {
    let value = clean_input(&field_text(record, keys)?);
    if !is_xml_safe(&value) {
        debug!(value = %value.escape_debug(), "Ignoring field with control characters");
        return None;
    }
    (!is_null_like(&value)).then_some(value)
}

/// Full location for one product record, or `None` if it has neither a
/// usable URL nor a usable SKU.
#[must_use]
pub fn product_location(record: &RawRecord, source: ProductSource, base: &str) -> Option<String> {
    if let Some(url) = usable_field(record, URL_KEYS) {
        return Some(resolve_location(base, &url));
    }

    let slug = slugify(&usable_field(record, SKU_KEYS)?);
    if slug.is_empty() {
        return None;
    }
    Some(join_base(base, &source.sku_path(&slug)))
}

/// Collect product locations in record order, without duplicates.
#[must_use]
pub fn collect_product_urls(
    records: &[RawRecord],
    source: ProductSource,
    config: &SiteConfig,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        match product_location(record, source, &config.base_url) {
            Some(url) => {
                if seen.insert(url.clone()) {
                    urls.push(url);
                }
            },
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "Product records without URL or SKU");
    }
    info!(records = records.len(), pages = urls.len(), ?source, "Collected product pages");
    urls
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const BASE: &str = "https://example.com";

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_sku_fallback_local_has_trailing_slash() {
        let row = record(json!({"sku": "ABC-123"}));
        assert_eq!(
            product_location(&row, ProductSource::LocalExport, BASE).unwrap(),
            "https://example.com/urun/abc-123/"
        );
    }

    #[test]
    fn test_sku_fallback_api_has_no_trailing_slash() {
        let row = record(json!({"SKU": "ABC-123"}));
        assert_eq!(
            product_location(&row, ProductSource::Api, BASE).unwrap(),
            "https://example.com/urun/abc-123"
        );
    }

    #[test]
    fn test_absolute_url_is_rebased() {
        let row = record(json!({"URL": "https://old-host.com/p/xyz?ref=1", "sku": "X"}));
        assert_eq!(
            product_location(&row, ProductSource::LocalExport, BASE).unwrap(),
            "https://example.com/p/xyz?ref=1"
        );
    }

    #[test]
    fn test_relative_url_is_prefixed() {
        let row = record(json!({"link": "urun/ozel-pompa/"}));
        assert_eq!(
            product_location(&row, ProductSource::Api, BASE).unwrap(),
            "https://example.com/urun/ozel-pompa/"
        );
        let row = record(json!({"url": "'/urun/x/'"}));
        assert_eq!(
            product_location(&row, ProductSource::Api, BASE).unwrap(),
            "https://example.com/urun/x/"
        );
    }

    #[test]
    fn test_null_like_url_falls_back_to_sku() {
        let row = record(json!({"URL": "null", "Url": "", "sku": "Havalı Tork 5"}));
        assert_eq!(
            product_location(&row, ProductSource::LocalExport, BASE).unwrap(),
            "https://example.com/urun/havali-tork-5/"
        );
    }

    #[test]
    fn test_numeric_sku() {
        let row = record(json!({"sku": 4021}));
        assert_eq!(
            product_location(&row, ProductSource::LocalExport, BASE).unwrap(),
            "https://example.com/urun/4021/"
        );
    }

    #[test]
    fn test_unusable_records_contribute_nothing() {
        for row in [
            json!({}),
            json!({"URL": "None", "sku": "nil"}),
            json!({"sku": "%%%"}),
            json!({"sku": null, "url": false}),
            json!({"title": "Only a title"}),
        ] {
            assert!(product_location(&record(row), ProductSource::LocalExport, BASE).is_none());
        }
    }

    #[test]
    fn test_url_with_decoded_control_characters_is_ignored() {
        let row = record(json!({"URL": "/urun/a%01b/"}));
        assert!(product_location(&row, ProductSource::LocalExport, BASE).is_none());

        let row = record(json!({"URL": "/urun/a%01b%00c/", "sku": "A-B"}));
        assert_eq!(
            product_location(&row, ProductSource::LocalExport, BASE).unwrap(),
            "https://example.com/urun/a-b/"
        );
    }

    #[test]
    fn test_collect_dedupes_in_order() {
        let config = SiteConfig::with_base(BASE).unwrap();
        let rows = vec![
            record(json!({"sku": "B"})),
            record(json!({"sku": "A"})),
            record(json!({"URL": "/urun/b/"})),
            record(json!({})),
        ];
        assert_eq!(
            collect_product_urls(&rows, ProductSource::LocalExport, &config),
            vec!["https://example.com/urun/b/", "https://example.com/urun/a/"]
        );
    }
}
