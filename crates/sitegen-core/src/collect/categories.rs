//! Category page derivation from the `parent`/`child`/`subchild` taxonomy.
//!
//! Every record yields its tier page, plus child and subchild pages when those
//! fields slugify to something. The `title` field is never read: article
//! headlines are not routable category pages.
//!
//! Local category exports and API article rows use the same keys, so both go
//! through [`collect_category_urls`].

use super::join_base;
use crate::config::SiteConfig;
use crate::records::{RawRecord, field_text};
use crate::text::{clean_input, is_null_like, slugify};
use std::collections::BTreeSet;
use tracing::info;

const PARENT_KEYS: &[&str] = &["Parent", "parent", "parent_category"];
const CHILD_KEYS: &[&str] = &["child", "Child"];
const SUBCHILD_KEYS: &[&str] = &["subchild", "Subchild"];

/// Tier used when a record has no usable parent.
pub const FALLBACK_TIER: &str = "genel";

/// Cleaned field value, or `None` for missing and null-like values.
fn taxonomy_field(record: &RawRecord, keys: &[&str]) -> Option<String> {
    let value = clean_input(&field_text(record, keys)?);
    (!is_null_like(&value)).then_some(value)
}

/// Slug of a taxonomy field, or `None` when it slugifies to nothing.
fn taxonomy_slug(record: &RawRecord, keys: &[&str]) -> Option<String> {
    let slug = slugify(&taxonomy_field(record, keys)?);
    (!slug.is_empty()).then_some(slug)
}

/// Derive the category paths (without base) for one record.
#[must_use]
pub fn category_paths(record: &RawRecord) -> Vec<String> {
    let tier = taxonomy_slug(record, PARENT_KEYS).unwrap_or_else(|| FALLBACK_TIER.to_string());
    let mut paths = vec![format!("/kategoriler/{tier}/")];

    if let Some(child) = taxonomy_slug(record, CHILD_KEYS) {
        paths.push(format!("/kategoriler/{tier}/{child}/"));
        if let Some(subchild) = taxonomy_slug(record, SUBCHILD_KEYS) {
            paths.push(format!("/kategoriler/{tier}/{child}/{subchild}/"));
        }
    }

    paths
}

/// Collect the unique category pages for `records`, sorted and base-prefixed.
///
/// The result depends only on the set of records, not their order.
#[must_use]
pub fn collect_category_urls(records: &[RawRecord], config: &SiteConfig) -> Vec<String> {
    let paths: BTreeSet<String> = records.iter().flat_map(category_paths).collect();
    info!(records = records.len(), pages = paths.len(), "Collected category pages");

    paths
        .iter()
        .map(|path| join_base(&config.base_url, path))
        .collect()
}
