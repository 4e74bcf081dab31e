//! End-to-end generation: load records, run the collectors, assemble entries.
//!
//! Collectors always run in the same order: priority pages, router routes,
//! categories, products. Loading is the only step that touches the outside
//! world and every failure in it degrades to an empty record list.

use crate::api::{ExportClient, ExportPayload, ExportRequest};
use crate::assemble::EntryAssembler;
use crate::collect::{
    ProductSource, collect_category_urls, collect_priority_urls, collect_product_urls,
    collect_router_urls,
};
use crate::config::{EntryClass, SiteConfig};
use crate::records::{RawRecord, load_rows_or_empty};
use crate::sitemap::SitemapEntry;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Where product and category records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local JSON exports.
    Local {
        /// Product export path.
        products: PathBuf,
        /// Category export path.
        categories: PathBuf,
    },
    /// The export API; categories are derived from its article rows.
    Api(ExportRequest),
}

/// Records loaded from a [`DataSource`], ready for collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecords {
    /// Product rows.
    pub products: Vec<RawRecord>,
    /// Rows carrying the category taxonomy.
    pub categories: Vec<RawRecord>,
    /// Path convention for SKU-derived product links.
    pub product_source: ProductSource,
}

impl SourceRecords {
    /// Records from a local product and category export.
    #[must_use]
    pub const fn local(products: Vec<RawRecord>, categories: Vec<RawRecord>) -> Self {
        Self {
            products,
            categories,
            product_source: ProductSource::LocalExport,
        }
    }

    /// Records from an export API payload.
    #[must_use]
    pub fn from_payload(payload: ExportPayload) -> Self {
        Self {
            products: payload.products,
            categories: payload.articles,
            product_source: ProductSource::Api,
        }
    }
}

/// Counts reported after a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerateCounts {
    /// Priority pages added.
    pub static_pages: usize,
    /// Router routes added that were not already priority pages.
    pub router_routes: usize,
    /// Unique category pages derived from the records.
    pub category_pages: usize,
    /// Product records read.
    pub product_records: usize,
    /// Unique product locations derived from the records.
    pub product_urls: usize,
    /// Product pages added.
    pub product_pages: usize,
    /// Entries in the final sitemap.
    pub total: usize,
    /// Which flow the product records came from.
    pub product_source: ProductSource,
}

impl GenerateCounts {
    /// Product figure for the run summary.
    ///
    /// Local exports report the product locations derived, the API flow
    /// reports the rows it received.
    #[must_use]
    pub const fn summary_products(&self) -> usize {
        match self.product_source {
            ProductSource::LocalExport => self.product_urls,
            ProductSource::Api => self.product_records,
        }
    }
}

/// Ordered sitemap entries and the counts describing how they were built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateReport {
    /// Deduplicated entries in sitemap order.
    pub entries: Vec<SitemapEntry>,
    /// Per-source counts.
    pub counts: GenerateCounts,
}

/// Load the records for `source`.
///
/// Missing or malformed local files and every API failure yield empty lists.
pub async fn load_records(source: &DataSource) -> SourceRecords {
    match source {
        DataSource::Local {
            products,
            categories,
        } => SourceRecords::local(
            load_rows_or_empty(products, "product"),
            load_rows_or_empty(categories, "category"),
        ),
        DataSource::Api(request) => {
            info!(url = %request.url, "Fetching data from export API");
            let payload = match ExportClient::new() {
                Ok(client) => client.fetch_export_or_empty(request).await,
                Err(e) => {
                    warn!(error = %e, "Could not create HTTP client, continuing without API data");
                    ExportPayload::default()
                },
            };
            SourceRecords::from_payload(payload)
        },
    }
}

/// Run every collector over `records` and assemble the sitemap entries.
#[must_use]
pub fn assemble(config: &SiteConfig, records: &SourceRecords) -> GenerateReport {
    let mut assembler = EntryAssembler::new(config.entries);
    let mut counts = GenerateCounts::default();

    counts.static_pages = assembler.add_urls(EntryClass::Static, collect_priority_urls(config));
    counts.router_routes = assembler.add_urls(EntryClass::Static, collect_router_urls(config));

    let category_urls = collect_category_urls(&records.categories, config);
    counts.category_pages = category_urls.len();
    assembler.add_urls(EntryClass::Category, category_urls);

    counts.product_source = records.product_source;
    counts.product_records = records.products.len();
    let product_urls = collect_product_urls(&records.products, records.product_source, config);
    counts.product_urls = product_urls.len();
    counts.product_pages = assembler.add_urls(EntryClass::Product, product_urls);

    let entries = assembler.finish();
    counts.total = entries.len();
    info!(
        total = counts.total,
        static_pages = counts.static_pages,
        router_routes = counts.router_routes,
        category_pages = counts.category_pages,
        product_pages = counts.product_pages,
        "Assembled sitemap entries"
    );

    GenerateReport { entries, counts }
}

/// Load records for `source` and assemble the sitemap entries.
pub async fn generate(config: &SiteConfig, source: &DataSource) -> GenerateReport {
    let records = load_records(source).await;
    assemble(config, &records)
}
