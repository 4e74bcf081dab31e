//! # sitegen-core
//!
//! Core functionality for sitegen, the static XML sitemap generator for the
//! Keten Pnömatik storefront.
//!
//! The crate turns heterogeneous export records (missing fields, literal
//! `"null"` strings, percent-encoded titles, absolute and relative links) into
//! one canonical, deduplicated and ordered list of sitemap entries.
//!
//! ## Architecture
//!
//! - **Text**: input cleaning and slug generation
//! - **Routes**: static path extraction from the front-end router
//! - **Collectors**: priority pages, router routes, categories, products
//! - **Assembly**: ordered, first-wins merge with per-class metadata
//! - **Sitemap**: XML rendering, read-back check and atomic write
//!
//! ## Quick Start
//!
//! ```rust
//! use sitegen_core::{SiteConfig, SourceRecords, assemble, render_sitemap};
//!
//! let mut config = SiteConfig::with_base("https://example.com")?;
//! config.static_routes = Some(Vec::new());
//!
//! let report = assemble(&config, &SourceRecords::local(Vec::new(), Vec::new()));
//! let xml = render_sitemap(&report.entries)?;
//!
//! assert!(xml.contains("<loc>https://example.com/</loc>"));
//! # Ok::<(), sitegen_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Only configuration problems and the final write return errors. Missing
//! inputs, malformed rows and network failures are logged and skipped:
//!
//! ```rust
//! use sitegen_core::{Error, SiteConfig};
//!
//! match SiteConfig::with_base("ftp://example.com") {
//!     Err(Error::InvalidUrl(msg)) => eprintln!("bad base: {msg}"),
//!     Err(e) => eprintln!("unexpected: {e}"),
//!     Ok(_) => unreachable!(),
//! }
//! ```

/// Export API client and sitemap upload
pub mod api;
/// Ordered, first-wins entry assembly
pub mod assemble;
/// URL collectors for each page source
pub mod collect;
/// Site configuration and config file loading
pub mod config;
/// Error types and result aliases
pub mod error;
/// End-to-end generation pipeline
pub mod pipeline;
/// Raw export records and the local JSON loader
pub mod records;
/// Static route extraction from the router source
pub mod routes;
/// Sitemap rendering, parsing and writing
pub mod sitemap;
/// Input cleaning and slug generation
pub mod text;

// Re-export commonly used types
pub use api::{ExportClient, ExportPayload, ExportRequest, UploadResponse};
pub use assemble::{EntryAssembler, OrderedEntrySet};
pub use config::{ConfigFile, EntryClass, EntryDefaults, EntryMeta, SiteConfig};
pub use error::{Error, Result};
pub use pipeline::{
    DataSource, GenerateCounts, GenerateReport, SourceRecords, assemble, generate, load_records,
};
pub use sitemap::{ChangeFrequency, SitemapEntry, parse_sitemap, render_sitemap, write_sitemap};
pub use text::{clean_input, slugify};
