//! Site configuration for sitemap generation.
//!
//! Every collector receives a [`SiteConfig`] explicitly; nothing reads global
//! state, so two generations with different bases can run side by side.
//!
//! ## Configuration Hierarchy
//!
//! 1. **Built-in defaults**: [`SiteConfig::default`]
//! 2. **Config file**: optional TOML file, see [`ConfigFile`]
//! 3. **CLI flags**: applied by the caller on top of the merged result
//!
//! ## Example Configuration File
//!
//! ```toml
//! base_url = "https://example.com"
//! static_pages = ["/", "/iletisim/"]
//! internal_route_markers = ["/admin"]
//! route_source = "react/src/App.tsx"
//!
//! [entries.product]
//! priority = 0.4
//! changefreq = "weekly"
//! ```

use crate::sitemap::ChangeFrequency;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Default production base URL.
pub const DEFAULT_BASE_URL: &str = "https://ketenpnomatik.com";

/// Default location of the front-end router definition.
pub const DEFAULT_ROUTE_SOURCE: &str = "react/src/App.tsx";

/// Hand-curated priority pages, in sitemap order.
const DEFAULT_STATIC_PAGES: &[&str] = &[
    "/",
    "/hakkimizda/",
    "/hakkimizda/kolver/",
    "/hakkimizda/hiyoki/",
    "/hakkimizda/apac/",
    "/demo-talebi/",
    "/iletisim/",
    "/urunler/",
    "/kategoriler/",
    "/blog/",
];

/// Route substrings that mark admin-only pages which must never be indexed.
const DEFAULT_INTERNAL_MARKERS: &[&str] = &[
    "kategori-fotografl",
    "kategori-fotograf",
    "site-gorsel",
    "/admin",
];

/// The kind of page an entry represents.
///
/// Each class carries its own priority and change frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryClass {
    /// Priority pages and router-extracted routes.
    Static,
    /// Category tier, child and subchild pages.
    Category,
    /// Product detail pages.
    Product,
}

/// Priority and change frequency attached to entries of one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Sitemap `<priority>` value in `0.0..=1.0`.
    pub priority: Option<f64>,
    /// Sitemap `<changefreq>` value.
    pub changefreq: Option<ChangeFrequency>,
}

impl EntryMeta {
    /// Create metadata with both fields set.
    #[must_use]
    pub const fn new(priority: f64, changefreq: ChangeFrequency) -> Self {
        Self {
            priority: Some(priority),
            changefreq: Some(changefreq),
        }
    }
}

/// Per-class entry metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryDefaults {
    /// Metadata for static pages.
    #[serde(rename = "static")]
    pub static_pages: EntryMeta,
    /// Metadata for category pages.
    pub category: EntryMeta,
    /// Metadata for product pages.
    pub product: EntryMeta,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            static_pages: EntryMeta::new(0.9, ChangeFrequency::Weekly),
            category: EntryMeta::new(0.6, ChangeFrequency::Weekly),
            product: EntryMeta::new(0.5, ChangeFrequency::Monthly),
        }
    }
}

impl EntryDefaults {
    /// Metadata for the given entry class.
    #[must_use]
    pub const fn for_class(&self, class: EntryClass) -> EntryMeta {
        match class {
            EntryClass::Static => self.static_pages,
            EntryClass::Category => self.category,
            EntryClass::Product => self.product,
        }
    }

    /// Mutable metadata for the given entry class.
    pub fn for_class_mut(&mut self, class: EntryClass) -> &mut EntryMeta {
        match class {
            EntryClass::Static => &mut self.static_pages,
            EntryClass::Category => &mut self.category,
            EntryClass::Product => &mut self.product,
        }
    }
}

/// Everything a generation run needs to know about the target site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL every location is prefixed with, without a trailing slash.
    pub base_url: String,
    /// Priority pages emitted first, in order.
    pub static_pages: Vec<String>,
    /// Pre-parsed router paths; when set the router source is not read.
    pub static_routes: Option<Vec<String>>,
    /// Router definition file scanned for static routes.
    pub route_source: Option<PathBuf>,
    /// Lowercase substrings identifying routes that must not be indexed.
    pub internal_route_markers: Vec<String>,
    /// Per-class priority and change frequency.
    pub entries: EntryDefaults,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            static_pages: DEFAULT_STATIC_PAGES.iter().map(|p| (*p).to_string()).collect(),
            static_routes: None,
            route_source: Some(PathBuf::from(DEFAULT_ROUTE_SOURCE)),
            internal_route_markers: DEFAULT_INTERNAL_MARKERS
                .iter()
                .map(|m| (*m).to_string())
                .collect(),
            entries: EntryDefaults::default(),
        }
    }
}

impl SiteConfig {
    /// Create a default configuration for another base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` is not an absolute
    /// `http`/`https` URL.
    pub fn with_base(base_url: &str) -> Result<Self> {
        let mut config = Self::default();
        config.set_base_url(base_url)?;
        Ok(config)
    }

    /// Validate and store a base URL, dropping any trailing slashes.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(())
    }

    /// Set the priority for one entry class after range checking it.
    pub fn set_priority(&mut self, class: EntryClass, priority: f64) -> Result<()> {
        self.entries.for_class_mut(class).priority = Some(validate_priority(priority)?);
        Ok(())
    }

    /// Set the change frequency for one entry class.
    pub fn set_changefreq(&mut self, class: EntryClass, changefreq: ChangeFrequency) {
        self.entries.for_class_mut(class).changefreq = Some(changefreq);
    }

    /// Apply a parsed config file on top of this configuration.
    pub fn apply_file(&mut self, file: ConfigFile) -> Result<()> {
        if let Some(base) = file.base_url {
            self.set_base_url(&base)?;
        }
        if let Some(pages) = file.static_pages {
            self.static_pages = pages;
        }
        if let Some(routes) = file.static_routes {
            self.static_routes = Some(routes);
        }
        if let Some(source) = file.route_source {
            self.route_source = Some(source);
        }
        if let Some(markers) = file.internal_route_markers {
            self.internal_route_markers = markers;
        }
        if let Some(entries) = file.entries {
            for (class, meta) in [
                (EntryClass::Static, entries.static_pages),
                (EntryClass::Category, entries.category),
                (EntryClass::Product, entries.product),
            ] {
                let Some(meta) = meta else { continue };
                if let Some(priority) = meta.priority {
                    self.set_priority(class, priority)?;
                }
                if let Some(changefreq) = meta.changefreq {
                    self.set_changefreq(class, changefreq);
                }
            }
        }
        Ok(())
    }
}

/// On-disk configuration: every field optional and layered over defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL override.
    pub base_url: Option<String>,
    /// Replacement priority page list.
    pub static_pages: Option<Vec<String>>,
    /// Pre-parsed router paths, used instead of scraping the router source.
    pub static_routes: Option<Vec<String>>,
    /// Router definition file.
    pub route_source: Option<PathBuf>,
    /// Replacement internal route markers.
    pub internal_route_markers: Option<Vec<String>>,
    /// Per-class metadata overrides.
    pub entries: Option<EntryOverrides>,
}

/// Optional per-class overrides from the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryOverrides {
    /// Static page overrides.
    #[serde(rename = "static")]
    pub static_pages: Option<MetaOverride>,
    /// Category page overrides.
    pub category: Option<MetaOverride>,
    /// Product page overrides.
    pub product: Option<MetaOverride>,
}

/// A single class override; unset fields keep their default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaOverride {
    /// Priority override.
    pub priority: Option<f64>,
    /// Change frequency override.
    pub changefreq: Option<ChangeFrequency>,
}

impl ConfigFile {
    /// Parse a config file from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::parse(&content)
    }
}

/// Validate a base URL and strip trailing slashes.
///
/// ```rust
/// use sitegen_core::config::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://example.com/").unwrap(), "https://example.com");
/// assert!(normalize_base_url("example.com").is_err());
/// ```
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    let parsed =
        Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(Error::InvalidUrl(format!(
            "{trimmed}: base URL must be an absolute http(s) URL"
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Check that a priority lies in `0.0..=1.0`.
pub fn validate_priority(priority: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&priority) {
        Ok(priority)
    } else {
        Err(Error::Config(format!(
            "priority {priority} must be within 0.0..=1.0"
        )))
    }
}
