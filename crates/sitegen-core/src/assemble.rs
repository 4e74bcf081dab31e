//! Entry assembly for the output sitemap.
//!
//! Collector output is merged into an [`OrderedEntrySet`] keyed by location.
//! The first insertion of a location wins: a later collector cannot change the
//! priority or change frequency of a page that is already present.
//!
//! ## Example
//!
//! ```rust
//! use sitegen_core::assemble::EntryAssembler;
//! use sitegen_core::config::{EntryClass, EntryDefaults};
//!
//! let mut assembler = EntryAssembler::new(EntryDefaults::default());
//! assembler.add_urls(EntryClass::Static, ["https://example.com/"]);
//! let added = assembler.add_urls(EntryClass::Product, ["https://example.com/", "https://example.com/urun/a/"]);
//!
//! assert_eq!(added, 1);
//! let entries = assembler.finish();
//! assert_eq!(entries[0].priority, Some(0.9));
//! ```

use crate::config::{EntryClass, EntryDefaults, EntryMeta};
use crate::sitemap::SitemapEntry;
use std::collections::HashSet;

/// Insertion-ordered set of sitemap entries, unique by `location`.
#[derive(Debug, Clone, Default)]
pub struct OrderedEntrySet {
    entries: Vec<SitemapEntry>,
    locations: HashSet<String>,
}

impl OrderedEntrySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry` unless its location is already present.
    ///
    /// Returns `true` if the entry was added.
    pub fn insert_if_absent(&mut self, entry: SitemapEntry) -> bool {
        if self.locations.contains(&entry.location) {
            return false;
        }
        self.locations.insert(entry.location.clone());
        self.entries.push(entry);
        true
    }

    /// Consume the set, returning entries in insertion order.
    #[must_use]
    pub fn into_entries(self) -> Vec<SitemapEntry> {
        self.entries
    }
}

/// Attaches per-class metadata and merges locations into an ordered set.
#[derive(Debug, Clone)]
pub struct EntryAssembler {
    defaults: EntryDefaults,
    set: OrderedEntrySet,
}

impl EntryAssembler {
    /// Create an assembler using `defaults` for every class.
    #[must_use]
    pub fn new(defaults: EntryDefaults) -> Self {
        Self {
            defaults,
            set: OrderedEntrySet::new(),
        }
    }

    /// Add locations of one class, returning how many were new.
    pub fn add_urls<I, S>(&mut self, class: EntryClass, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let meta = self.defaults.for_class(class);
        let mut added = 0;
        for url in urls {
            if self.set.insert_if_absent(build_entry(url.into(), meta)) {
                added += 1;
            }
        }
        added
    }

    /// Finish assembly.
    #[must_use]
    pub fn finish(self) -> Vec<SitemapEntry> {
        self.set.into_entries()
    }
}

fn build_entry(location: String, meta: EntryMeta) -> SitemapEntry {
    SitemapEntry {
        location,
        priority: meta.priority,
        change_frequency: meta.changefreq,
        last_modified: None,
    }
}
