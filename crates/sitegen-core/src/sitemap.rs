//! Sitemap XML serialization.
//!
//! Renders an ordered entry list into a sitemap-protocol `<urlset>` document
//! and writes it in one step. `<lastmod>` is never emitted: the exports carry
//! no trustworthy modification dates, and a missing value is better than a
//! made-up one.
//!
//! ## Quick Start
//!
//! ```rust
//! use sitegen_core::sitemap::{render_sitemap, ChangeFrequency, SitemapEntry};
//!
//! let entries = vec![
//!     SitemapEntry::new("https://example.com/")
//!         .with_priority(0.9)
//!         .with_changefreq(ChangeFrequency::Weekly),
//! ];
//!
//! let xml = render_sitemap(&entries)?;
//! assert!(xml.contains("<loc>https://example.com/</loc>"));
//! assert!(xml.contains("<priority>0.9</priority>"));
//! # Ok::<(), sitegen_core::Error>(())
//! ```

use crate::text::is_xml_illegal;
use crate::{Error, Result};
use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::instrument;

/// Sitemap protocol namespace.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A single row of the output sitemap.
///
/// Identity is `location`, compared exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    /// Canonical URL or absolute path of the page.
    pub location: String,
    /// Priority of this URL relative to others (0.0 to 1.0).
    pub priority: Option<f64>,
    /// How frequently the page changes.
    pub change_frequency: Option<ChangeFrequency>,
    /// Last modification date. Never populated by the generator and never written.
    pub last_modified: Option<NaiveDate>,
}

impl SitemapEntry {
    /// Create an entry with no metadata.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            priority: None,
            change_frequency: None,
            last_modified: None,
        }
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the change frequency.
    #[must_use]
    pub const fn with_changefreq(mut self, changefreq: ChangeFrequency) -> Self {
        self.change_frequency = Some(changefreq);
        self
    }
}

/// Change frequency hints from sitemap.
///
/// These values indicate how frequently a page is likely to change,
/// though search engines may not follow these hints strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    /// The page changes every time it is accessed.
    Always,
    /// The page changes hourly.
    Hourly,
    /// The page changes daily.
    Daily,
    /// The page changes weekly.
    Weekly,
    /// The page changes monthly.
    Monthly,
    /// The page changes yearly.
    Yearly,
    /// The page is archived and will not change.
    Never,
}

impl ChangeFrequency {
    /// The protocol keyword for this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(Error::Config(format!("Invalid changefreq value: {s}"))),
        }
    }
}

/// Remove repeated locations, keeping the first occurrence of each.
#[must_use]
pub fn dedupe_entries(entries: &[SitemapEntry]) -> Vec<&SitemapEntry> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.location.as_str()))
        .collect()
}

fn xml_err(e: impl std::fmt::Display) -> Error {
    Error::Serialization(format!("Failed to write sitemap XML: {e}"))
}

/// Render entries into a sitemap document.
///
/// Duplicate locations are dropped (first wins) so the call is safe on lists
/// that were already deduplicated. Priorities are written with exactly one
/// decimal place. An empty list produces a valid empty `<urlset>`.
pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(urlset)).map_err(xml_err)?;

    for entry in dedupe_entries(entries) {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_err)?;
        write_text_element(&mut writer, "loc", &entry.location)?;
        if let Some(priority) = entry.priority {
            write_text_element(&mut writer, "priority", &format!("{priority:.1}"))?;
        }
        if let Some(changefreq) = entry.change_frequency {
            write_text_element(&mut writer, "changefreq", changefreq.as_str())?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml_err)?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Serialization(format!("Sitemap is not valid UTF-8: {e}")))?;
    xml.push('\n');
    Ok(xml)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

/// Parse a `<urlset>` sitemap back into entries.
///
/// Reads `loc`, `priority` and `changefreq`; `<url>` blocks without a
/// `<loc>` are skipped. Used to confirm rendered output before it is written.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut current: Option<SitemapEntry> = None;
    let mut current_element: Option<String> = None;
    let mut saw_urlset = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "urlset" => saw_urlset = true,
                    "url" => current = Some(SitemapEntry::new(String::new())),
                    "loc" | "changefreq" | "priority" if current.is_some() => {
                        current_element = Some(name);
                    },
                    _ => {},
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"urlset" {
                    saw_urlset = true;
                }
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"url" {
                    if let Some(entry) = current.take() {
                        if !entry.location.is_empty() {
                            entries.push(entry);
                        }
                    }
                }
                current_element = None;
            },
            Ok(Event::Text(e)) => {
                if let (Some(element), Some(entry)) = (current_element.as_deref(), current.as_mut())
                {
                    let text = e.unescape().map_err(|e| Error::Parse(e.to_string()))?;
                    let text = text.trim();
                    match element {
                        "loc" => entry.location = text.to_string(),
                        "priority" => entry.priority = parse_priority(text),
                        "changefreq" => entry.change_frequency = text.parse().ok(),
                        _ => {},
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Parse(format!("XML parse error: {e}"))),
            _ => {},
        }
        buf.clear();
    }

    if !saw_urlset {
        return Err(Error::Parse("document has no <urlset> root".to_string()));
    }
    Ok(entries)
}

/// Parse a priority value, clamping to 0.0-1.0 range.
fn parse_priority(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().map(|p| p.clamp(0.0, 1.0))
}

/// Render, verify and write the sitemap to `path`.
///
/// The document is built completely in memory and read back before anything
/// touches the filesystem; it is then written to a sibling `.tmp` file and
/// renamed over the target, replacing any previous sitemap.
///
/// Returns the number of `<url>` entries written.
#[instrument(skip_all, fields(path = %path.display(), entries = entries.len()))]
pub fn write_sitemap(entries: &[SitemapEntry], path: &Path) -> Result<usize> {
    let xml = render_sitemap(entries)?;
    let written = verify_rendered(&xml, entries)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);
    if let Err(e) = replace_with_tmp(tmp_path, path, &xml) {
        // the write or rename error is the one reported
        let _ = fs::remove_file(tmp_path);
        return Err(e.into());
    }

    tracing::debug!(written, "Sitemap written");
    Ok(written)
}

fn replace_with_tmp(tmp_path: &Path, path: &Path, xml: &str) -> std::io::Result<()> {
    fs::write(tmp_path, xml.as_bytes())?;

    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }
    fs::rename(tmp_path, path)
}

/// Read the rendered document back and check its entry count.
///
/// Also rejects documents holding characters that XML 1.0 does not allow,
/// which the parser would otherwise accept.
pub fn verify_rendered(xml: &str, entries: &[SitemapEntry]) -> Result<usize> {
    if let Some(offset) = xml.find(is_xml_illegal) {
        return Err(Error::Serialization(format!(
            "rendered sitemap holds an XML-illegal character at byte {offset}"
        )));
    }
    let expected = dedupe_entries(entries).len();
    let parsed = parse_sitemap(xml)?;
    if parsed.len() != expected {
        return Err(Error::Serialization(format!(
            "rendered sitemap holds {} entries, expected {expected}",
            parsed.len()
        )));
    }
    Ok(parsed.len())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::disallowed_macros,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(loc: &str, priority: f64, changefreq: ChangeFrequency) -> SitemapEntry {
        SitemapEntry::new(loc)
            .with_priority(priority)
            .with_changefreq(changefreq)
    }

    #[test]
    fn test_renders_basic_sitemap() {
        let xml = render_sitemap(&[entry("https://example.com/", 0.9, ChangeFrequency::Weekly)])
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"
        ));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<priority>0.9</priority>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(!xml.contains("lastmod"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_priority_has_one_decimal_place() {
        let xml = render_sitemap(&[
            entry("https://example.com/a", 1.0, ChangeFrequency::Daily),
            entry("https://example.com/b", 0.0, ChangeFrequency::Daily),
            entry("https://example.com/c", 0.55, ChangeFrequency::Daily),
        ])
        .unwrap();

        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.0</priority>"));
        assert!(!xml.contains("<priority>0.55</priority>"));
    }

    #[test]
    fn test_priority_rounds_from_double_precision() {
        let xml = render_sitemap(&[
            entry("https://example.com/a", 0.15, ChangeFrequency::Daily),
            entry("https://example.com/b", 0.45, ChangeFrequency::Daily),
        ])
        .unwrap();

        let parsed = parse_sitemap(&xml).unwrap();
        assert_eq!(parsed[0].priority, Some(0.1));
        assert_eq!(parsed[1].priority, Some(0.5));
        assert!(xml.contains("<priority>0.1</priority>"));
        assert!(xml.contains("<priority>0.5</priority>"));
    }

    #[test]
    fn test_verify_rejects_control_characters() {
        let entries = vec![SitemapEntry::new("https://example.com/urun/a\u{1}b\u{0}c/")];
        let xml = render_sitemap(&entries).unwrap();
        let err = verify_rendered(&xml, &entries).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sitemap.xml");
        assert!(write_sitemap(&entries, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_omits_absent_metadata() {
        let xml = render_sitemap(&[SitemapEntry::new("https://example.com/x")]).unwrap();
        assert!(xml.contains("<loc>https://example.com/x</loc>"));
        assert!(!xml.contains("<priority>"));
        assert!(!xml.contains("<changefreq>"));
    }

    #[test]
    fn test_lastmod_never_written() {
        let mut e = SitemapEntry::new("https://example.com/");
        e.last_modified = NaiveDate::from_ymd_opt(2024, 1, 15);
        let xml = render_sitemap(&[e]).unwrap();
        assert!(!xml.contains("lastmod"));
        assert!(!xml.contains("2024-01-15"));
    }

    #[test]
    fn test_empty_entries_render_valid_urlset() {
        let xml = render_sitemap(&[]).unwrap();
        assert!(xml.contains("<urlset"));
        assert!(xml.contains("</urlset>"));
        assert!(parse_sitemap(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_dedupes_first_occurrence_wins() {
        let entries = vec![
            entry("https://example.com/a", 0.9, ChangeFrequency::Weekly),
            entry("https://example.com/a", 0.1, ChangeFrequency::Never),
            entry("https://example.com/b", 0.5, ChangeFrequency::Monthly),
        ];
        let xml = render_sitemap(&entries).unwrap();
        let parsed = parse_sitemap(&xml).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].location, "https://example.com/a");
        assert_eq!(parsed[0].priority, Some(0.9));
        assert_eq!(parsed[0].change_frequency, Some(ChangeFrequency::Weekly));
    }

    #[test]
    fn test_dedupe_is_case_sensitive() {
        let entries = vec![
            SitemapEntry::new("https://example.com/A"),
            SitemapEntry::new("https://example.com/a"),
        ];
        assert_eq!(dedupe_entries(&entries).len(), 2);
    }

    #[test]
    fn test_escapes_xml_special_characters() {
        let xml = render_sitemap(&[SitemapEntry::new("https://example.com/p?a=1&b=2")]).unwrap();
        assert!(xml.contains("https://example.com/p?a=1&amp;b=2"));

        let parsed = parse_sitemap(&xml).unwrap();
        assert_eq!(parsed[0].location, "https://example.com/p?a=1&b=2");
    }

    #[test]
    fn test_keeps_order() {
        let entries: Vec<_> = ["/c", "/a", "/b"]
            .iter()
            .map(|p| SitemapEntry::new(format!("https://example.com{p}")))
            .collect();
        let parsed = parse_sitemap(&render_sitemap(&entries).unwrap()).unwrap();
        let locs: Vec<_> = parsed.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.com/c",
                "https://example.com/a",
                "https://example.com/b"
            ]
        );
    }

    #[test]
    fn test_changefreq_parsing() {
        let test_cases = [
            ("always", ChangeFrequency::Always),
            ("hourly", ChangeFrequency::Hourly),
            ("daily", ChangeFrequency::Daily),
            ("weekly", ChangeFrequency::Weekly),
            ("monthly", ChangeFrequency::Monthly),
            ("yearly", ChangeFrequency::Yearly),
            ("never", ChangeFrequency::Never),
            // Case insensitive
            ("WEEKLY", ChangeFrequency::Weekly),
            ("Weekly", ChangeFrequency::Weekly),
        ];

        for (value, expected) in test_cases {
            let result: Result<ChangeFrequency> = value.parse();
            assert!(result.is_ok(), "Failed to parse: {value}");
            assert_eq!(result.unwrap(), expected);
        }
        assert!("sometimes".parse::<ChangeFrequency>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_sitemap() {
        assert!(parse_sitemap("<html><body/></html>").is_err());
        assert!(parse_sitemap("<urlset><url><loc>x</url></urlset>").is_err());
    }

    #[test]
    fn test_priority_validation() {
        assert_eq!(parse_priority("0.5"), Some(0.5));
        assert_eq!(parse_priority("1.5"), Some(1.0));
        assert_eq!(parse_priority("-0.5"), Some(0.0));
        assert_eq!(parse_priority("not-a-number"), None);
    }

    #[test]
    fn test_write_sitemap_overwrites_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sitemap.xml");
        fs::write(&path, "old contents").unwrap();

        let entries = vec![
            entry("https://example.com/", 0.9, ChangeFrequency::Weekly),
            entry("https://example.com/", 0.5, ChangeFrequency::Monthly),
        ];
        let written = write_sitemap(&entries, &path).unwrap();

        assert_eq!(written, 1);
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old contents"));
        assert_eq!(parse_sitemap(&content).unwrap().len(), 1);
        assert!(!dir.path().join("sitemap.xml.tmp").exists());
    }

    #[test]
    fn test_write_sitemap_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("public").join("sitemap.xml");
        write_sitemap(&[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_sitemap_fails_on_unwritable_target() {
        let dir = TempDir::new().unwrap();
        // A directory in place of the file makes the rename fail
        let path = dir.path().join("sitemap.xml");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();
        assert!(write_sitemap(&[], &path).is_err());
        assert!(!dir.path().join("sitemap.xml.tmp").exists());
    }
}
