//! Text normalization for free-form input fields.
//!
//! Two steps are kept apart on purpose: [`clean_input`] undoes transport
//! artifacts (percent-encoding, stray quotes, padding) and [`slugify`] reduces
//! the cleaned text to a URL-safe token. Running them in that order keeps
//! already-encoded titles such as `A16%20Serisi` from leaking `%` sequences
//! into generated paths.
//!
//! ```rust
//! use sitegen_core::text::{clean_input, slugify};
//!
//! let raw = " \"A16%20Serisi%20Haval%C4%B1%20Mikser\" ";
//! assert_eq!(clean_input(raw), "A16 Serisi Havalı Mikser");
//! assert_eq!(slugify(&clean_input(raw)), "a16-serisi-havali-mikser");
//! ```

use percent_encoding::percent_decode_str;

/// Literal values that exports use in place of a missing field.
const NULL_LIKE: &[&str] = &["", "null", "none", "nil"];

/// Decode percent-escapes and strip surrounding whitespace and one layer of quotes.
///
/// A decode that does not produce valid UTF-8 leaves the text as it was.
/// Already-clean text is returned unchanged, so the function is idempotent on
/// its own output for any value without nested quoting.
#[must_use]
pub fn clean_input(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let decoded = percent_decode_str(value)
        .decode_utf8()
        .map_or_else(|_| value.to_string(), std::borrow::Cow::into_owned);

    let trimmed = decoded.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix(['"', '\''])
        .unwrap_or(trimmed);

    trimmed.trim().to_string()
}

/// Returns `true` for empty values and the `null`/`none`/`nil` placeholders.
///
/// The comparison ignores case and surrounding whitespace.
#[must_use]
pub fn is_null_like(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    NULL_LIKE.contains(&lowered.as_str())
}

/// Returns `true` if `c` may not appear in an XML 1.0 document.
///
/// Covers control characters other than tab, line feed and carriage return,
/// plus the `U+FFFE`/`U+FFFF` noncharacters.
#[must_use]
pub const fn is_xml_illegal(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

/// Returns `true` if every character of `value` is allowed in XML text.
///
/// ```rust
/// use sitegen_core::text::{clean_input, is_xml_safe};
///
/// assert!(is_xml_safe("/urun/a-b/"));
/// assert!(!is_xml_safe(&clean_input("/urun/a%01b/")));
/// ```
#[must_use]
pub fn is_xml_safe(value: &str) -> bool {
    !value.chars().any(is_xml_illegal)
}

/// Map Turkish letters onto their closest ASCII counterparts.
const fn transliterate(c: char) -> Option<char> {
    match c {
        'ç' | 'Ç' => Some('c'),
        'ğ' | 'Ğ' => Some('g'),
        'ı' | 'İ' => Some('i'),
        'ö' | 'Ö' => Some('o'),
        'ş' | 'Ş' => Some('s'),
        'ü' | 'Ü' => Some('u'),
        _ => None,
    }
}

/// Turn free text into a lowercase, hyphen-separated slug.
///
/// Turkish letters are transliterated before case folding; every character
/// that is not an ASCII letter, digit, whitespace or hyphen is dropped; runs
/// of whitespace and hyphens collapse into one hyphen; edge hyphens are
/// trimmed. An empty result means no page can be derived from the input.
///
/// ```rust
/// use sitegen_core::text::slugify;
///
/// assert_eq!(slugify("Endüstriyel Pompa"), "endustriyel-pompa");
/// assert_eq!(slugify("  --Çift -- Etkili--  "), "cift-etkili");
/// assert_eq!(slugify("   "), "");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_separator = false;

    for c in value.chars() {
        let mapped = transliterate(c).unwrap_or(c);
        for lower in mapped.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(lower);
            } else if lower.is_whitespace() || lower == '-' {
                pending_separator = true;
            }
        }
    }

    slug
}
