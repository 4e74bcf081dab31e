//! Raw export records and the local JSON loader.
//!
//! Exports arrive as loosely-typed rows: spreadsheet dumps wrapped in a
//! `Sheet1` key, bare arrays, or the arrays of the export API. No schema is
//! enforced here. Rows are kept as JSON objects and fields are looked up by a
//! list of candidate keys at the point of use.

use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One row of an export, kept as an untyped JSON object.
pub type RawRecord = Map<String, Value>;

/// Keys that spreadsheet exports use to wrap their row array.
const SHEET_KEYS: &[&str] = &["Sheet1", "sheet1"];

/// Read the first usable text value among `keys`.
///
/// Strings are returned as-is and numbers as their JSON text. Empty strings,
/// `null`, booleans, arrays and objects are skipped so the next key is tried.
#[must_use]
pub fn field_text(record: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Extract the row list from a parsed export document.
///
/// Accepts `{"Sheet1": [...]}`, `{"sheet1": [...]}` or a bare array. Rows that
/// are not JSON objects are dropped.
pub fn rows_from_value(value: Value) -> Result<Vec<RawRecord>> {
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(mut map) => {
            let sheet = SHEET_KEYS
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(rows)) => Some(rows),
                    _ => None,
                });
            sheet.ok_or_else(|| {
                Error::Parse("expected a Sheet1/sheet1 array or a top-level array".to_string())
            })?
        },
        other => {
            return Err(Error::Parse(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )));
        },
    };

    Ok(into_objects(rows))
}

/// Keep only the object rows of an array.
#[must_use]
pub fn into_objects(rows: Vec<Value>) -> Vec<RawRecord> {
    let total = rows.len();
    let objects: Vec<RawRecord> = rows
        .into_iter()
        .filter_map(|row| match row {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();

    if objects.len() < total {
        debug!(
            skipped = total - objects.len(),
            "Dropped non-object rows from export"
        );
    }
    objects
}

/// Parse export rows from file contents, tolerating a leading byte-order mark.
pub fn parse_rows(content: &str) -> Result<Vec<RawRecord>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let value: Value = serde_json::from_str(content)?;
    rows_from_value(value)
}

/// Load export rows from a local JSON file.
///
/// Returns `Ok(None)` when the file does not exist so callers can warn and
/// move on; read and parse failures are returned as errors.
pub fn load_rows(path: &Path) -> Result<Option<Vec<RawRecord>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    parse_rows(&content).map(Some)
}

/// Load export rows, degrading every failure to an empty list with a warning.
///
/// `label` names the input in log output (`"product"`, `"category"`).
#[must_use]
pub fn load_rows_or_empty(path: &Path, label: &str) -> Vec<RawRecord> {
    match load_rows(path) {
        Ok(Some(rows)) => {
            tracing::info!(rows = rows.len(), path = %path.display(), "Loaded {label} rows");
            rows
        },
        Ok(None) => {
            warn!(path = %path.display(), "{label} JSON not found, skipping");
            Vec::new()
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read {label} JSON, skipping");
            Vec::new()
        },
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
