//! Run summary output.

use colored::Colorize;
use serde::Serialize;
use sitegen_core::{GenerateCounts, UploadResponse};
use std::path::Path;

use crate::cli::OutputFormat;

/// How the upload step ended, if one was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// The endpoint stored the sitemap.
    Uploaded {
        /// Endpoint URL.
        url: String,
        /// Server-side path, when reported.
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// The upload failed; the local file is still in place.
    Failed {
        /// Endpoint URL.
        url: String,
        /// Failure description.
        error: String,
    },
}

impl UploadOutcome {
    /// Outcome for a successful upload.
    #[must_use]
    pub fn uploaded(url: &str, reply: UploadResponse) -> Self {
        Self::Uploaded {
            url: url.to_string(),
            path: reply.path,
        }
    }
}

/// JSON report printed with `--format json`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// Sitemap path written.
    pub output: &'a Path,
    /// Per-source counts.
    #[serde(flatten)]
    pub counts: GenerateCounts,
    /// Upload result, when `--upload-url` was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<&'a UploadOutcome>,
}

/// The one-line text summary.
#[must_use]
pub fn summary_line(output: &Path, counts: &GenerateCounts) -> String {
    format!(
        "Wrote {} with {} URLs (products: {}, categories: {})",
        output.display(),
        counts.total,
        counts.summary_products(),
        counts.category_pages
    )
}

/// Print the run summary to stdout in the requested format.
///
/// # Errors
///
/// Returns an error if the JSON report cannot be serialized.
pub fn print_summary(
    format: OutputFormat,
    output: &Path,
    counts: &GenerateCounts,
    upload: Option<&UploadOutcome>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", summary_line(output, counts).green());
            match upload {
                Some(UploadOutcome::Uploaded { url, path }) => {
                    let target = path.as_deref().unwrap_or(url);
                    println!("Uploaded sitemap to {}", target.cyan());
                },
                Some(UploadOutcome::Failed { url, error }) => {
                    println!("{} upload to {url} failed: {error}", "warning:".yellow());
                },
                None => {},
            }
        },
        OutputFormat::Json => {
            let report = RunReport {
                output,
                counts: *counts,
                upload,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        },
    }
    Ok(())
}
