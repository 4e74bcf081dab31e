//! # CLI Structure and Argument Parsing
//!
//! `sitegen` is a single command: every invocation resolves a configuration,
//! gathers URLs from one data source and writes one sitemap file.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Local JSON exports (default paths under upload_folders/)
//! sitegen --base https://ketenpnomatik.com --out sitemap.xml
//!
//! # Export API instead of local files
//! sitegen --api-url https://ketenpnomatik.com/php/api/export_sitemap_data.php --api-key "$KEY"
//!
//! # Override metadata per entry class
//! sitegen --product-priority 0.4 --product-changefreq weekly
//!
//! # Inspect the document without writing it
//! sitegen --dry-run | head
//! ```
//!
//! ## Configuration Precedence
//!
//! Built-in defaults, then the TOML config file (`--config`, or `sitegen.toml`
//! in the working directory), then environment variables and flags.

use clap::{Parser, ValueEnum};
use sitegen_core::ChangeFrequency;
use sitegen_core::api::DEFAULT_EXPORT_LIMIT;
use std::path::PathBuf;

/// Default product export path.
pub const DEFAULT_PRODUCTS_PATH: &str = "upload_folders/product_upload_v4.json";

/// Default category export path.
pub const DEFAULT_CATEGORIES_PATH: &str = "upload_folders/category_upload.json";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "sitegen.toml";

/// Output format for the run summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable summary line (default)
    #[default]
    Text,
    /// JSON report with counts and paths
    Json,
}

/// Main CLI structure for the `sitegen` command
///
/// # Examples
///
/// ```bash
/// # Verbose run against a staging host
/// sitegen -v --base https://staging.ketenpnomatik.com -o public/sitemap.xml
///
/// # Generate and push to the upload endpoint
/// sitegen --upload-url https://ketenpnomatik.com/php/api/generate_sitemap.php
/// ```
#[derive(Parser, Clone, Debug)]
#[command(name = "sitegen")]
#[command(version)]
#[command(about = "sitegen - static XML sitemap generator for the storefront", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Base URL every location is prefixed with (e.g. <https://ketenpnomatik.com>)
    #[arg(short = 'b', long, env = "SITEGEN_BASE_URL")]
    pub base: Option<String>,

    /// Path to the product JSON export
    #[arg(long, default_value = DEFAULT_PRODUCTS_PATH)]
    pub products: PathBuf,

    /// Path to the category JSON export
    #[arg(long, default_value = DEFAULT_CATEGORIES_PATH)]
    pub categories: PathBuf,

    /// Export API URL; when set, local JSON files are not read
    #[arg(long, env = "SITEGEN_API_URL")]
    pub api_url: Option<String>,

    /// API key sent in the X-API-Key header with --api-url
    #[arg(long, env = "SITEGEN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Rows requested from the export API
    #[arg(long, default_value_t = DEFAULT_EXPORT_LIMIT)]
    pub api_limit: u32,

    /// Rows skipped by the export API
    #[arg(long, default_value_t = 0)]
    pub api_offset: u32,

    /// Priority for priority pages and router routes (0.0-1.0)
    #[arg(long, value_name = "PRIORITY")]
    pub static_priority: Option<f64>,

    /// Priority for category pages (0.0-1.0)
    #[arg(long, value_name = "PRIORITY")]
    pub category_priority: Option<f64>,

    /// Priority for product pages (0.0-1.0)
    #[arg(long, value_name = "PRIORITY")]
    pub product_priority: Option<f64>,

    /// Change frequency for priority pages and router routes
    #[arg(long, value_name = "FREQ")]
    pub static_changefreq: Option<ChangeFrequency>,

    /// Change frequency for category pages
    #[arg(long, value_name = "FREQ")]
    pub category_changefreq: Option<ChangeFrequency>,

    /// Change frequency for product pages
    #[arg(long, value_name = "FREQ")]
    pub product_changefreq: Option<ChangeFrequency>,

    /// Output sitemap path
    #[arg(short = 'o', long, default_value = "sitemap.xml")]
    pub out: PathBuf,

    /// TOML config file (defaults to ./sitegen.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Front-end router file scanned for static routes
    #[arg(long, value_name = "PATH")]
    pub router_source: Option<PathBuf>,

    /// Endpoint that receives the rendered sitemap via POST
    #[arg(long, value_name = "URL")]
    pub upload_url: Option<String>,

    /// API key sent in the X-API-Key header with --upload-url
    #[arg(long, env = "SITEGEN_UPLOAD_KEY", hide_env_values = true)]
    pub upload_key: Option<String>,

    /// Summary output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the sitemap to stdout instead of writing --out
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sitegen"]).unwrap();
        assert_eq!(cli.products, PathBuf::from(DEFAULT_PRODUCTS_PATH));
        assert_eq!(cli.categories, PathBuf::from(DEFAULT_CATEGORIES_PATH));
        assert_eq!(cli.out, PathBuf::from("sitemap.xml"));
        assert_eq!(cli.api_limit, 10_000);
        assert_eq!(cli.api_offset, 0);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.static_priority.is_none());
    }

    #[test]
    fn test_parses_overrides() {
        let cli = Cli::try_parse_from([
            "sitegen",
            "-b",
            "https://example.com",
            "--product-priority",
            "0.4",
            "--category-changefreq",
            "Daily",
            "-o",
            "public/sitemap.xml",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.base.as_deref(), Some("https://example.com"));
        assert_eq!(cli.product_priority, Some(0.4));
        assert_eq!(cli.category_changefreq, Some(ChangeFrequency::Daily));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_changefreq() {
        assert!(Cli::try_parse_from(["sitegen", "--static-changefreq", "fortnightly"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["sitegen", "-q", "-v"]).is_err());
    }
}
