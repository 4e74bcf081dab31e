//! sitegen CLI - static XML sitemap generation for the storefront
//!
//! Resolves configuration, gathers URLs from local exports or the export
//! API, writes the sitemap atomically and optionally uploads it.
use anyhow::{Context, Result};
use clap::Parser;
use sitegen_core::{
    ExportClient, SitemapEntry, UploadResponse, generate, render_sitemap, sitemap, write_sitemap,
};
use tracing::{info, warn};

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod settings;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{UploadOutcome, print_summary};

/// Execute the sitegen CLI with the current process arguments.
///
/// # Errors
///
/// Returns a [`CliError`]-wrapped error for configuration problems and for
/// failures writing the sitemap. Missing inputs and network failures are
/// logged and do not produce an error.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize_logging(&cli).map_err(CliError::internal)?;
    run_with(cli).await
}

/// Execute an already-parsed invocation.
///
/// # Errors
///
/// See [`run`].
pub async fn run_with(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()
        .context("could not determine working directory")
        .map_err(CliError::internal)?;
    let config = settings::resolve_site_config(&cli, &cwd)?;
    let source = settings::data_source(&cli);

    let report = generate(&config, &source).await;

    if cli.dry_run {
        let xml = render_sitemap(&report.entries).map_err(CliError::internal)?;
        sitemap::verify_rendered(&xml, &report.entries).map_err(CliError::internal)?;
        print!("{xml}");
        info!(urls = report.counts.total, "Dry run, nothing written");
        return Ok(());
    }

    write_sitemap(&report.entries, &cli.out)
        .with_context(|| format!("failed to write {}", cli.out.display()))
        .map_err(CliError::output)?;

    let upload = match cli.upload_url.as_deref() {
        Some(url) => Some(upload_sitemap(url, cli.upload_key.as_deref(), &report.entries).await),
        None => None,
    };

    print_summary(cli.format, &cli.out, &report.counts, upload.as_ref())
        .map_err(CliError::internal)?;
    Ok(())
}

async fn upload_sitemap(
    url: &str,
    key: Option<&str>,
    entries: &[SitemapEntry],
) -> UploadOutcome {
    match try_upload(url, key, entries).await {
        Ok(reply) => UploadOutcome::uploaded(url, reply),
        Err(e) => {
            warn!(url, error = %e, "Sitemap upload failed, local file kept");
            UploadOutcome::Failed {
                url: url.to_string(),
                error: e.to_string(),
            }
        },
    }
}

async fn try_upload(
    url: &str,
    key: Option<&str>,
    entries: &[SitemapEntry],
) -> sitegen_core::Result<UploadResponse> {
    let xml = render_sitemap(entries)?;
    ExportClient::new()?.upload_sitemap(url, key, &xml).await
}
