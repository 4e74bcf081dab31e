//! Resolve the run configuration from defaults, the config file and flags.

use anyhow::{Context, anyhow};
use sitegen_core::api::ExportRequest;
use sitegen_core::{ConfigFile, DataSource, EntryClass, SiteConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::{Cli, DEFAULT_CONFIG_FILE};
use crate::error::CliError;

/// Build the [`SiteConfig`] for this invocation.
///
/// `cwd` is where an implicit `sitegen.toml` is looked up.
///
/// # Errors
///
/// Returns a not-found error when `--config` names a missing file, and a
/// usage error for unparsable files, bad base URLs and out-of-range
/// priorities.
pub fn resolve_site_config(cli: &Cli, cwd: &Path) -> Result<SiteConfig, CliError> {
    let mut config = SiteConfig::default();

    if let Some(path) = config_file_path(cli, cwd)? {
        debug!(path = %path.display(), "Loading config file");
        let file = ConfigFile::load(&path)
            .with_context(|| format!("invalid config file {}", path.display()))
            .map_err(CliError::usage)?;
        config
            .apply_file(file)
            .with_context(|| format!("invalid value in config file {}", path.display()))
            .map_err(CliError::usage)?;
    }

    if let Some(base) = &cli.base {
        config
            .set_base_url(base)
            .context("invalid --base")
            .map_err(CliError::usage)?;
    }
    if let Some(source) = &cli.router_source {
        config.route_source = Some(source.clone());
    }

    for (class, priority, flag) in [
        (EntryClass::Static, cli.static_priority, "--static-priority"),
        (EntryClass::Category, cli.category_priority, "--category-priority"),
        (EntryClass::Product, cli.product_priority, "--product-priority"),
    ] {
        if let Some(priority) = priority {
            config
                .set_priority(class, priority)
                .with_context(|| format!("invalid {flag}"))
                .map_err(CliError::usage)?;
        }
    }

    for (class, changefreq) in [
        (EntryClass::Static, cli.static_changefreq),
        (EntryClass::Category, cli.category_changefreq),
        (EntryClass::Product, cli.product_changefreq),
    ] {
        if let Some(changefreq) = changefreq {
            config.set_changefreq(class, changefreq);
        }
    }

    Ok(config)
}

/// Pick the config file: the explicit `--config` path (which must exist) or
/// an optional `sitegen.toml` in `cwd`.
fn config_file_path(cli: &Cli, cwd: &Path) -> Result<Option<PathBuf>, CliError> {
    match &cli.config {
        Some(path) if path.is_file() => Ok(Some(path.clone())),
        Some(path) => Err(CliError::not_found(anyhow!(
            "config file not found: {}",
            path.display()
        ))),
        None => {
            let implicit = cwd.join(DEFAULT_CONFIG_FILE);
            Ok(implicit.is_file().then_some(implicit))
        },
    }
}

/// Select the data source: the export API when `--api-url` is set, local
/// JSON exports otherwise.
#[must_use]
pub fn data_source(cli: &Cli) -> DataSource {
    match cli.api_url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => {
            let mut request = ExportRequest::new(url).with_api_key(cli.api_key.clone());
            request.limit = cli.api_limit;
            request.offset = cli.api_offset;
            DataSource::Api(request)
        },
        None => DataSource::Local {
            products: cli.products.clone(),
            categories: cli.categories.clone(),
        },
    }
}
