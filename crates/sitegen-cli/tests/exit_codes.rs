#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use tempfile::tempdir;

mod common;
use common::sitegen_cmd;

#[test]
fn invalid_base_is_usage_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    sitegen_cmd(dir.path())
        .args(["--base", "ftp://example.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--base"));
    assert!(!dir.path().join("sitemap.xml").exists());
    Ok(())
}

#[test]
fn out_of_range_priority_is_usage_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    sitegen_cmd(dir.path())
        .args(["--category-priority", "1.2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--category-priority"));
    Ok(())
}

#[test]
fn unknown_changefreq_is_usage_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    sitegen_cmd(dir.path())
        .args(["--product-changefreq", "sometimes"])
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn missing_explicit_config_is_not_found() -> anyhow::Result<()> {
    let dir = tempdir()?;
    sitegen_cmd(dir.path())
        .args(["--config", "absent.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("config file not found"));
    Ok(())
}

#[test]
fn invalid_config_file_is_usage_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("sitegen.toml"), "base_url = [1, 2]")?;
    sitegen_cmd(dir.path()).assert().code(2);
    Ok(())
}

#[test]
fn unwritable_output_is_output_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    // a regular file where the output directory should be
    std::fs::write(dir.path().join("public"), "not a directory")?;
    sitegen_cmd(dir.path())
        .args(["-b", "https://example.com", "-o", "public/sitemap.xml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("failed to write public/sitemap.xml"));
    Ok(())
}
