//! Re-pin the `sha256` of every catalog entry to the text its `url` serves.
//!
//! Run after upstream license texts change, when scaffolding stops with a
//! fingerprint mismatch:
//!
//! ```text
//! cargo run -p nicelicense-xtask --bin refresh-catalog-digests -- data/licenses.json
//! cargo run -p nicelicense-xtask --bin refresh-catalog-digests -- --check
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use nicelicense::catalog::{CatalogLocation, parse_catalog};
use nicelicense::fetch::{FetchConfig, LicenseSource, SourceFetcher};
use nicelicense::license::sha256_hex;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(about = "Refresh pinned SHA-256 digests in a license catalog")]
struct Args {
    /// Catalog file to refresh
    #[arg(default_value = "data/licenses.json")]
    catalog: PathBuf,

    /// Only report drift; exit non-zero if any digest is stale
    #[arg(long)]
    check: bool,

    /// Also pin entries that have no digest yet
    #[arg(long)]
    pin_missing: bool,

    /// Per-download timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    checked: usize,
    stale: Vec<String>,
    failed: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let location = CatalogLocation::File(args.catalog.clone());
    let config = FetchConfig {
        timeout: Duration::from_secs(args.timeout),
        ..FetchConfig::default()
    };
    let fetcher = SourceFetcher::new(&config, location.local_root())?;

    let summary = refresh(&args.catalog, &fetcher, args.check, args.pin_missing)?;
    println!(
        "Checked {} entries: {} stale, {} failed",
        summary.checked,
        summary.stale.len(),
        summary.failed.len()
    );

    if !summary.failed.is_empty() {
        bail!("Could not fetch: {}", summary.failed.join(", "));
    }
    if args.check && !summary.stale.is_empty() {
        bail!("Stale digests: {}", summary.stale.join(", "));
    }
    Ok(())
}

fn refresh(
    catalog_path: &Path,
    source: &dyn LicenseSource,
    check_only: bool,
    pin_missing: bool,
) -> Result<Summary> {
    let raw = fs::read_to_string(catalog_path)
        .with_context(|| format!("Failed to read {}", catalog_path.display()))?;
    let licenses = parse_catalog(&raw)?;
    let mut document: Value = serde_json::from_str(&raw)?;
    let entries = document
        .as_array_mut()
        .ok_or_else(|| anyhow!("License list JSON must be an array."))?;

    let mut summary = Summary::default();
    for (license, entry) in licenses.iter().zip(entries.iter_mut()) {
        if license.expected_digest.is_none() && !pin_missing {
            continue;
        }
        summary.checked += 1;

        let text = match source.fetch(&license.source_location) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{}: {}", license.spdx, e);
                summary.failed.push(license.spdx.clone());
                continue;
            }
        };

        let actual = sha256_hex(text.as_bytes());
        if license.expected_digest.as_deref() == Some(actual.as_str()) {
            continue;
        }

        println!(
            "{}: {} -> {}",
            license.spdx,
            license.expected_digest.as_deref().unwrap_or("(none)"),
            actual
        );
        if !license.replacements().is_empty() {
            println!("  template offsets may be stale; re-check them against the new text");
        }
        summary.stale.push(license.spdx.clone());

        if let Some(object) = entry.as_object_mut() {
            object.insert("sha256".to_string(), Value::String(actual));
        }
    }

    if !check_only && !summary.stale.is_empty() {
        let serialized = serde_json::to_string_pretty(&document)?;
        fs::write(catalog_path, serialized + "\n")
            .with_context(|| format!("Failed to write {}", catalog_path.display()))?;
    }

    Ok(summary)
}
