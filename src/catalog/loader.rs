//! Parse and sanity-check catalog files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::warn;
use serde_json::Value;

use super::{BUNDLED_CATALOG, BUNDLED_DATA};
use crate::fetch::LocalRoot;
use crate::license::LicenseDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    Bundled,
    File(PathBuf),
}

impl CatalogLocation {
    /// Pick the catalog from the `--data` flag, then the environment, then
    /// the bundled copy. Relative paths are resolved against `cwd`; empty
    /// values count as unset.
    pub fn resolve(flag: Option<&str>, env_value: Option<&str>, cwd: &Path) -> Self {
        let nonblank = |value: &&str| !value.trim().is_empty();
        match flag.filter(nonblank).or(env_value.filter(nonblank)) {
            Some(path) => Self::File(cwd.join(path)),
            None => Self::Bundled,
        }
    }

    /// Where relative source locations in this catalog resolve.
    pub fn local_root(&self) -> LocalRoot {
        match self {
            Self::Bundled => LocalRoot::Bundled,
            Self::File(path) => LocalRoot::Directory(
                path.parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
            ),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled catalog".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub location: CatalogLocation,
    pub licenses: Vec<LicenseDescriptor>,
}

impl Catalog {
    pub fn load(location: CatalogLocation) -> Result<Self> {
        let raw = match &location {
            CatalogLocation::Bundled => BUNDLED_DATA
                .get_file(BUNDLED_CATALOG)
                .and_then(|file| file.contents_utf8())
                .ok_or_else(|| anyhow!("Bundled catalog {} is missing", BUNDLED_CATALOG))?
                .to_string(),
            CatalogLocation::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read license catalog: {}", path.display()))?,
        };

        let licenses = parse_catalog(&raw)
            .with_context(|| format!("Invalid license catalog: {}", location.describe()))?;

        Ok(Self { location, licenses })
    }

    pub fn find(&self, spdx: &str) -> Option<&LicenseDescriptor> {
        self.licenses.iter().find(|license| license.spdx == spdx)
    }
}

/// Parse a catalog document. Suspicious but usable entries are logged, not
/// rejected.
pub fn parse_catalog(raw: &str) -> Result<Vec<LicenseDescriptor>> {
    let document: Value = serde_json::from_str(raw).context("Failed to parse catalog JSON")?;
    if !document.is_array() {
        return Err(anyhow!("License list JSON must be an array."));
    }

    let licenses: Vec<LicenseDescriptor> =
        serde_json::from_value(document).context("Malformed license entry")?;

    let mut seen = HashSet::new();
    for license in &licenses {
        if !seen.insert(license.spdx.as_str()) {
            warn!(
                "Duplicate catalog entry for {}; only the first is used",
                license.spdx
            );
        }
        check_entry(license);
    }

    Ok(licenses)
}

fn check_entry(license: &LicenseDescriptor) {
    if license.fingerprints.iter().any(|f| f.trim().is_empty()) {
        warn!(
            "{} has an empty fingerprint, which matches any text",
            license.spdx
        );
    }

    let declared = license.required_fields();
    for replacement in license.replacements() {
        if !declared.contains(&replacement.field) {
            warn!(
                "{} replaces undeclared field '{}'",
                license.spdx, replacement.field
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_precedence() {
        let cwd = Path::new("/work");
        assert_eq!(
            CatalogLocation::resolve(Some("flag.json"), Some("/env.json"), cwd),
            CatalogLocation::File(PathBuf::from("/work/flag.json"))
        );
        assert_eq!(
            CatalogLocation::resolve(None, Some("/env.json"), cwd),
            CatalogLocation::File(PathBuf::from("/env.json"))
        );
        assert_eq!(
            CatalogLocation::resolve(None, None, cwd),
            CatalogLocation::Bundled
        );
        assert_eq!(
            CatalogLocation::resolve(None, Some(""), cwd),
            CatalogLocation::Bundled
        );
    }

    #[test]
    fn test_resolve_empty_flag_falls_back_to_environment() {
        let cwd = Path::new("/work");
        assert_eq!(
            CatalogLocation::resolve(Some(""), Some("/env.json"), cwd),
            CatalogLocation::File(PathBuf::from("/env.json"))
        );
        assert_eq!(
            CatalogLocation::resolve(Some("  "), None, cwd),
            CatalogLocation::Bundled
        );
    }

    #[test]
    fn test_local_root_is_catalog_directory() {
        let location = CatalogLocation::File(PathBuf::from("/work/data/licenses.json"));
        assert_eq!(
            location.local_root(),
            LocalRoot::Directory(PathBuf::from("/work/data"))
        );
        assert_eq!(CatalogLocation::Bundled.local_root(), LocalRoot::Bundled);
    }

    #[test]
    fn test_parse_catalog_rejects_non_array() {
        let err = parse_catalog(r#"{"spdx": "MIT"}"#).unwrap_err();
        assert_eq!(err.to_string(), "License list JSON must be an array.");
    }

    #[test]
    fn test_parse_catalog_rejects_missing_fields() {
        assert!(parse_catalog(r#"[{"spdx": "MIT"}]"#).is_err());
    }

    #[test]
    fn test_parse_catalog_keeps_order() {
        let licenses = parse_catalog(
            r#"[
                {"spdx": "MIT", "name": "MIT License", "url": "https://example.com/mit"},
                {"spdx": "ISC", "name": "ISC License", "url": "https://example.com/isc"},
                {"spdx": "MIT", "name": "Duplicate", "url": "https://example.com/dup"}
            ]"#,
        )
        .unwrap();
        let ids: Vec<_> = licenses.iter().map(|l| l.spdx.as_str()).collect();
        assert_eq!(ids, ["MIT", "ISC", "MIT"]);
    }

    #[test]
    fn test_load_from_file_and_find() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("licenses.json");
        fs::write(
            &path,
            r#"[{"spdx": "MIT", "name": "MIT License", "url": "https://example.com/mit"},
               {"spdx": "MIT", "name": "Shadowed", "url": "https://example.com/other"}]"#,
        )
        .unwrap();

        let catalog = Catalog::load(CatalogLocation::File(path)).unwrap();
        assert_eq!(catalog.licenses.len(), 2);
        assert_eq!(catalog.find("MIT").unwrap().name, "MIT License");
        assert!(catalog.find("Apache-2.0").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Catalog::load(CatalogLocation::File(dir.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read license catalog"));
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::load(CatalogLocation::Bundled).unwrap();
        for spdx in ["MIT", "Apache-2.0", "BSD-3-Clause", "Unlicense"] {
            assert!(catalog.find(spdx).is_some(), "{} missing", spdx);
        }
    }

    #[test]
    fn test_bundled_catalog_entries_are_identifiable() {
        let catalog = Catalog::load(CatalogLocation::Bundled).unwrap();
        for license in &catalog.licenses {
            assert!(
                !license.fingerprints.is_empty(),
                "{} has no fingerprints",
                license.spdx
            );
        }
    }
}
