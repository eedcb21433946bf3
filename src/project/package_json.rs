use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::prompt::Prompter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageJsonUpdate {
    pub updated: bool,
    /// `None` when the project has no package.json
    pub path: Option<PathBuf>,
}

/// Set `package.json`'s `license` field to `spdx`.
///
/// Replacing a different existing value needs confirmation (`--yes` or a
/// prompt); in non-interactive mode without `--yes` that is an error. Key
/// order of the document is preserved.
pub fn update_package_json_license(
    cwd: &Path,
    spdx: &str,
    yes: bool,
    non_interactive: bool,
    prompter: &mut dyn Prompter,
) -> Result<PackageJsonUpdate> {
    let path = cwd.join("package.json");
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(PackageJsonUpdate {
                updated: false,
                path: None,
            });
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    };

    let mut document: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let data = document
        .as_object_mut()
        .ok_or_else(|| anyhow!("{} is not a JSON object", path.display()))?;

    let current = data.get("license").and_then(Value::as_str).map(str::to_string);
    match current.as_deref() {
        Some(current) if current == spdx => {
            return Ok(PackageJsonUpdate {
                updated: false,
                path: Some(path),
            });
        }
        Some(current) => {
            if non_interactive && !yes {
                return Err(anyhow!(
                    "package.json license update requires confirmation in non-interactive mode. Provide --yes."
                ));
            }
            let confirmed = yes
                || prompter.confirm(&format!(
                    "Update package.json license from {} to {}?",
                    current, spdx
                ))?;
            if !confirmed {
                return Ok(PackageJsonUpdate {
                    updated: false,
                    path: Some(path),
                });
            }
        }
        None => {}
    }

    data.insert("license".to_string(), Value::String(spdx.to_string()));
    let serialized = serde_json::to_string_pretty(&document)?;
    fs::write(&path, serialized + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(PackageJsonUpdate {
        updated: true,
        path: Some(path),
    })
}
