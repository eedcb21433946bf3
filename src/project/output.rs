use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::license::ExistingLicenseFile;
use crate::prompt::Prompter;

/// Decide where the LICENSE is written.
///
/// An explicit path wins, then the existing LICENSE file, then `LICENSE`
/// when `--yes` was given. Otherwise the user is asked, which is not
/// possible in non-interactive mode.
pub fn resolve_output_path(
    cwd: &Path,
    existing: Option<&ExistingLicenseFile>,
    requested: Option<&str>,
    yes: bool,
    non_interactive: bool,
    prompter: &mut dyn Prompter,
) -> Result<PathBuf> {
    if let Some(path) = requested {
        return Ok(cwd.join(path));
    }
    if let Some(existing) = existing {
        return Ok(existing.path.clone());
    }
    if yes {
        return Ok(cwd.join("LICENSE"));
    }
    if non_interactive {
        return Err(anyhow!(
            "Output path is required in non-interactive mode. Provide --path or --yes."
        ));
    }

    let answer = prompter.input("Where do you want to save the file", "LICENSE")?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(anyhow!("Output path is required."));
    }
    Ok(cwd.join(answer))
}

/// Write `text` with trailing whitespace trimmed and a single final newline,
/// creating parent directories as needed.
pub fn write_license_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", text.trim_end()))
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use tempfile::tempdir;

    #[test]
    fn test_default_license_with_yes() {
        let mut prompter = ScriptedPrompter::new();
        let path =
            resolve_output_path(Path::new("/tmp"), None, None, true, false, &mut prompter).unwrap();
        assert_eq!(path, Path::new("/tmp").join("LICENSE"));
    }

    #[test]
    fn test_requires_path_in_non_interactive_mode() {
        let mut prompter = ScriptedPrompter::new();
        let err = resolve_output_path(Path::new("/tmp"), None, None, false, true, &mut prompter)
            .unwrap_err();
        assert!(err.to_string().contains("Output path is required"));
    }

    #[test]
    fn test_explicit_path_beats_existing() {
        let existing = ExistingLicenseFile {
            path: PathBuf::from("/work/LICENSE.md"),
            filename: "LICENSE.md".to_string(),
            text: String::new(),
        };
        let mut prompter = ScriptedPrompter::new();

        let path = resolve_output_path(
            Path::new("/work"),
            Some(&existing),
            Some("docs/LICENSE"),
            false,
            true,
            &mut prompter,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/work/docs/LICENSE"));

        let path =
            resolve_output_path(Path::new("/work"), Some(&existing), None, false, true, &mut prompter)
                .unwrap();
        assert_eq!(path, PathBuf::from("/work/LICENSE.md"));
    }

    #[test]
    fn test_prompts_for_path() {
        let mut prompter = ScriptedPrompter::new().answer_input("COPYING");
        let path =
            resolve_output_path(Path::new("/work"), None, None, false, false, &mut prompter)
                .unwrap();
        assert_eq!(path, PathBuf::from("/work/COPYING"));
    }

    #[test]
    fn test_write_creates_parents_and_normalizes_ending() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("licenses/third-party/LICENSE");

        write_license_file(&path, "MIT License\n\n\n  ").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "MIT License\n");
    }
}
