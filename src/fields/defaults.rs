use std::path::Path;
use std::process::Command;

use chrono::{Datelike, Local};
use log::debug;

use crate::license::FieldValues;

/// Read a git config value, treating any failure or blank value as unset.
pub fn git_config(cwd: &Path, key: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--get", key])
        .current_dir(cwd)
        .output()
        .map_err(|e| debug!("git config --get {} failed: {}", key, e))
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Defaults for the known fields: holder name and organization from git's
/// `user.name`, email from `user.email`, the current year, and the working
/// directory's name as the software name.
pub fn detect_defaults(cwd: &Path) -> FieldValues {
    let mut defaults = FieldValues::new();

    if let Some(name) = git_config(cwd, "user.name") {
        defaults.insert("organization", name.clone());
        defaults.insert("name", name);
    }
    if let Some(email) = git_config(cwd, "user.email") {
        defaults.insert("email", email);
    }

    defaults.insert("years", Local::now().year().to_string());

    if let Some(dir_name) = cwd.file_name() {
        defaults.insert("software", dir_name.to_string_lossy());
    }

    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_detect_defaults_year_and_software() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("my-project");
        std::fs::create_dir(&project).unwrap();

        let defaults = detect_defaults(&project);
        assert_eq!(defaults.get("software"), Some("my-project"));
        assert_eq!(defaults.get("years"), Some(Local::now().year().to_string().as_str()));
    }

    #[test]
    fn test_git_config_unknown_key_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(git_config(dir.path(), "nicelicense.no-such-key"), None);
    }
}
