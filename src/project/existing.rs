use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::license::ExistingLicenseFile;

/// Candidate LICENSE file names, in lookup order.
pub const LICENSE_FILES: [&str; 3] = ["LICENSE", "LICENSE.txt", "LICENSE.md"];

/// First LICENSE file present in `cwd`. Missing files are skipped; any other
/// read error is returned.
pub fn find_existing_license(cwd: &Path) -> Result<Option<ExistingLicenseFile>> {
    for filename in LICENSE_FILES {
        let path = cwd.join(filename);
        match fs::read_to_string(&path) {
            Ok(text) => {
                return Ok(Some(ExistingLicenseFile {
                    path,
                    filename: filename.to_string(),
                    text,
                }));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_license_file() {
        let dir = tempdir().unwrap();
        assert!(find_existing_license(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_lookup_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("LICENSE.md"), "markdown").unwrap();
        fs::write(dir.path().join("LICENSE.txt"), "plain").unwrap();

        let found = find_existing_license(dir.path()).unwrap().unwrap();
        assert_eq!(found.filename, "LICENSE.txt");
        assert_eq!(found.text, "plain");
        assert_eq!(found.path, dir.path().join("LICENSE.txt"));
    }

    #[test]
    fn test_unreadable_candidate_is_an_error() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("LICENSE")).unwrap();
        assert!(find_existing_license(dir.path()).is_err());
    }
}
