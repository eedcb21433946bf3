//! Fetch a descriptor's canonical text and check it against its pinned digest.

use crate::fetch::{FetchError, LicenseSource};
use crate::license::integrity::{IntegrityError, verify};
use crate::license::models::LicenseDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    Fetch(FetchError),
    Integrity(IntegrityError),
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(e) => e.fmt(f),
            Self::Integrity(e) => e.fmt(f),
        }
    }
}

// Display is transparent, so the wrapped error is not repeated as a source.
impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => std::error::Error::source(e),
            Self::Integrity(e) => std::error::Error::source(e),
        }
    }
}

impl From<FetchError> for DownloadError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<IntegrityError> for DownloadError {
    fn from(e: IntegrityError) -> Self {
        Self::Integrity(e)
    }
}

/// Download the canonical text of `license`, rejecting it if the catalog
/// pins a digest the text does not match.
pub fn download_license(
    license: &LicenseDescriptor,
    source: &dyn LicenseSource,
) -> Result<String, DownloadError> {
    let text = source.fetch(&license.source_location)?;
    verify(&license.spdx, &text, license.expected_digest.as_deref())?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::integrity::sha256_hex;
    use crate::license::test_utils::{StaticSource, descriptor};

    #[test]
    fn test_download_enforces_digest() {
        let source = StaticSource::new([("x", "license text")]);
        let mut license = descriptor("MIT", &[]);
        license.source_location = "x".to_string();

        license.expected_digest = Some("bad".to_string());
        let err = download_license(&license, &source).unwrap_err();
        assert!(matches!(err, DownloadError::Integrity(_)));
        assert!(err.to_string().contains("Fingerprint mismatch"));

        license.expected_digest = Some(sha256_hex(b"license text"));
        assert_eq!(download_license(&license, &source).unwrap(), "license text");
    }

    #[test]
    fn test_download_without_digest() {
        let source = StaticSource::new([("x", "unpinned")]);
        let mut license = descriptor("MIT", &[]);
        license.source_location = "x".to_string();

        assert_eq!(download_license(&license, &source).unwrap(), "unpinned");
    }

    #[test]
    fn test_download_propagates_fetch_error() {
        let source = StaticSource::empty();
        let mut license = descriptor("MIT", &[]);
        license.source_location = "missing".to_string();

        assert!(matches!(
            download_license(&license, &source),
            Err(DownloadError::Fetch(_))
        ));
    }
}
