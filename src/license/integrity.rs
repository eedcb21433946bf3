//! Integrity verification of downloaded canonical license text.
//!
//! A descriptor may pin the SHA-256 of its canonical text. When it does, the
//! fetched bytes must hash to exactly that digest or the text is rejected.
//! Descriptors without a pin pass through unchecked.

use sha2::{Digest, Sha256};

/// The fetched text does not hash to the catalog's pinned digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityError {
    pub spdx: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fingerprint mismatch for {}. Update data/licenses.json before continuing.",
            self.spdx
        )
    }
}

impl std::error::Error for IntegrityError {}

/// Calculate SHA-256 of content and return it as a lowercase hex string.
pub fn sha256_hex(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    format!("{:x}", digest)
}

/// Verify `text` against an optional pinned digest.
///
/// Returns the text untouched on success so calls can be chained.
pub fn verify<'a>(
    spdx: &str,
    text: &'a str,
    expected_digest: Option<&str>,
) -> Result<&'a str, IntegrityError> {
    let Some(expected) = expected_digest else {
        return Ok(text);
    };

    let actual = sha256_hex(text.as_bytes());
    if actual != expected {
        return Err(IntegrityError {
            spdx: spdx.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_accepts_matching_digest() {
        let text = "license text";
        let digest = sha256_hex(text.as_bytes());
        assert_eq!(verify("MIT", text, Some(&digest)), Ok(text));
    }

    #[test]
    fn test_verify_rejects_other_digest() {
        let err = verify("MIT", "license text", Some("bad")).unwrap_err();
        assert_eq!(err.spdx, "MIT");
        assert_eq!(err.expected, "bad");
        assert_eq!(err.actual, sha256_hex(b"license text"));
        assert!(err.to_string().starts_with("Fingerprint mismatch for MIT."));
        assert!(err.to_string().contains("Update data/licenses.json"));
    }

    #[test]
    fn test_verify_is_byte_exact() {
        let digest = sha256_hex(b"license text\n");
        assert!(verify("MIT", "license text", Some(&digest)).is_err());
        assert!(verify("MIT", "license text\r\n", Some(&digest)).is_err());
    }

    #[test]
    fn test_verify_uppercase_pin_is_a_mismatch() {
        let digest = sha256_hex(b"license text").to_uppercase();
        assert!(verify("MIT", "license text", Some(&digest)).is_err());
    }

    #[test]
    fn test_verify_without_pin_passes_through() {
        assert_eq!(verify("MIT", "anything", None), Ok("anything"));
    }
}
