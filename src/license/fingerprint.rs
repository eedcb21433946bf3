//! Fingerprint-based license identification.
//!
//! Each catalog entry carries a handful of literal phrases that appear in its
//! canonical text. A candidate is scored against every entry by the fraction
//! of that entry's phrases it contains; the best ratio wins. This is a
//! heuristic: short or generic fingerprints produce false positives.

use crate::license::models::LicenseDescriptor;
use crate::license::normalize::normalize;

/// Best fingerprint match for a candidate text.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentificationResult<'a> {
    pub license: &'a LicenseDescriptor,
    /// `matched_fingerprints / total_fingerprints`, in `(0, 1]`
    pub confidence: f64,
    pub matched_fingerprints: usize,
    pub total_fingerprints: usize,
}

impl IdentificationResult<'_> {
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }

    /// Whether `self` should replace `current` as the running best.
    ///
    /// Higher confidence wins. At equal confidence the larger absolute
    /// matched count wins, so 2/4 beats 1/2. Full ties keep the earlier entry.
    fn beats(&self, current: &IdentificationResult<'_>) -> bool {
        self.confidence > current.confidence
            || (self.confidence == current.confidence
                && self.matched_fingerprints > current.matched_fingerprints)
    }
}

/// Count the fingerprints of `license` present in an already normalized,
/// lowercased candidate.
fn count_matches(license: &LicenseDescriptor, haystack: &str) -> usize {
    license
        .fingerprints
        .iter()
        .filter(|fingerprint| haystack.contains(&normalize(fingerprint).to_lowercase()))
        .count()
}

/// Identify `candidate_text` against the catalog.
///
/// Entries without fingerprints are never identified. Returns `None` when no
/// entry has at least one fingerprint present.
pub fn identify<'a>(
    candidate_text: &str,
    catalog: &'a [LicenseDescriptor],
) -> Option<IdentificationResult<'a>> {
    let haystack = normalize(candidate_text).to_lowercase();
    let mut best: Option<IdentificationResult<'a>> = None;

    for license in catalog {
        let total = license.fingerprints.len();
        if total == 0 {
            continue;
        }

        let matched = count_matches(license, &haystack);
        if matched == 0 {
            continue;
        }

        let candidate = IdentificationResult {
            license,
            confidence: matched as f64 / total as f64,
            matched_fingerprints: matched,
            total_fingerprints: total,
        };

        if best.as_ref().is_none_or(|current| candidate.beats(current)) {
            best = Some(candidate);
        }
    }

    best
}
