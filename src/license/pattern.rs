//! Structural matching of license text against a canonical template.
//!
//! The canonical text of most licenses carries placeholders such as `<year>`,
//! `[fullname]` or `<copyright holders>`. A matcher built from that text
//! accepts any candidate that reproduces the literal skeleton exactly (modulo
//! whitespace) with arbitrary non-empty filler in the placeholder positions.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::fetch::LicenseSource;
use crate::license::download::{DownloadError, download_license};
use crate::license::models::LicenseDescriptor;
use crate::license::normalize::normalize;

/// Text enclosed in `<...>` or `[...]`.
static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>|\[[^\]]+\]").expect("Invalid regex pattern"));

const PLACEHOLDER_WILDCARD: &str = ".+?";
const WHITESPACE_WILDCARD: &str = r"\s+";

/// Full license templates compile to large automata; the default limit is too
/// small for texts the size of the GPL.
const PATTERN_SIZE_LIMIT: usize = 256 * (1 << 20);

/// A compiled template that tests whole candidate texts.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    regex: Regex,
}

impl TemplateMatcher {
    /// Build a matcher from a license template.
    pub fn build(template_text: &str) -> Result<Self, regex::Error> {
        let pattern = template_pattern(template_text);
        let regex = RegexBuilder::new(&pattern)
            .dot_matches_new_line(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .dfa_size_limit(PATTERN_SIZE_LIMIT)
            .build()?;

        Ok(Self { regex })
    }

    /// Whether the entire candidate matches the template.
    ///
    /// Callers normally pass normalized text, but whitespace runs of any
    /// length are accepted wherever the template has a space.
    pub fn test(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Translate a template into an anchored regex source.
///
/// Placeholders become a non-greedy "one or more of anything", literal text
/// is escaped, and each literal space becomes "one or more whitespace".
fn template_pattern(template_text: &str) -> String {
    let normalized = normalize(template_text);
    let mut pattern = String::with_capacity(normalized.len() * 2);
    pattern.push('^');

    let mut literal_start = 0;
    for placeholder in PLACEHOLDER_PATTERN.find_iter(&normalized) {
        push_literal(&mut pattern, &normalized[literal_start..placeholder.start()]);
        pattern.push_str(PLACEHOLDER_WILDCARD);
        literal_start = placeholder.end();
    }
    push_literal(&mut pattern, &normalized[literal_start..]);

    pattern.push('$');
    pattern
}

fn push_literal(pattern: &mut String, literal: &str) {
    let escaped = regex::escape(literal);
    pattern.push_str(&escaped.replace(' ', WHITESPACE_WILDCARD));
}

/// A descriptor could not be tested during a catalog scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    Download(DownloadError),
    Pattern { spdx: String, message: String },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Download(e) => e.fmt(f),
            Self::Pattern { spdx, message } => {
                write!(f, "Failed to build template matcher for {}: {}", spdx, message)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Download(e) => std::error::Error::source(e),
            Self::Pattern { .. } => None,
        }
    }
}

/// Outcome of scanning a catalog with template matchers.
///
/// `first_error` is kept even when a later entry matched, so callers can tell
/// a clean miss from a scan that skipped entries.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScan<'a> {
    pub matched: Option<&'a LicenseDescriptor>,
    pub first_error: Option<ScanError>,
}

/// Test `candidate_text` against each catalog entry's canonical text, in
/// catalog order, stopping at the first entry whose template accepts it.
///
/// Entries that cannot be fetched, fail verification, or do not compile are
/// skipped; only the first such error is recorded.
pub fn scan_catalog<'a>(
    candidate_text: &str,
    catalog: &'a [LicenseDescriptor],
    source: &dyn LicenseSource,
) -> PatternScan<'a> {
    let normalized = normalize(candidate_text);
    let mut first_error = None;

    for license in catalog {
        debug!("Testing template for {}", license.spdx);

        let outcome = download_license(license, source)
            .map_err(ScanError::Download)
            .and_then(|text| {
                TemplateMatcher::build(&text).map_err(|e| ScanError::Pattern {
                    spdx: license.spdx.clone(),
                    message: e.to_string(),
                })
            });

        match outcome {
            Ok(matcher) if matcher.test(&normalized) => {
                return PatternScan {
                    matched: Some(license),
                    first_error,
                };
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping {} during template scan: {}", license.spdx, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    PatternScan {
        matched: None,
        first_error,
    }
}
