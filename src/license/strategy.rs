//! One entry point over both identification strategies.

use crate::fetch::LicenseSource;
use crate::license::fingerprint::identify;
use crate::license::models::LicenseDescriptor;
use crate::license::pattern::{ScanError, scan_catalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IdentificationStrategy {
    /// Count catalog fingerprints present in the text (offline)
    #[default]
    Fingerprint,
    /// Download each catalog text and match it as a template
    Pattern,
    /// Fingerprints first, templates when fingerprints are not conclusive
    Auto,
}

/// What an identification rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evidence {
    Fingerprints { matched: usize, total: usize },
    Template,
}

impl Evidence {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Fingerprints { .. } => "fingerprint",
            Self::Template => "pattern",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identification<'a> {
    pub license: &'a LicenseDescriptor,
    pub confidence: f64,
    pub evidence: Evidence,
}

impl Identification<'_> {
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Result of running a strategy over the catalog. `scan_error` is the first
/// fetch, integrity or pattern error hit by a template scan, if one ran.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentificationOutcome<'a> {
    pub identification: Option<Identification<'a>>,
    pub scan_error: Option<ScanError>,
}

impl IdentificationStrategy {
    pub fn identify<'a>(
        self,
        candidate_text: &str,
        catalog: &'a [LicenseDescriptor],
        source: &dyn LicenseSource,
    ) -> IdentificationOutcome<'a> {
        match self {
            Self::Fingerprint => IdentificationOutcome {
                identification: by_fingerprint(candidate_text, catalog),
                scan_error: None,
            },
            Self::Pattern => by_template(candidate_text, catalog, source),
            Self::Auto => {
                let fingerprinted = by_fingerprint(candidate_text, catalog);
                if fingerprinted
                    .as_ref()
                    .is_some_and(|found| found.confidence >= 1.0)
                {
                    return IdentificationOutcome {
                        identification: fingerprinted,
                        scan_error: None,
                    };
                }

                let templated = by_template(candidate_text, catalog, source);
                IdentificationOutcome {
                    identification: templated.identification.or(fingerprinted),
                    scan_error: templated.scan_error,
                }
            }
        }
    }
}

fn by_fingerprint<'a>(
    candidate_text: &str,
    catalog: &'a [LicenseDescriptor],
) -> Option<Identification<'a>> {
    identify(candidate_text, catalog).map(|result| Identification {
        license: result.license,
        confidence: result.confidence,
        evidence: Evidence::Fingerprints {
            matched: result.matched_fingerprints,
            total: result.total_fingerprints,
        },
    })
}

fn by_template<'a>(
    candidate_text: &str,
    catalog: &'a [LicenseDescriptor],
    source: &dyn LicenseSource,
) -> IdentificationOutcome<'a> {
    let scan = scan_catalog(candidate_text, catalog, source);
    IdentificationOutcome {
        identification: scan.matched.map(|license| Identification {
            license,
            confidence: 1.0,
            evidence: Evidence::Template,
        }),
        scan_error: scan.first_error,
    }
}
