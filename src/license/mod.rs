//! License identification and templating engine.
//!
//! Turns a catalog of SPDX license descriptors into:
//! - filled, holder-specific license text (offset-based substitution)
//! - identification of arbitrary license text, either by fingerprint phrases
//!   or by matching the canonical text as a structural template

pub mod download;
pub mod fingerprint;
pub mod integrity;
mod models;
pub mod normalize;
pub mod pattern;
pub mod strategy;
pub mod template;
#[cfg(test)]
pub(crate) mod test_utils;

pub use download::{DownloadError, download_license};
pub use fingerprint::{IdentificationResult, identify};
pub use integrity::{IntegrityError, sha256_hex, verify};
pub use models::{ExistingLicenseFile, FieldTemplate, LicenseDescriptor, Replacement};
pub use normalize::normalize;
pub use pattern::{PatternScan, ScanError, TemplateMatcher, scan_catalog};
pub use strategy::{Evidence, Identification, IdentificationOutcome, IdentificationStrategy};
pub use template::{FieldValues, TemplateError, fill, fill_license};
