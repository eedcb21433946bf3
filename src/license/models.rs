//! Core data structures for license scaffolding and identification.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One catalog entry, keyed by its SPDX identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDescriptor {
    /// SPDX identifier (e.g. "MIT", "Apache-2.0")
    pub spdx: String,

    /// Human-readable display name
    pub name: String,

    /// Where the canonical text is fetched from
    #[serde(rename = "url")]
    pub source_location: String,

    /// Pinned lowercase hex SHA-256 of the canonical text
    #[serde(rename = "sha256", default, skip_serializing_if = "Option::is_none")]
    pub expected_digest: Option<String>,

    /// Literal phrases characteristic of this license's body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fingerprints: Vec<String>,

    /// Holder-specific fields and where they go in the canonical text
    #[serde(rename = "template", default, skip_serializing_if = "Option::is_none")]
    pub field_template: Option<FieldTemplate>,

    /// Warnings surfaced to the user after scaffolding
    #[serde(rename = "warnings", default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
}

impl LicenseDescriptor {
    /// Field names the user must supply before this license can be filled.
    pub fn required_fields(&self) -> &[String] {
        self.field_template
            .as_ref()
            .map(|template| template.fields.as_slice())
            .unwrap_or(&[])
    }

    /// Substitution spans into the canonical text, in catalog order.
    pub fn replacements(&self) -> &[Replacement] {
        self.field_template
            .as_ref()
            .map(|template| template.replacements.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldTemplate {
    /// Ordered required field names (e.g. "years", "name")
    #[serde(default)]
    pub fields: Vec<String>,

    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

/// A half-open byte range `[start, end)` of the canonical text that is
/// replaced by the value of `field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub field: String,
    pub start: usize,
    pub end: usize,
}

/// A LICENSE file found on disk. Read once, never mutated by identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingLicenseFile {
    pub path: PathBuf,
    pub filename: String,
    pub text: String,
}
