//! Machine-readable results and the console they are written to.
//!
//! In `--json` mode every command prints exactly one JSON document per line
//! on stdout; human-readable lines are suppressed. Warnings and errors in text
//! mode go to stderr.

use std::io::{self, Write};

use serde::Serialize;

use crate::license::LicenseDescriptor;

/// Why a scaffold run stopped without writing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    OverwriteDeclined,
    NoSelection,
}

/// One status document, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "status",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum StatusReport {
    Missing {
        message: String,
    },
    Identified {
        spdx: String,
        name: String,
        path: String,
        confidence: f64,
        confidence_percent: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        matched_fingerprints: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_fingerprints: Option<usize>,
        method: String,
    },
    Unknown {
        message: String,
        path: String,
    },
    Existing {
        path: String,
    },
    Skipped {
        reason: SkipReason,
    },
    Stdout {
        spdx: String,
        name: String,
        license_text: String,
        warnings: Vec<String>,
    },
    DryRun {
        spdx: String,
        name: String,
        path: String,
        warnings: Vec<String>,
    },
    Written {
        spdx: String,
        name: String,
        path: String,
        package_json_updated: bool,
        warnings: Vec<String>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListReport {
    pub licenses: Vec<ListedLicense>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedLicense {
    pub spdx: String,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    pub template_fields: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<&LicenseDescriptor> for ListedLicense {
    fn from(license: &LicenseDescriptor) -> Self {
        Self {
            spdx: license.spdx.clone(),
            name: license.name.clone(),
            url: license.source_location.clone(),
            sha256: license.expected_digest.clone(),
            template_fields: license.required_fields().to_vec(),
            warnings: license.advisories.clone(),
        }
    }
}

impl ListReport {
    pub fn new(licenses: &[LicenseDescriptor]) -> Self {
        Self {
            licenses: licenses.iter().map(ListedLicense::from).collect(),
        }
    }
}

/// Output sinks for one run.
pub struct Console<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    json: bool,
}

impl<'a> Console<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write, json: bool) -> Self {
        Self { out, err, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print `payload` as a single JSON line.
    pub fn emit<T: Serialize>(&mut self, payload: &T) -> io::Result<()> {
        let line = serde_json::to_string(payload)?;
        writeln!(self.out, "{}", line)
    }

    /// Human-readable line on stdout; dropped in JSON mode.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.out, "{}", line)
    }

    /// Raw text on stdout, regardless of mode.
    pub fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Human-readable line on stderr; dropped in JSON mode.
    pub fn warn(&mut self, line: &str) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        writeln!(self.err, "{}", line)
    }

    /// Report a failed run: an `error` document in JSON mode, the message on
    /// stderr otherwise.
    pub fn error(&mut self, message: &str) -> io::Result<()> {
        if self.json {
            self.emit(&StatusReport::Error {
                message: message.to_string(),
            })
        } else {
            writeln!(self.err, "{}", message)
        }
    }
}
