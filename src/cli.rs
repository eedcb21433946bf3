use clap::Parser;

use crate::fields::KnownField;
use crate::license::{FieldValues, IdentificationStrategy};

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Select a license without prompting (SPDX id)
    #[arg(long, value_name = "SPDX")]
    pub license: Option<String>,

    /// Load licenses from a custom JSON file
    #[arg(long, value_name = "PATH")]
    pub data: Option<String>,

    /// Write the license to a specific path
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// License holder name
    #[arg(long)]
    pub name: Option<String>,

    /// License holder email
    #[arg(long)]
    pub email: Option<String>,

    /// Copyright years (e.g. 2024 or 2020-2024)
    #[arg(long)]
    pub years: Option<String>,

    /// Software/project name
    #[arg(long)]
    pub software: Option<String>,

    /// Project description
    #[arg(long)]
    pub description: Option<String>,

    /// Organization name
    #[arg(long)]
    pub organization: Option<String>,

    /// Print supported SPDX IDs
    #[arg(short, long)]
    pub list: bool,

    /// Identify existing LICENSE file
    #[arg(long)]
    pub validate: bool,

    /// Do not write files or update package.json
    #[arg(long)]
    pub dry_run: bool,

    /// Emit license text to stdout (no files written)
    #[arg(long)]
    pub stdout: bool,

    /// Include URLs and metadata with --list
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Accept prompts (overwrite/license field updates)
    #[arg(short, long)]
    pub yes: bool,

    /// How --validate identifies the existing LICENSE
    #[arg(long, value_enum, default_value_t = IdentificationStrategy::Fingerprint)]
    pub strategy: IdentificationStrategy,

    /// Per-download timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    pub timeout: u64,
}

impl Cli {
    pub fn field(&self, field: KnownField) -> Option<&str> {
        let value = match field {
            KnownField::Years => &self.years,
            KnownField::Name => &self.name,
            KnownField::Email => &self.email,
            KnownField::Software => &self.software,
            KnownField::Description => &self.description,
            KnownField::Organization => &self.organization,
        };
        value.as_deref()
    }

    /// Field values given as flags.
    pub fn provided_fields(&self) -> FieldValues {
        KnownField::ALL
            .into_iter()
            .filter_map(|field| self.field(field).map(|value| (field.as_str(), value)))
            .collect()
    }
}
