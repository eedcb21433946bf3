//! Holder-specific field values: validation, defaults and resolution.
//!
//! Values come from CLI flags first, then (with `--yes`) from detected
//! defaults, then from interactive prompts. Every value is validated before
//! it reaches the template engine.

mod defaults;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::license::{FieldValues, LicenseDescriptor};
use crate::prompt::Prompter;

pub use defaults::{detect_defaults, git_config};

static YEARS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}(-\d{4})?$").expect("Invalid regex pattern"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex pattern"));

/// Fields that can be supplied on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownField {
    Years,
    Name,
    Email,
    Software,
    Description,
    Organization,
}

impl KnownField {
    pub const ALL: [KnownField; 6] = [
        Self::Years,
        Self::Name,
        Self::Email,
        Self::Software,
        Self::Description,
        Self::Organization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Name => "name",
            Self::Email => "email",
            Self::Software => "software",
            Self::Description => "description",
            Self::Organization => "organization",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required { field: String },
    InvalidYears,
    InvalidEmail,
    /// `--yes` was given but neither flags nor defaults cover these fields
    MissingForLicense { spdx: String, fields: Vec<String> },
    /// Non-interactive mode without `--yes` and without these flags
    MissingNonInteractive { fields: Vec<String> },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required.", field),
            Self::InvalidYears => write!(f, "Years must be YYYY or YYYY-YYYY."),
            Self::InvalidEmail => write!(f, "Email must be valid."),
            Self::MissingForLicense { spdx, fields } => write!(
                f,
                "Missing required fields for {}: {}. Provide them via CLI flags.",
                spdx,
                fields.join(", ")
            ),
            Self::MissingNonInteractive { fields } => write!(
                f,
                "Missing required fields in non-interactive mode: {}.",
                fields.join(", ")
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Validate one field value. Unknown fields only need to be non-blank.
pub fn validate_field(field: &str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required {
            field: field.to_string(),
        });
    }
    match KnownField::from_name(field) {
        Some(KnownField::Years) if !YEARS_PATTERN.is_match(value) => Err(FieldError::InvalidYears),
        Some(KnownField::Email) if !EMAIL_PATTERN.is_match(value) => Err(FieldError::InvalidEmail),
        _ => Ok(()),
    }
}

/// Fields `license` needs that `provided` does not cover.
pub fn missing_fields(license: &LicenseDescriptor, provided: &FieldValues) -> Vec<String> {
    license
        .required_fields()
        .iter()
        .filter(|field| {
            provided
                .get(field)
                .is_none_or(|value| value.trim().is_empty())
        })
        .cloned()
        .collect()
}

/// Resolve every field `license` declares.
///
/// Flags win; with `accept_defaults` the remaining fields are taken from
/// `defaults` and anything still missing is an error; otherwise the user is
/// prompted, with the default as the initial answer.
pub fn resolve_field_values(
    license: &LicenseDescriptor,
    provided: &FieldValues,
    defaults: &FieldValues,
    accept_defaults: bool,
    prompter: &mut dyn Prompter,
) -> Result<FieldValues> {
    let fields = license.required_fields();
    let mut answers = FieldValues::new();

    for field in fields {
        if let Some(value) = provided.get(field).map(str::trim)
            && !value.is_empty()
        {
            validate_field(field, value)?;
            answers.insert(field.as_str(), value);
        }
    }

    if accept_defaults {
        for field in fields {
            if answers.contains(field) {
                continue;
            }
            if let Some(candidate) = defaults.get(field) {
                validate_field(field, candidate)?;
                answers.insert(field.as_str(), candidate);
            }
        }

        let missing: Vec<String> = fields
            .iter()
            .filter(|field| !answers.contains(field))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(FieldError::MissingForLicense {
                spdx: license.spdx.clone(),
                fields: missing,
            }
            .into());
        }
        return Ok(answers);
    }

    for field in fields {
        if answers.contains(field) {
            continue;
        }
        let initial = defaults.get(field).unwrap_or("");
        let value = prompter.input(&format!("Enter {}", field), initial)?;
        let value = value.trim();
        validate_field(field, value)?;
        answers.insert(field.as_str(), value);
    }

    Ok(answers)
}
