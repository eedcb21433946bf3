//! Offset-based placeholder substitution.
//!
//! A catalog entry describes its holder-specific placeholders as byte ranges
//! into the canonical text. Replacement values generally differ in length from
//! the placeholder they replace, so spans are validated and then applied
//! rightmost first: every span still to be applied lies to the left of the
//! edits already made, and its offsets into the original text stay valid.

use std::collections::BTreeMap;

use crate::license::models::{LicenseDescriptor, Replacement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// No (or an empty) value was supplied for a field
    MissingValue { field: String },

    /// A span reaches past the end of the text, or ends before it starts
    OutOfRange {
        spdx: String,
        start: usize,
        end: usize,
        len: usize,
    },

    /// A span boundary splits a UTF-8 character
    NotCharBoundary {
        spdx: String,
        start: usize,
        end: usize,
    },

    /// Two spans cover the same bytes
    Overlapping { spdx: String },
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingValue { field } => write!(f, "Missing value for {}.", field),
            Self::OutOfRange { spdx, .. } => {
                write!(f, "Replacement offsets out of range for {}.", spdx)
            }
            Self::NotCharBoundary { spdx, .. } => write!(
                f,
                "Replacement offsets for {} are not on character boundaries.",
                spdx
            ),
            Self::Overlapping { spdx } => write!(f, "Overlapping replacements for {}.", spdx),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Field values keyed by field name.
///
/// Keys are whatever names the catalog declares in `template.fields`; values
/// are looked up only through [`FieldValues::get`], which treats empty
/// strings as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<String, String>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Non-empty value for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Check that every declared field has a value. Extra fields are ignored.
    pub fn require(&self, fields: &[String]) -> Result<(), TemplateError> {
        match fields.iter().find(|field| !self.contains(field)) {
            Some(field) => Err(TemplateError::MissingValue {
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (field, value) in iter {
            values.insert(field, value);
        }
        values
    }
}

/// Replace every span of `text` with the value of its field.
///
/// All spans are checked before any is applied, so a bad span never yields
/// partially filled output. With no spans the text is returned unchanged.
pub fn fill(
    text: &str,
    spdx: &str,
    replacements: &[Replacement],
    values: &FieldValues,
) -> Result<String, TemplateError> {
    if replacements.is_empty() {
        return Ok(text.to_string());
    }

    let mut ordered: Vec<&Replacement> = replacements.iter().collect();
    // At a shared start the wider span goes first, so an empty span there
    // lands in front of it.
    ordered.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    let mut edits = Vec::with_capacity(ordered.len());
    let mut left_edge = text.len();

    for replacement in ordered {
        let value = values
            .get(&replacement.field)
            .ok_or_else(|| TemplateError::MissingValue {
                field: replacement.field.clone(),
            })?;

        let Replacement { start, end, .. } = *replacement;
        if start > end || end > text.len() {
            return Err(TemplateError::OutOfRange {
                spdx: spdx.to_string(),
                start,
                end,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(TemplateError::NotCharBoundary {
                spdx: spdx.to_string(),
                start,
                end,
            });
        }
        if end > left_edge {
            return Err(TemplateError::Overlapping {
                spdx: spdx.to_string(),
            });
        }

        left_edge = start;
        edits.push((start..end, value));
    }

    let mut filled = text.to_string();
    for (range, value) in edits {
        filled.replace_range(range, value);
    }

    Ok(filled)
}

/// Fill a catalog entry's canonical text, after checking that every field it
/// declares has a value.
pub fn fill_license(
    text: &str,
    license: &LicenseDescriptor,
    values: &FieldValues,
) -> Result<String, TemplateError> {
    values.require(license.required_fields())?;
    fill(text, &license.spdx, license.replacements(), values)
}
