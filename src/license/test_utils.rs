use std::cell::RefCell;
use std::collections::HashMap;

use crate::fetch::{FetchError, LicenseSource};
use crate::license::models::{FieldTemplate, LicenseDescriptor, Replacement};

/// In-memory [`LicenseSource`] that records every location requested.
pub struct StaticSource {
    texts: HashMap<String, String>,
    pub requested: RefCell<Vec<String>>,
}

impl StaticSource {
    pub fn new<'a>(texts: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            texts: texts
                .into_iter()
                .map(|(location, text)| (location.to_string(), text.to_string()))
                .collect(),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            texts: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl LicenseSource for StaticSource {
    fn fetch(&self, location: &str) -> Result<String, FetchError> {
        self.requested.borrow_mut().push(location.to_string());
        self.texts
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: location.to_string(),
                status: 404,
                reason: "Not Found".to_string(),
            })
    }
}

pub fn descriptor(spdx: &str, fingerprints: &[&str]) -> LicenseDescriptor {
    LicenseDescriptor {
        spdx: spdx.to_string(),
        name: format!("{} License", spdx),
        source_location: format!("https://example.com/{}", spdx),
        expected_digest: None,
        fingerprints: fingerprints.iter().map(|f| f.to_string()).collect(),
        field_template: None,
        advisories: Vec::new(),
    }
}

/// A descriptor whose template replaces each `(token, field)` at the token's
/// first occurrence in `text`.
pub fn templated_descriptor(spdx: &str, text: &str, tokens: &[(&str, &str)]) -> LicenseDescriptor {
    let replacements = tokens
        .iter()
        .map(|(token, field)| {
            let start = text.find(token).expect("token present in text");
            Replacement {
                field: field.to_string(),
                start,
                end: start + token.len(),
            }
        })
        .collect();

    LicenseDescriptor {
        field_template: Some(FieldTemplate {
            fields: tokens.iter().map(|(_, field)| field.to_string()).collect(),
            replacements,
        }),
        ..descriptor(spdx, &[])
    }
}
