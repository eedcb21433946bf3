use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::FetchError;

/// Decode an RFC 2397 `data:` URL into text.
///
/// Supports both the percent-encoded form (`data:text/plain,MIT%20License`)
/// and the `;base64` form. The payload must be UTF-8.
pub fn decode_data_url(url: &str) -> Result<String, FetchError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| FetchError::InvalidDataUrl {
            reason: "missing data: prefix".to_string(),
        })?;

    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| FetchError::InvalidDataUrl {
            reason: "missing ',' separator".to_string(),
        })?;

    let is_base64 = meta
        .rsplit(';')
        .next()
        .is_some_and(|param| param.eq_ignore_ascii_case("base64"));

    if is_base64 {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| FetchError::InvalidDataUrl {
                reason: e.to_string(),
            })?;
        return String::from_utf8(bytes).map_err(|_| FetchError::NotUtf8 {
            location: "data: URL".to_string(),
        });
    }

    urlencoding::decode(payload)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| FetchError::NotUtf8 {
            location: "data: URL".to_string(),
        })
}
