//! Layout-insensitive canonical form of license text.

/// Canonicalize license text for comparison.
///
/// CRLF line endings become LF, every maximal run of whitespace (newlines
/// included) collapses to a single space, and leading/trailing whitespace is
/// dropped. Reflowed or re-indented copies of the same text normalize to the
/// same string.
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    let mut normalized = String::with_capacity(unified.len());

    for word in unified.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }

    normalized
}
