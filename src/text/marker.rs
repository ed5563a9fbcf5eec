/// Split `text` at the first literal `marker`.
///
/// Returns the trimmed text before the marker and the trimmed remainder
/// starting at the marker itself. `None` means the marker is absent; the
/// caller decides how to report that.
pub fn split_at_marker(text: &str, marker: &str) -> (String, Option<String>) {
    match text.find(marker) {
        Some(idx) if !marker.is_empty() => (
            text[..idx].trim().to_string(),
            Some(text[idx..].trim().to_string()),
        ),
        _ => (text.trim().to_string(), None),
    }
}
