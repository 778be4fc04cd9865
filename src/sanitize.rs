// Filename sanitization for image descriptions.

/// Name used when a description is missing or nothing usable survives
/// filtering.
pub const UNTITLED: &str = "untitled";

/// Turns an optional free-text description into a filesystem-safe name.
///
/// Keeps alphanumeric characters, spaces, underscores and hyphens, drops
/// everything else, then trims trailing whitespace. A missing, empty or
/// fully-unsafe description becomes [`UNTITLED`].
pub fn sanitize(description: Option<&str>) -> String {
    let description = match description {
        Some(d) if !d.is_empty() => d,
        _ => UNTITLED,
    };

    let kept: String = description
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let trimmed = kept.trim_end();

    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}
