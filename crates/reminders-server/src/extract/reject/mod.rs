//! Drop-in replacements for axum extractors with JSON error responses.

mod json;
mod path;
mod validated_json;

pub use self::json::Json;
pub use self::path::Path;
pub use self::validated_json::ValidateJson;

/// Shortens a rejection message before it is echoed to the client.
fn sanitize_error_message(message: &str, max_lines: usize, max_chars: usize) -> String {
    message
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::sanitize_error_message;

    #[test]
    fn sanitize_truncates_lines_and_length() {
        let message = "first line\nsecond line\nthird line";
        assert_eq!(sanitize_error_message(message, 2, 100), "first line second line");
        assert_eq!(sanitize_error_message(message, 3, 5), "first");
    }
}
