//! UTF-8 safe text helpers

/// Return at most the first `max_chars` characters of `s`
///
/// Slices on a char boundary, so multi-byte input never panics.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Shorten `s` to `max_chars` characters, appending `...` when anything was cut
pub fn preview(s: &str, max_chars: usize) -> String {
    let truncated = truncate_chars(s, max_chars);
    if truncated.len() < s.len() {
        format!("{}...", truncated)
    } else {
        truncated.to_string()
    }
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
