//! String utilities for the domain layer.

/// Collapse a (possibly multi-line) text into a single-line preview of at
/// most `max_chars` characters, for log lines and progress messages.
///
/// Counts characters rather than bytes, so multi-byte text never splits.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = flat.chars().take(keep).collect();
    out.push_str("...");
    out
}
