//! Call synthesis: render a printf-style logging call from parsed fields.
//!
//! ```text
//! <qualifier>.<Level>f("<message>: k1=%s, k2=%s", v1, v2)
//! ```
//!
//! Every key contributes exactly one `%s` and every value exactly one
//! argument, in entry order. A literal `%` in the message or a key is
//! doubled so it cannot be read as a verb.

use super::{fields::FieldEntry, idiom::Level};

/// Placeholder emitted for every field, regardless of the value's type.
pub const PLACEHOLDER: &str = "%s";

/// Render the destination call.
///
/// `message` is the body of the original string literal, without quotes and
/// with its escape sequences left as written.
pub fn render_call(qualifier: &str, level: Level, message: &str, fields: &[FieldEntry]) -> String {
    let target = format!("{}.{}", qualifier, level.destination());
    let message = escape_verbs(message);

    if fields.is_empty() {
        return format!("{}(\"{}\")", target, message);
    }

    let placeholders = fields
        .iter()
        .map(|field| format!("{}={}", escape_verbs(&field.key), PLACEHOLDER))
        .collect::<Vec<_>>()
        .join(", ");
    let arguments = fields
        .iter()
        .map(|field| field.value.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{}(\"{}: {}\", {})",
        target, message, placeholders, arguments
    )
}

/// Count formatting verbs in a format string body, ignoring `%%`.
pub fn count_verbs(format: &str) -> usize {
    let mut count = 0;
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some('%') => {}
                Some(_) => count += 1,
                None => {}
            }
        }
    }
    count
}

fn escape_verbs(text: &str) -> String {
    text.replace('%', "%%")
}
