//! Inline emphasis tokenizer.

use super::InlineSpan;
use crate::notes::patterns;

/// Split a line into plain, bold, italic and code spans.
///
/// Scans left to right for the earliest backtick code, `**bold**` or `*italic*`
/// token. Text between tokens becomes plain spans. A line consisting only of a
/// decorative rule yields no spans.
///
/// # Examples
///
/// ```
/// use lecturescribe::render::{parse_inline, InlineSpan};
///
/// assert_eq!(
///     parse_inline("The **Term** is key"),
///     vec![
///         InlineSpan::plain("The "),
///         InlineSpan::bold("Term"),
///         InlineSpan::plain(" is key"),
///     ]
/// );
/// ```
pub fn parse_inline(text: &str) -> Vec<InlineSpan> {
    if patterns::inline_separator().is_match(text.trim()) {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut last = 0;

    for token in patterns::inline_token().find_iter(text) {
        if token.start() > last {
            spans.push(InlineSpan::plain(&text[last..token.start()]));
        }

        let raw = token.as_str();
        let span = if let Some(inner) = raw.strip_prefix("**").and_then(|r| r.strip_suffix("**")) {
            InlineSpan::bold(inner)
        } else if let Some(inner) = raw.strip_prefix('`').and_then(|r| r.strip_suffix('`')) {
            InlineSpan::code(inner)
        } else {
            InlineSpan::italic(&raw[1..raw.len() - 1])
        };
        spans.push(span);
        last = token.end();
    }

    if last < text.len() {
        spans.push(InlineSpan::plain(&text[last..]));
    }

    spans
}
