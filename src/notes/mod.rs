//! Structured study notes extracted from free-text generator output.
//!
//! The generator is asked for four labelled sections but nothing guarantees it
//! complies. [`parse_response`] recovers whatever structure is present and fills
//! the rest from deterministic fallbacks, so a [`ParsedNotes`] is always complete.

pub(crate) mod patterns;
mod response;

pub use response::parse_response;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Maximum length of a summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 1500;

/// Maximum number of key points kept.
pub const MAX_KEY_POINTS: usize = 15;

/// Maximum number of definitions kept.
pub const MAX_DEFINITIONS: usize = 12;

/// Which prompt variant was used to produce a response.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GenerationMode {
    /// Prose summary only
    Summary,
    /// All four sections including long-form notes
    #[default]
    Full,
    /// Summary, key points and definitions
    KeyConcepts,
}

/// The four fields recovered from a generator response.
///
/// None of the fields is ever empty: each falls back to title-derived text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedNotes {
    pub summary: String,
    pub key_points: Vec<String>,
    /// Entries shaped `Term: meaning`
    pub definitions: Vec<String>,
    /// Markdown-like document, always containing a heading
    pub full_notes: String,
}

/// Split a definition entry into its term and meaning.
///
/// Splits on the first `": "`, falling back to the first bare `:`. Asterisks
/// around the term are removed.
///
/// # Examples
///
/// ```
/// use lecturescribe::notes::split_definition;
///
/// assert_eq!(
///     split_definition("**Array**: A contiguous block: of memory"),
///     ("Array".to_string(), "A contiguous block: of memory".to_string())
/// );
/// ```
pub fn split_definition(entry: &str) -> (String, String) {
    let (term, meaning) = entry
        .split_once(": ")
        .or_else(|| entry.split_once(':'))
        .unwrap_or((entry, ""));

    let term = term.trim().trim_matches('*').trim();
    (term.to_string(), meaning.trim().to_string())
}

/// Remove leading asterisks left over from list markup.
pub fn clean_key_point(point: &str) -> &str {
    point.trim_start_matches('*').trim()
}

/// Split a transcript into its blank-line separated paragraphs.
pub fn transcript_paragraphs(transcript: &str) -> Vec<&str> {
    transcript
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
