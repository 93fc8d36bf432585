//! Rendering of markdown-like note text into display blocks.
//!
//! The dialect is the narrow one the note generator emits: `#`-headings up to
//! level four, hyphen bullets, numbered steps, pipe tables, fenced code,
//! checkmark lines and bold-only label lines, plus `**bold**`, `*italic*` and
//! `` `code` `` inside a line. Decorative rules are dropped.

mod blocks;
pub mod inline;
pub mod terminal;

pub use blocks::render_notes;
pub use inline::parse_inline;
pub use terminal::{ColorChoice, TerminalRenderer};

use serde::{Deserialize, Serialize};

/// One styled run of text inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineSpan {
    PlainText { value: String },
    Bold { value: String },
    Italic { value: String },
    Code { value: String },
}

impl InlineSpan {
    pub fn plain(value: impl Into<String>) -> Self {
        InlineSpan::PlainText {
            value: value.into(),
        }
    }

    pub fn bold(value: impl Into<String>) -> Self {
        InlineSpan::Bold {
            value: value.into(),
        }
    }

    pub fn italic(value: impl Into<String>) -> Self {
        InlineSpan::Italic {
            value: value.into(),
        }
    }

    pub fn code(value: impl Into<String>) -> Self {
        InlineSpan::Code {
            value: value.into(),
        }
    }

    /// The text without its styling.
    pub fn value(&self) -> &str {
        match self {
            InlineSpan::PlainText { value }
            | InlineSpan::Bold { value }
            | InlineSpan::Italic { value }
            | InlineSpan::Code { value } => value,
        }
    }
}

/// Concatenate span text, dropping styling.
pub fn spans_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::value).collect()
}

/// An entry of a numbered list, keeping the number as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedItem {
    pub label: String,
    pub spans: Vec<InlineSpan>,
}

/// One structural unit of a rendered note, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderBlock {
    /// `#` through `####`, bold markers removed
    Heading { level: u8, text: String },
    /// A line that is nothing but `**Label**`, optionally with a colon
    Label { text: String },
    Paragraph { spans: Vec<InlineSpan> },
    BulletList { items: Vec<Vec<InlineSpan>> },
    NumberedList { items: Vec<NumberedItem> },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<Vec<InlineSpan>>>,
    },
    CodeBlock {
        /// Info string after the opening fence, if any
        language: Option<String>,
        lines: Vec<String>,
    },
    CheckLine { ok: bool, spans: Vec<InlineSpan> },
    Blank,
}
