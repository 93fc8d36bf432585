//! Compiled line and inline patterns.
//!
//! Every pattern is compiled once into a `OnceLock` and only ever used through
//! `is_match`/`find_iter`/`captures`, which carry no match position between
//! calls. Parsing and rendering stay pure no matter how often they run.

use regex::Regex;
use std::sync::OnceLock;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static PATTERN: OnceLock<Regex> = OnceLock::new();
            PATTERN.get_or_init(|| Regex::new($re).unwrap())
        }
    };
}

// Ornamental rules the generator emits between sections.
pattern!(response_separator, r"^[━─=\-_]{3,}$");

// The renderer also treats runs of `*`, `✓` and `•` as rules.
pattern!(render_separator, r"^[━─=\-*_✓•]{3,}$");

// A whole line of decoration inside inline content.
pattern!(inline_separator, r"^[━─=\-*_]{3,}$");

pattern!(numbered_prefix, r"^\d+\.");

// Bullet, number and punctuation prefix of a list entry.
pattern!(list_marker, r"^[\d\-\*•\.)\s]+");

pattern!(bullet_marker, r"^[\-\*•\s]+");

pattern!(capitalized_word, r"^[A-Z][a-z]");

pattern!(key_point_label, r"^\*\*key\s+point");

pattern!(definition_label, r"^\*\*definition");

// Markdown table alignment row, e.g. `|---|:---:|`.
pattern!(table_divider, r"^[\s|:\-]+$");

pattern!(numbered_item, r"^(\d+)\. (.*)$");

pattern!(standalone_bold, r"^\*\*[^*]+\*\*[:\s]*$");

pattern!(stray_asterisk, r"^\*\s");

// Code, bold and italic, tried in that order at each position.
pattern!(inline_token, r"`[^`]+`|\*\*[^*]+\*\*|\*[^*]+\*");
