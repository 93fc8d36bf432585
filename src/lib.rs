//! # lecturescribe
//!
//! Structured study notes from lecture transcripts.
//!
//! A text generator is asked for a summary, key points, definitions and long-form
//! notes. Its reply is free text, so this library recovers whatever structure is
//! there and fills the gaps deterministically, then renders the long-form notes
//! into display blocks for the terminal.
//!
//! ## Features
//!
//! - Tolerant parsing of generator replies with tiered fallbacks
//! - Block rendering of the markdown-like note dialect (headings, lists, tables, code)
//! - Terminal display with width-aware tables
//! - A JSON note store with atomic writes, and plain-text export
//! - Prompt construction and retrying generation through any shell command
//!
//! ## Example
//!
//! ```rust
//! use lecturescribe::{GenerationMode, RenderBlock, parse_response, render_notes};
//!
//! let reply = "**SECTION 2: KEY POINTS**\n\
//!              - Chlorophyll absorbs red and blue light strongly\n\
//!              **SECTION 4: FULL NOTES**\n\
//!              # Photosynthesis\n\
//!              - Happens in the chloroplast";
//!
//! let notes = parse_response(reply, "Photosynthesis", GenerationMode::Full);
//! assert_eq!(notes.key_points, ["Chlorophyll absorbs red and blue light strongly"]);
//!
//! let blocks = render_notes(&notes.full_notes);
//! assert!(matches!(blocks[0], RenderBlock::Heading { level: 1, .. }));
//! ```

/// Configuration module for persisting user preferences.
///
/// Store location, generator command and retry policy, display settings.
pub mod config;

/// Generator reply parsing into the four note fields.
pub mod notes;

/// Note text rendering into blocks and terminal output.
pub mod render;

/// Persistent note collection.
pub mod store;

/// Plain-text note export.
pub mod export;

/// Prompt templates for each generation mode.
pub mod prompt;

/// Text generator seam, shell-command generator and retries.
pub mod generate;

// Re-export commonly used types for convenience
pub use config::Config;
pub use notes::{GenerationMode, ParsedNotes, parse_response};
pub use render::{InlineSpan, RenderBlock, render_notes};
pub use store::{Note, NoteStore};
