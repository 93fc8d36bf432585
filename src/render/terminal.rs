//! Terminal display of rendered notes.
//!
//! Produces either plain text or text styled with ANSI attributes. Tables are
//! laid out by display width so wide glyphs and emoji keep their columns
//! aligned, and shrink to fit the configured width.

use crossterm::style::Stylize;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use supports_color::{Stream, on};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{InlineSpan, RenderBlock, spans_text};
use crate::notes::split_definition;

/// Default maximum table width in columns.
pub const DEFAULT_MAX_WIDTH: usize = 100;

/// Narrowest a table column may shrink to.
const MIN_COL_WIDTH: usize = 3;

/// When to emit ANSI styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorChoice {
    /// Style only when stdout supports color
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve against the capabilities of stdout.
    pub fn use_color(self) -> bool {
        match self {
            ColorChoice::Auto => on(Stream::Stdout).is_some(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Turns blocks and note fields into terminal text.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    styled: bool,
    max_width: usize,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(false, DEFAULT_MAX_WIDTH)
    }
}

impl TerminalRenderer {
    pub fn new(styled: bool, max_width: usize) -> Self {
        Self { styled, max_width }
    }

    /// Render blocks, one output line per visual line, newline terminated.
    pub fn render(&self, blocks: &[RenderBlock]) -> String {
        let mut lines: Vec<String> = Vec::new();

        for block in blocks {
            match block {
                RenderBlock::Heading { level, text } => self.heading(&mut lines, *level, text),
                RenderBlock::Label { text } => lines.push(self.strong(&format!("{text}:"))),
                RenderBlock::Paragraph { spans } => lines.push(self.spans(spans)),
                RenderBlock::BulletList { items } => {
                    for item in items {
                        lines.push(format!("  {} {}", self.accent("•"), self.spans(item)));
                    }
                }
                RenderBlock::NumberedList { items } => {
                    for item in items {
                        let label = format!("{}.", item.label);
                        lines.push(format!("  {} {}", self.accent(&label), self.spans(&item.spans)));
                    }
                }
                RenderBlock::Table { headers, rows } => self.table(&mut lines, headers, rows),
                RenderBlock::CodeBlock { language, lines: code } => {
                    if let Some(language) = language {
                        lines.push(self.faint(&format!("    [{language}]")));
                    }
                    for line in code {
                        let line = format!("    {line}");
                        lines.push(if self.styled {
                            line.green().to_string()
                        } else {
                            line
                        });
                    }
                }
                RenderBlock::CheckLine { ok, spans } => {
                    let mark = match (ok, self.styled) {
                        (true, true) => "✓".green().to_string(),
                        (false, true) => "✗".red().to_string(),
                        (true, false) => "✓".to_string(),
                        (false, false) => "✗".to_string(),
                    };
                    lines.push(format!("{mark} {}", self.spans(spans)));
                }
                RenderBlock::Blank => lines.push(String::new()),
            }
        }

        join_lines(lines)
    }

    /// Numbered key point cards.
    pub fn key_points(&self, points: &[String]) -> String {
        let mut lines = vec![self.faint(&format!("{} key points", points.len())), String::new()];
        for (i, point) in points.iter().enumerate() {
            let label = format!("{:>2}.", i + 1);
            lines.push(format!(
                "{} {}",
                self.accent(&label),
                crate::notes::clean_key_point(point)
            ));
        }
        join_lines(lines)
    }

    /// Term on its own line, meaning indented below it.
    pub fn definitions(&self, definitions: &[String]) -> String {
        let mut lines = vec![
            self.faint(&format!("{} terms defined", definitions.len())),
            String::new(),
        ];
        for entry in definitions {
            let (term, meaning) = split_definition(entry);
            lines.push(self.strong(&term));
            if !meaning.is_empty() {
                lines.push(format!("    {meaning}"));
            }
            lines.push(String::new());
        }
        join_lines(lines)
    }

    /// Transcript paragraphs separated by blank lines.
    pub fn transcript(&self, transcript: &str) -> String {
        let paragraphs = crate::notes::transcript_paragraphs(transcript);
        let mut lines = Vec::with_capacity(paragraphs.len() * 2);
        for (i, paragraph) in paragraphs.into_iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(paragraph.to_string());
        }
        join_lines(lines)
    }

    fn heading(&self, lines: &mut Vec<String>, level: u8, text: &str) {
        match level {
            1 => {
                lines.push(if self.styled {
                    text.bold().magenta().to_string()
                } else {
                    text.to_string()
                });
                lines.push(self.faint(&"=".repeat(text.width())));
            }
            2 => {
                lines.push(if self.styled {
                    text.bold().cyan().to_string()
                } else {
                    text.to_string()
                });
                lines.push(self.faint(&"-".repeat(text.width())));
            }
            3 => lines.push(format!("{} {}", self.accent("▸"), self.strong(text))),
            _ => lines.push(self.strong(&text.to_uppercase())),
        }
    }

    fn spans(&self, spans: &[InlineSpan]) -> String {
        spans.iter().map(|span| self.span(span)).collect()
    }

    fn span(&self, span: &InlineSpan) -> String {
        match (span, self.styled) {
            (InlineSpan::PlainText { value }, _) => value.clone(),
            (InlineSpan::Bold { value }, true) => value.as_str().bold().to_string(),
            (InlineSpan::Italic { value }, true) => value.as_str().italic().to_string(),
            (InlineSpan::Code { value }, true) => value.as_str().yellow().to_string(),
            (InlineSpan::Code { value }, false) => format!("`{value}`"),
            (InlineSpan::Bold { value } | InlineSpan::Italic { value }, false) => value.clone(),
        }
    }

    fn table(&self, lines: &mut Vec<String>, headers: &[String], rows: &[Vec<Vec<InlineSpan>>]) {
        let cols = rows
            .iter()
            .map(Vec::len)
            .chain([headers.len()])
            .max()
            .unwrap_or(0);
        if cols == 0 {
            return;
        }

        let mut widths = vec![0usize; cols];
        for (i, header) in headers.iter().enumerate() {
            widths[i] = widths[i].max(header.width());
        }
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(spans_text(cell).width());
            }
        }
        fit_widths(&mut widths, self.max_width);

        let header_cells: Vec<String> = (0..cols)
            .map(|i| {
                let text = headers.get(i).map(String::as_str).unwrap_or("");
                let cell = pad_to_width(&truncate_to_width(text, widths[i]), widths[i]);
                self.strong(&cell)
            })
            .collect();
        lines.push(format!("| {} |", header_cells.join(" | ")));

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        lines.push(self.faint(&format!("|-{}-|", rule.join("-|-"))));

        for row in rows {
            let cells: Vec<String> = (0..cols)
                .map(|i| match row.get(i) {
                    Some(spans) => self.table_cell(spans, widths[i]),
                    None => " ".repeat(widths[i]),
                })
                .collect();
            lines.push(format!("| {} |", cells.join(" | ")));
        }
    }

    fn table_cell(&self, spans: &[InlineSpan], width: usize) -> String {
        let text = spans_text(spans);
        let text_width = text.width();
        if text_width > width {
            return truncate_to_width(&text, width);
        }
        // Styling is invisible, so pad by the unstyled width.
        let mut cell = if self.styled {
            self.spans(spans)
        } else {
            text
        };
        cell.push_str(&" ".repeat(width - text_width));
        cell
    }

    fn strong(&self, text: &str) -> String {
        if self.styled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn accent(&self, text: &str) -> String {
        if self.styled {
            text.blue().to_string()
        } else {
            text.to_string()
        }
    }

    fn faint(&self, text: &str) -> String {
        if self.styled {
            text.dim().to_string()
        } else {
            text.to_string()
        }
    }
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Shrink the widest columns until the table fits `max_width`.
fn fit_widths(widths: &mut [usize], max_width: usize) {
    // "| " + " | " between columns + " |"
    let chrome = widths.len() * 3 + 1;
    loop {
        let total: usize = widths.iter().sum::<usize>() + chrome;
        if total <= max_width {
            return;
        }
        let Some(widest) = widths
            .iter_mut()
            .filter(|w| **w > MIN_COL_WIDTH)
            .max_by_key(|w| **w)
        else {
            return;
        };
        *widest -= 1;
    }
}

/// Cut text to at most `width` columns, marking the cut with an ellipsis.
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NumberedItem, render_notes};

    #[test]
    fn test_plain_document() {
        let blocks = render_notes(
            "# Arrays\n\n## Access\n- O(1) by **index**\n1. Allocate\n**Remember:**\n✓ Contiguous\n```\nlet a = [1];\n```",
        );
        let out = TerminalRenderer::default().render(&blocks);
        assert_eq!(
            out,
            "Arrays\n======\n\nAccess\n------\n  • O(1) by index\n  1. Allocate\nRemember:\n✓ Contiguous\n    let a = [1];\n"
        );
    }

    #[test]
    fn test_plain_code_span_keeps_backticks() {
        let blocks = vec![RenderBlock::Paragraph {
            spans: vec![InlineSpan::plain("run "), InlineSpan::code("ls")],
        }];
        assert_eq!(TerminalRenderer::default().render(&blocks), "run `ls`\n");
    }

    #[test]
    fn test_table_alignment() {
        let blocks = render_notes("| Feature | Array |\n|---|---|\n| Access | O(1) |");
        let out = TerminalRenderer::default().render(&blocks);
        assert_eq!(
            out,
            "| Feature | Array |\n|---------|-------|\n| Access  | O(1)  |\n"
        );
    }

    #[test]
    fn test_table_fits_max_width() {
        let long = "x".repeat(80);
        let blocks = render_notes(&format!("| A | B |\n| {long} | {long} |"));
        let out = TerminalRenderer::new(false, 40).render(&blocks);
        for line in out.lines() {
            assert!(line.width() <= 40, "line too wide: {line}");
        }
        assert!(out.contains('…'));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let blocks = vec![RenderBlock::Table {
            headers: vec!["A".into()],
            rows: vec![vec![vec![InlineSpan::plain("1")], vec![InlineSpan::plain("2")]]],
        }];
        let out = TerminalRenderer::default().render(&blocks);
        assert_eq!(out, "| A |   |\n|---|---|\n| 1 | 2 |\n");
    }

    #[test]
    fn test_styled_output_has_escape_codes() {
        let blocks = vec![RenderBlock::NumberedList {
            items: vec![NumberedItem {
                label: "1".into(),
                spans: vec![InlineSpan::bold("step")],
            }],
        }];
        let out = TerminalRenderer::new(true, DEFAULT_MAX_WIDTH).render(&blocks);
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("step"));
    }

    #[test]
    fn test_key_points_and_definitions() {
        let renderer = TerminalRenderer::default();
        let points = renderer.key_points(&["*First point".to_string()]);
        assert_eq!(points, "1 key points\n\n 1. First point\n");

        let defs = renderer.definitions(&["**Node**: A unit of a list".to_string()]);
        assert_eq!(defs, "1 terms defined\n\nNode\n    A unit of a list\n\n");
    }

    #[test]
    fn test_transcript_paragraphs() {
        let out = TerminalRenderer::default().transcript("One.\n\n\nTwo.");
        assert_eq!(out, "One.\n\nTwo.\n");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("abc", 4), "abc");
        assert_eq!(truncate_to_width("日本語", 4), "日…");
    }

    #[test]
    fn test_color_choice_names() {
        assert_eq!("never".parse::<ColorChoice>().unwrap(), ColorChoice::Never);
        assert!(!ColorChoice::Never.use_color());
        assert!(ColorChoice::Always.use_color());
    }
}
