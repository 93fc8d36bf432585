//! Line-by-line block renderer.
//!
//! Each line is classified once, in priority order, and most kinds map to a
//! single block. Consecutive bullet or numbered lines accumulate in a pending
//! list that is flushed before any other block is emitted. Tables and code
//! fences consume the following lines that belong to them.

use std::mem;

use tracing::debug;

use super::inline::parse_inline;
use super::{InlineSpan, NumberedItem, RenderBlock};
use crate::notes::patterns;

const HEADING_PREFIXES: [(&str, u8); 4] = [("# ", 1), ("## ", 2), ("### ", 3), ("#### ", 4)];

const FENCE: &str = "```";

/// Classification of a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind<'a> {
    Separator,
    TableRow,
    Fence { language: Option<&'a str> },
    Heading { level: u8, text: &'a str },
    Bullet(&'a str),
    Label(&'a str),
    Numbered { label: &'a str, text: &'a str },
    Check { ok: bool, text: &'a str },
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();

    if patterns::render_separator().is_match(trimmed) {
        return LineKind::Separator;
    }
    if line.starts_with('|') {
        return LineKind::TableRow;
    }
    if let Some(info) = line.strip_prefix(FENCE) {
        let info = info.trim();
        return LineKind::Fence {
            language: (!info.is_empty()).then_some(info),
        };
    }
    for (prefix, level) in HEADING_PREFIXES {
        if let Some(text) = line.strip_prefix(prefix) {
            return LineKind::Heading { level, text };
        }
    }
    if let Some(text) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
        return LineKind::Bullet(text);
    }
    if patterns::standalone_bold().is_match(trimmed) {
        return LineKind::Label(trimmed);
    }
    if let Some(caps) = patterns::numbered_item().captures(line) {
        if let (Some(label), Some(text)) = (caps.get(1), caps.get(2)) {
            return LineKind::Numbered {
                label: label.as_str(),
                text: text.as_str(),
            };
        }
    }
    if let Some(text) = line.strip_prefix("✓ ") {
        return LineKind::Check { ok: true, text };
    }
    if let Some(text) = line.strip_prefix("✗ ") {
        return LineKind::Check { ok: false, text };
    }
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    LineKind::Text(line)
}

/// List items waiting for the end of their run. At most one kind is open.
#[derive(Debug, Default)]
enum PendingList {
    #[default]
    Empty,
    Bullets(Vec<Vec<InlineSpan>>),
    Numbered(Vec<NumberedItem>),
}

#[derive(Debug, Default)]
struct BlockBuilder {
    blocks: Vec<RenderBlock>,
    pending: PendingList,
}

impl BlockBuilder {
    fn flush(&mut self) {
        match mem::take(&mut self.pending) {
            PendingList::Empty => {}
            PendingList::Bullets(items) => self.blocks.push(RenderBlock::BulletList { items }),
            PendingList::Numbered(items) => {
                self.blocks.push(RenderBlock::NumberedList { items })
            }
        }
    }

    fn push(&mut self, block: RenderBlock) {
        self.flush();
        self.blocks.push(block);
    }

    fn push_bullet(&mut self, item: Vec<InlineSpan>) {
        if let PendingList::Bullets(items) = &mut self.pending {
            items.push(item);
        } else {
            self.flush();
            self.pending = PendingList::Bullets(vec![item]);
        }
    }

    fn push_numbered(&mut self, item: NumberedItem) {
        if let PendingList::Numbered(items) = &mut self.pending {
            items.push(item);
        } else {
            self.flush();
            self.pending = PendingList::Numbered(vec![item]);
        }
    }

    fn finish(mut self) -> Vec<RenderBlock> {
        self.flush();
        self.blocks
    }
}

/// Render note text into display blocks.
///
/// Total over all input: a line that matches no construct becomes paragraph
/// text. Empty input yields no blocks.
///
/// # Examples
///
/// ```
/// use lecturescribe::render::{render_notes, RenderBlock};
///
/// let blocks = render_notes("## Arrays\n- O(1) access");
/// assert_eq!(blocks.len(), 2);
/// assert!(matches!(&blocks[0], RenderBlock::Heading { level: 2, text } if text == "Arrays"));
/// ```
pub fn render_notes(text: &str) -> Vec<RenderBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let mut builder = BlockBuilder::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        match classify(line) {
            // Rules are invisible: they neither emit nor break a list.
            LineKind::Separator => {}
            LineKind::TableRow => {
                let start = i - 1;
                while i < lines.len() && lines[i].starts_with('|') {
                    i += 1;
                }
                builder.flush();
                if let Some(table) = table_block(&lines[start..i]) {
                    builder.push(table);
                }
            }
            LineKind::Fence { language } => {
                let start = i;
                while i < lines.len() && !lines[i].starts_with(FENCE) {
                    i += 1;
                }
                let body = lines[start..i].iter().map(|l| l.to_string()).collect();
                // Step over the closing fence when there is one.
                i = (i + 1).min(lines.len());
                builder.push(RenderBlock::CodeBlock {
                    language: language.map(str::to_string),
                    lines: body,
                });
            }
            LineKind::Heading { level, text } => builder.push(RenderBlock::Heading {
                level,
                text: text.replace("**", "").trim().to_string(),
            }),
            LineKind::Bullet(text) => builder.push_bullet(parse_inline(text)),
            LineKind::Label(text) => {
                let text = text.replace("**", "");
                let text = text.trim().trim_end_matches(':').trim();
                builder.push(RenderBlock::Label {
                    text: text.to_string(),
                });
            }
            LineKind::Numbered { label, text } => builder.push_numbered(NumberedItem {
                label: label.to_string(),
                spans: parse_inline(text),
            }),
            LineKind::Check { ok, text } => builder.push(RenderBlock::CheckLine {
                ok,
                spans: parse_inline(text),
            }),
            LineKind::Blank => builder.push(RenderBlock::Blank),
            LineKind::Text(text) => {
                builder.flush();
                let cleaned = patterns::stray_asterisk().replace(text, "");
                let spans = parse_inline(cleaned.trim());
                if !spans.is_empty() {
                    builder.push(RenderBlock::Paragraph { spans });
                }
            }
        }
    }

    let blocks = builder.finish();
    debug!(lines = lines.len(), blocks = blocks.len(), "rendered notes");
    blocks
}

/// Build a table from consecutive `|` lines, skipping alignment rows.
fn table_block(lines: &[&str]) -> Option<RenderBlock> {
    let mut rows = lines
        .iter()
        .filter(|l| !patterns::table_divider().is_match(l));

    let headers = split_row(rows.next()?)
        .into_iter()
        .map(str::to_string)
        .collect();
    let rows = rows
        .map(|row| split_row(row).into_iter().map(parse_inline).collect())
        .collect();

    Some(RenderBlock::Table { headers, rows })
}

/// Trimmed cells of a pipe row, without the empty edges outside the outer pipes.
fn split_row(row: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = row.split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}
