//! Section-aware parsing of raw generator responses.
//!
//! A single forward pass walks the response line by line, tracking which
//! labelled section the text currently belongs to. Once the full-notes section
//! starts it captures everything that follows, header lookalikes included.
//! After the pass each field that came up short is filled from a looser
//! whole-document scan, and finally from title-derived defaults.

use tracing::debug;

use super::patterns;
use super::{GenerationMode, MAX_DEFINITIONS, MAX_KEY_POINTS, MAX_SUMMARY_CHARS, ParsedNotes};

/// Lines this long or longer are never section headers.
const HEADER_MAX_CHARS: usize = 100;

/// A section summary shorter than this triggers the paragraph scan.
const MIN_SECTION_SUMMARY_CHARS: usize = 100;

/// A final summary shorter than this is replaced by the default.
const MIN_SUMMARY_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Summary,
    KeyPoints,
    Definitions,
    FullNotes,
}

/// Header keywords per section, checked in order; the first match wins.
const SECTION_KEYWORDS: &[(Section, &[&str])] = &[
    (Section::Summary, &["summary", "overview"]),
    (
        Section::KeyPoints,
        &["key point", "main point", "key takeaway", "section 2"],
    ),
    (
        Section::Definitions,
        &["definition", "key term", "terminology", "section 3"],
    ),
    (
        Section::FullNotes,
        &["full note", "detailed note", "comprehensive note", "section 4"],
    ),
];

impl Section {
    /// Classify a trimmed line as a section header.
    fn from_header(line: &str) -> Option<Self> {
        if char_len(line) >= HEADER_MAX_CHARS {
            return None;
        }
        let lower = line.to_lowercase();

        SECTION_KEYWORDS
            .iter()
            .find(|(section, keywords)| {
                keywords.iter().any(|k| lower.contains(k)) && section.header_shape(&lower)
            })
            .map(|(section, _)| *section)
    }

    /// Prose mentions "summary" far more often than the other labels, so a
    /// summary header must also look like one.
    fn header_shape(self, lower: &str) -> bool {
        match self {
            Section::Summary => {
                let label = patterns::numbered_prefix().replace(lower, "");
                let label = label.trim_start();
                label.starts_with("**") || label.starts_with('#') || lower.contains("section 1")
            }
            _ => true,
        }
    }
}

/// Section buffers filled during the pass.
#[derive(Debug, Default)]
struct Collected<'a> {
    summary: Vec<&'a str>,
    key_points: Vec<String>,
    definitions: Vec<String>,
    /// `None` until the full-notes header is seen
    full_notes: Option<Vec<&'a str>>,
}

struct ResponseParser<'a> {
    section: Section,
    collected: Collected<'a>,
}

impl<'a> ResponseParser<'a> {
    fn new() -> Self {
        Self {
            section: Section::Preamble,
            collected: Collected::default(),
        }
    }

    fn feed(&mut self, raw: &'a str) {
        // Terminal state: the rest of the document is the notes body.
        if self.section == Section::FullNotes {
            if let Some(body) = self.collected.full_notes.as_mut() {
                body.push(raw.trim());
            }
            return;
        }

        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if let Some(next) = Section::from_header(line) {
            self.enter(next);
            return;
        }

        if patterns::response_separator().is_match(line) {
            return;
        }

        match self.section {
            Section::Summary => {
                if is_summary_line(line) {
                    self.collected.summary.push(line);
                }
            }
            Section::KeyPoints => {
                if let Some(point) = key_point_entry(line) {
                    self.collected.key_points.push(point);
                }
            }
            Section::Definitions => {
                if let Some(definition) = definition_entry(line) {
                    self.collected.definitions.push(definition);
                }
            }
            Section::Preamble | Section::FullNotes => {}
        }
    }

    fn enter(&mut self, section: Section) {
        debug!(?section, "entering section");
        self.section = section;
        match section {
            Section::Summary => self.collected.summary.clear(),
            Section::KeyPoints => self.collected.key_points.clear(),
            Section::Definitions => self.collected.definitions.clear(),
            Section::FullNotes => self.collected.full_notes = Some(Vec::new()),
            Section::Preamble => {}
        }
    }

    fn finish(self, response: &str, title: &str) -> ParsedNotes {
        let Collected {
            summary,
            key_points,
            definitions,
            full_notes,
        } = self.collected;

        let mut summary = truncate_chars(summary.join(" ").trim(), MAX_SUMMARY_CHARS);
        if char_len(&summary) < MIN_SECTION_SUMMARY_CHARS {
            summary = summary_from_paragraphs(response);
            debug!(chars = char_len(&summary), "summary taken from paragraph scan");
        }

        let mut key_points = key_points;
        if key_points.is_empty() {
            key_points = key_points_from_bullets(response);
            debug!(count = key_points.len(), "key points taken from bullet scan");
        }

        let mut definitions = definitions;
        if definitions.is_empty() {
            definitions = definitions_from_colon_lines(response);
            debug!(count = definitions.len(), "definitions taken from colon scan");
        }

        let mut full_notes = match full_notes {
            Some(body) => body.join("\n").trim().to_string(),
            None => {
                debug!("no full notes section, using whole response");
                response.trim().to_string()
            }
        };
        // "## " contains "# ", so this covers both top levels.
        if !full_notes.contains("# ") {
            full_notes = format!("# {title}\n\n{full_notes}");
        }

        let mut summary = truncate_chars(summary.trim(), MAX_SUMMARY_CHARS);
        if char_len(&summary) < MIN_SUMMARY_CHARS {
            debug!("summary too short, using default");
            summary = default_summary(title);
        }

        key_points.truncate(MAX_KEY_POINTS);
        key_points.retain(|p| char_len(p.trim()) > 10);
        if key_points.is_empty() {
            debug!("no key points found, using defaults");
            key_points = default_key_points();
        }

        definitions.truncate(MAX_DEFINITIONS);
        definitions.retain(|d| d.contains(':'));
        if definitions.is_empty() {
            debug!("no definitions found, using defaults");
            definitions = default_definitions(title);
        }

        ParsedNotes {
            summary,
            key_points,
            definitions,
            full_notes: full_notes.trim().to_string(),
        }
    }
}

/// Parse a raw generator response into structured notes.
///
/// Never fails: missing or malformed sections fall back to looser scans of the
/// whole response and finally to defaults derived from `title`. The mode is
/// recorded for diagnostics only; every mode goes through the same recovery.
///
/// # Examples
///
/// ```
/// use lecturescribe::notes::{parse_response, GenerationMode};
///
/// let notes = parse_response("", "Thermodynamics", GenerationMode::Full);
/// assert!(notes.summary.contains("Thermodynamics"));
/// assert_eq!(notes.full_notes, "# Thermodynamics");
/// ```
pub fn parse_response(response: &str, title: &str, mode: GenerationMode) -> ParsedNotes {
    let _span = tracing::debug_span!("parse_response", %mode, title).entered();

    let response = response.replace("\r\n", "\n");
    let mut parser = ResponseParser::new();
    for line in response.lines() {
        parser.feed(line);
    }

    let notes = parser.finish(&response, title);
    debug!(
        summary_chars = char_len(&notes.summary),
        key_points = notes.key_points.len(),
        definitions = notes.definitions.len(),
        "parsed response"
    );
    notes
}

fn is_summary_line(line: &str) -> bool {
    !line.starts_with('#')
        && !line.starts_with("**")
        && !patterns::numbered_prefix().is_match(line)
        && !line.to_lowercase().starts_with("section")
        && char_len(line) > 20
}

fn key_point_entry(line: &str) -> Option<String> {
    let is_item = line.starts_with(['-', '*', '•']) || patterns::numbered_prefix().is_match(line);
    if !is_item {
        return None;
    }

    let cleaned = patterns::list_marker().replace(line, "");
    let cleaned = cleaned.trim();
    (char_len(cleaned) > 15 && !cleaned.to_lowercase().contains("key point"))
        .then(|| cleaned.to_string())
}

fn definition_entry(line: &str) -> Option<String> {
    if !line.contains(':') || line.starts_with('#') {
        return None;
    }

    let cleaned = patterns::list_marker().replace(line, "");
    let cleaned = cleaned.trim();
    let lower = cleaned.to_lowercase();
    let len = char_len(cleaned);
    ((25..300).contains(&len) && !lower.starts_with("definition") && !lower.contains("section"))
        .then(|| cleaned.to_string())
}

/// First substantial prose paragraphs of the response.
fn summary_from_paragraphs(response: &str) -> String {
    let paragraphs: Vec<&str> = response
        .split("\n\n")
        .map(str::trim)
        .filter(|p| {
            let lower = p.to_lowercase();
            (80..2000).contains(&char_len(p))
                && !p.starts_with('#')
                && !lower.contains('━')
                && !lower.contains("section 2")
                && !lower.contains("section 3")
                && !lower.contains("section 4")
                && !patterns::key_point_label().is_match(&lower)
                && !patterns::definition_label().is_match(&lower)
        })
        .take(3)
        .collect();

    truncate_chars(paragraphs.join("\n\n").trim(), MAX_SUMMARY_CHARS)
}

/// Bullet lines anywhere in the response, ignoring section structure.
fn key_points_from_bullets(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|l| {
            let lower = l.to_lowercase();
            l.starts_with(['-', '*', '•'])
                && (20..500).contains(&char_len(l))
                && !lower.contains("summary")
                && !lower.contains("section")
        })
        .take(MAX_KEY_POINTS)
        .map(|l| patterns::bullet_marker().replace(l, "").trim().to_string())
        .filter(|p| char_len(p) > 15)
        .collect()
}

/// `Term: meaning` shaped lines anywhere in the response.
fn definitions_from_colon_lines(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|l| {
            let lower = l.to_lowercase();
            l.contains(':')
                && (25..300).contains(&char_len(l))
                && !lower.contains("transcript")
                && !lower.contains("source")
                && !lower.contains("section")
                && (patterns::capitalized_word().is_match(l) || l.starts_with(['-', '*', '•']))
        })
        .map(|l| patterns::bullet_marker().replace(l, "").trim().to_string())
        .take(MAX_DEFINITIONS)
        .collect()
}

fn default_summary(title: &str) -> String {
    format!(
        "These study notes cover {title}. They walk through the core concepts, show how \
         they apply in practice and introduce the key terminology, giving a solid \
         foundation for further study and exam preparation."
    )
}

fn default_key_points() -> Vec<String> {
    [
        "Core concepts and fundamental principles of the topic",
        "Practical examples and real-world applications",
        "Key terminology and technical vocabulary",
        "Relationships and connections between the main ideas",
        "Approaches to solving typical problems in this area",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_definitions(title: &str) -> Vec<String> {
    vec![
        format!("{title}: The subject these study notes are about"),
        "Core Concepts: The fundamental ideas explored throughout the material".to_string(),
        "Key Terms: Vocabulary needed to discuss the topic precisely".to_string(),
    ]
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
