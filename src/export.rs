//! Plain-text export of a stored note.

use crate::store::Note;

const RULE: &str = "---";

/// Render a note as a plain-text document.
///
/// Layout: title with an `=` underline, date and source lines, then the full
/// notes, transcript, key points and definitions, each under an upper-case
/// heading and separated by `---` rules.
pub fn to_plain_text(note: &Note) -> String {
    let underline = "=".repeat(note.title.chars().count());
    let date = note.date.format("%-m/%-d/%Y");
    let key_points = bulleted(&note.key_points);
    let definitions = bulleted(&note.definitions);

    format!(
        "{title}\n{underline}\n\nDate: {date}\nSource: {source}\n\n\
         {RULE}\n\nFULL NOTES\n\n{full_notes}\n\n\
         {RULE}\n\nTRANSCRIPT\n\n{transcript}\n\n\
         {RULE}\n\nKEY POINTS\n\n{key_points}\n\n\
         {RULE}\n\nDEFINITIONS\n\n{definitions}",
        title = note.title,
        source = note.source_info,
        full_notes = note.full_notes,
        transcript = note.transcript,
    )
}

/// File name for an exported note: lower-case, whitespace runs become `-`.
///
/// Characters that are not allowed in file names on common platforms are
/// dropped.
///
/// ```
/// use lecturescribe::export::file_name;
///
/// assert_eq!(file_name("Machine  Learning Basics"), "machine-learning-basics.txt");
/// ```
pub fn file_name(title: &str) -> String {
    let stem = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
        .replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "");

    if stem.is_empty() {
        "notes.txt".to_string()
    } else {
        format!("{stem}.txt")
    }
}

fn bulleted(entries: &[String]) -> String {
    entries
        .iter()
        .map(|entry| format!("• {entry}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NoteSource;
    use chrono::{TimeZone, Utc};

    fn note() -> Note {
        Note {
            id: "demo-2".to_string(),
            title: "Arrays".to_string(),
            date: Utc.with_ymd_and_hms(2026, 2, 12, 9, 30, 0).unwrap(),
            source: NoteSource::Video,
            source_info: "https://youtube.com/watch?v=example123".to_string(),
            transcript: "Arrays store elements contiguously.".to_string(),
            summary: "Arrays compared.".to_string(),
            key_points: vec!["O(1) access".to_string(), "Fixed size".to_string()],
            definitions: vec!["Array: contiguous elements".to_string()],
            full_notes: "# Arrays\n\n- Contiguous".to_string(),
        }
    }

    #[test]
    fn test_plain_text_layout() {
        let expected = "Arrays\n======\n\n\
             Date: 2/12/2026\n\
             Source: https://youtube.com/watch?v=example123\n\n\
             ---\n\nFULL NOTES\n\n# Arrays\n\n- Contiguous\n\n\
             ---\n\nTRANSCRIPT\n\nArrays store elements contiguously.\n\n\
             ---\n\nKEY POINTS\n\n• O(1) access\n• Fixed size\n\n\
             ---\n\nDEFINITIONS\n\n• Array: contiguous elements";
        assert_eq!(to_plain_text(&note()), expected);
    }

    #[test]
    fn test_empty_lists() {
        let mut note = note();
        note.key_points.clear();
        note.definitions.clear();
        let text = to_plain_text(&note);
        assert!(text.ends_with("KEY POINTS\n\n\n\n---\n\nDEFINITIONS\n\n"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("Data Structures: Arrays and Linked Lists"),
            "data-structures-arrays-and-linked-lists.txt"
        );
        assert_eq!(file_name("  CS/101\tIntro "), "cs101-intro.txt");
        assert_eq!(file_name("   "), "notes.txt");
    }
}
