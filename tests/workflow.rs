use std::time::Duration;

use lecturescribe::export;
use lecturescribe::generate::{GenerationError, RetryPolicy, generate_notes};
use lecturescribe::render::TerminalRenderer;
use lecturescribe::store::{NewNote, NotePatch, NoteSource};
use lecturescribe::{GenerationMode, NoteStore, render_notes};
use tempfile::TempDir;

const TRANSCRIPT: &str = "In today's lecture we explore two fundamental data structures: arrays \
                          and linked lists, and how their memory layout shapes their cost.";

const REPLY: &str = "\
**SECTION 1: SUMMARY**
Arrays keep their elements side by side in memory, which makes indexing constant time.
Linked lists trade that for cheap insertion, since nodes are joined by pointers.

**SECTION 2: KEY POINTS**
- Arrays provide O(1) random access via an index
- Linked lists allow O(1) insertion at a known position

**SECTION 3: DEFINITIONS**
Array: A collection of elements stored in contiguous memory
Node: A unit of a linked list holding data and a pointer

**SECTION 4: FULL NOTES**
# Arrays and Linked Lists
## Comparison
| Feature | Array | Linked List |
|---------|-------|-------------|
| Access | O(1) | O(n) |";

#[test]
fn generate_store_show_and_export() {
    let generator = |_: &str| -> Result<String, GenerationError> { Ok(REPLY.to_string()) };
    let parsed = generate_notes(
        &generator,
        TRANSCRIPT,
        "Arrays and Linked Lists",
        GenerationMode::Full,
        RetryPolicy::new(1, Duration::ZERO),
    )
    .unwrap();

    assert_eq!(parsed.key_points.len(), 2);
    assert_eq!(parsed.definitions.len(), 2);
    assert!(parsed.summary.starts_with("Arrays keep their elements"));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.json");
    let mut store = NoteStore::open(&path).unwrap();
    let id = store
        .add(NewNote::from_parsed(
            parsed,
            "Arrays and Linked Lists",
            NoteSource::Video,
            "https://youtube.com/watch?v=example123",
            TRANSCRIPT,
        ))
        .unwrap();
    store.save().unwrap();

    let mut store = NoteStore::open(&path).unwrap();
    store
        .update(
            &id,
            NotePatch {
                title: Some("Arrays vs Lists".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    let note = store.get(&id).unwrap();

    let rendered = TerminalRenderer::default().render(&render_notes(&note.full_notes));
    assert!(rendered.starts_with("Arrays and Linked Lists\n"));
    assert!(rendered.contains("| Access  | O(1)  | O(n)        |"));

    let text = export::to_plain_text(note);
    assert!(text.starts_with("Arrays vs Lists\n===============\n"));
    assert!(text.contains("• Node: A unit of a linked list holding data and a pointer"));
    assert_eq!(export::file_name(&note.title), "arrays-vs-lists.txt");
}
