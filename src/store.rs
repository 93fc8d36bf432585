//! Persistent note collection.
//!
//! Notes live in a single JSON file. The store is loaded into memory, mutated
//! there, and written back atomically with [`NoteStore::save`].

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::notes::ParsedNotes;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Note store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace note store: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("No note with id {id}")]
    NotFound { id: String },

    #[error("Id prefix {prefix} matches more than one note")]
    Ambiguous { prefix: String },

    #[error("Note title cannot be empty")]
    EmptyTitle,
}

/// Where a lecture came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoteSource {
    #[default]
    Audio,
    Video,
    Link,
}

/// A stored lecture note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub source: NoteSource,
    /// File name or URL of the source
    pub source_info: String,
    pub transcript: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub definitions: Vec<String>,
    pub full_notes: String,
}

/// Note contents before the store assigns an id and date.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub title: String,
    pub source: NoteSource,
    pub source_info: String,
    pub transcript: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub definitions: Vec<String>,
    pub full_notes: String,
}

impl NewNote {
    /// Combine parsed notes with the upload they were generated from.
    pub fn from_parsed(
        parsed: ParsedNotes,
        title: impl Into<String>,
        source: NoteSource,
        source_info: impl Into<String>,
        transcript: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source,
            source_info: source_info.into(),
            transcript: transcript.into(),
            summary: parsed.summary,
            key_points: parsed.key_points,
            definitions: parsed.definitions,
            full_notes: parsed.full_notes,
        }
    }
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub source_info: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub key_points: Option<Vec<String>>,
    pub definitions: Option<Vec<String>>,
    pub full_notes: Option<String>,
}

impl NotePatch {
    fn apply(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(source_info) = self.source_info {
            note.source_info = source_info;
        }
        if let Some(transcript) = self.transcript {
            note.transcript = transcript;
        }
        if let Some(summary) = self.summary {
            note.summary = summary;
        }
        if let Some(key_points) = self.key_points {
            note.key_points = key_points;
        }
        if let Some(definitions) = self.definitions {
            note.definitions = definitions;
        }
        if let Some(full_notes) = self.full_notes {
            note.full_notes = full_notes;
        }
    }
}

/// Listing order for [`NoteStore::query`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Title, A to Z
    Az,
    /// Title, Z to A
    Za,
}

/// Filter and order for listing notes. The default matches every note, newest first.
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
    /// Case-insensitive substring of the title or source info
    pub search: Option<String>,
    pub source: Option<NoteSource>,
    pub sort: SortOrder,
}

impl NoteQuery {
    pub fn matches(&self, note: &Note) -> bool {
        let source_ok = self.source.is_none_or(|source| note.source == source);
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                note.title.to_lowercase().contains(&needle)
                    || note.source_info.to_lowercase().contains(&needle)
            }
        };
        source_ok && search_ok
    }
}

/// Note totals per source, over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub total: usize,
    pub audio: usize,
    pub video: usize,
    pub link: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NotesFile {
    #[serde(default)]
    notes: Vec<Note>,
}

/// Notes ordered newest first, backed by a JSON file.
#[derive(Debug)]
pub struct NoteStore {
    path: PathBuf,
    notes: Vec<Note>,
}

impl NoteStore {
    /// Default location: `<data dir>/lecturescribe/notes.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lecturescribe")
            .join("notes.json")
    }

    /// Load the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let notes = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str::<NotesFile>(&contents)?.notes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), count = notes.len(), "opened note store");
        Ok(Self { path, notes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Look up a note by full id or by a unique id prefix.
    pub fn resolve(&self, prefix: &str) -> Result<&Note, StoreError> {
        if let Some(note) = self.get(prefix) {
            return Ok(note);
        }
        let mut matches = self.notes.iter().filter(|note| note.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(note), None) if !prefix.is_empty() => Ok(note),
            (Some(_), Some(_)) => Err(StoreError::Ambiguous {
                prefix: prefix.to_string(),
            }),
            _ => Err(StoreError::NotFound {
                id: prefix.to_string(),
            }),
        }
    }

    /// Notes matching `query`, in its sort order. Ties keep store order.
    pub fn query(&self, query: &NoteQuery) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().filter(|n| query.matches(n)).collect();
        match query.sort {
            SortOrder::Newest => notes.sort_by(|a, b| b.date.cmp(&a.date)),
            SortOrder::Oldest => notes.sort_by(|a, b| a.date.cmp(&b.date)),
            SortOrder::Az => notes.sort_by_cached_key(|n| n.title.to_lowercase()),
            SortOrder::Za => {
                notes.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
            }
        }
        debug!(matched = notes.len(), sort = %query.sort, "queried notes");
        notes
    }

    pub fn counts(&self) -> SourceCounts {
        self.notes.iter().fold(
            SourceCounts {
                total: self.notes.len(),
                ..Default::default()
            },
            |mut counts, note| {
                match note.source {
                    NoteSource::Audio => counts.audio += 1,
                    NoteSource::Video => counts.video += 1,
                    NoteSource::Link => counts.link += 1,
                }
                counts
            },
        )
    }

    /// Insert a note at the front and return its new id.
    pub fn add(&mut self, note: NewNote) -> Result<String, StoreError> {
        if note.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let id = Uuid::new_v4().to_string();
        self.notes.insert(
            0,
            Note {
                id: id.clone(),
                title: note.title,
                date: Utc::now(),
                source: note.source,
                source_info: note.source_info,
                transcript: note.transcript,
                summary: note.summary,
                key_points: note.key_points,
                definitions: note.definitions,
                full_notes: note.full_notes,
            },
        );
        info!(%id, "added note");
        Ok(id)
    }

    pub fn update(&mut self, id: &str, patch: NotePatch) -> Result<&Note, StoreError> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(StoreError::EmptyTitle);
        }
        let note = self
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        patch.apply(note);
        debug!(%id, "updated note");
        Ok(note)
    }

    pub fn delete(&mut self, id: &str) -> Result<Note, StoreError> {
        let index = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        info!(%id, "deleted note");
        Ok(self.notes.remove(index))
    }

    /// Remove every listed note. Unknown ids are ignored. Returns how many went.
    pub fn delete_many<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let before = self.notes.len();
        self.notes
            .retain(|note| !ids.iter().any(|id| id.as_ref() == note.id));
        let removed = before - self.notes.len();
        info!(removed, "deleted notes");
        removed
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.notes.len();
        self.notes.clear();
        info!(removed, "cleared note store");
        removed
    }

    /// Write the store to disk through a temp file in the same directory.
    pub fn save(&self) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let file = NotesFile {
            notes: self.notes.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(&self.path)?;

        debug!(path = %self.path.display(), count = self.notes.len(), "saved note store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(title: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            source: NoteSource::Video,
            source_info: "https://example.com/lecture".to_string(),
            transcript: "Arrays store elements contiguously.".to_string(),
            summary: "A comparison of arrays and linked lists.".to_string(),
            key_points: vec!["Arrays provide O(1) random access".to_string()],
            definitions: vec!["Array: A contiguous collection".to_string()],
            full_notes: "# Arrays".to_string(),
        }
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_puts_newest_first() {
        let dir = TempDir::new().unwrap();
        let mut store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        let first = store.add(sample("First")).unwrap();
        let second = store.add(sample("Second")).unwrap();

        assert_ne!(first, second);
        let titles: Vec<_> = store.list().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["Second", "First"]);
        assert_eq!(store.get(&first).unwrap().title, "First");
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("notes.json");
        let mut store = NoteStore::open(&path).unwrap();
        let id = store.add(sample("Arrays")).unwrap();
        store.save().unwrap();

        let reopened = NoteStore::open(&path).unwrap();
        assert_eq!(reopened.list(), store.list());
        assert_eq!(reopened.get(&id).unwrap().source, NoteSource::Video);
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        let mut store = NoteStore::open(&path).unwrap();
        store.add(sample("Arrays")).unwrap();
        store.save().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let note = &value["notes"][0];
        assert_eq!(note["source"], "video");
        assert!(note["keyPoints"].is_array());
        assert!(note["sourceInfo"].is_string());
        assert!(note["fullNotes"].is_string());
    }

    #[test]
    fn test_update_patches_only_given_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        let id = store.add(sample("Arrays")).unwrap();

        let patch = NotePatch {
            title: Some("Arrays and Lists".to_string()),
            ..Default::default()
        };
        let note = store.update(&id, patch).unwrap();
        assert_eq!(note.title, "Arrays and Lists");
        assert_eq!(note.full_notes, "# Arrays");
    }

    #[test]
    fn test_missing_ids() {
        let dir = TempDir::new().unwrap();
        let mut store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        assert!(matches!(
            store.update("nope", NotePatch::default()),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(store.delete("nope"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_empty_title_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        assert!(matches!(store.add(sample("  ")), Err(StoreError::EmptyTitle)));

        let id = store.add(sample("Arrays")).unwrap();
        let patch = NotePatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(store.update(&id, patch), Err(StoreError::EmptyTitle)));
    }

    #[test]
    fn test_delete_many_and_clear() {
        let dir = TempDir::new().unwrap();
        let mut store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        let a = store.add(sample("A")).unwrap();
        let b = store.add(sample("B")).unwrap();
        store.add(sample("C")).unwrap();

        assert_eq!(store.delete_many(&[a, b, "unknown".to_string()]), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.clear(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_resolve_prefix() {
        let dir = TempDir::new().unwrap();
        let mut store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        let id = store.add(sample("Arrays")).unwrap();

        assert_eq!(store.resolve(&id[..8]).unwrap().id, id);
        assert!(matches!(store.resolve("zzzz"), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.resolve(""), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_from_parsed_keeps_metadata() {
        let parsed = ParsedNotes {
            summary: "Summary".to_string(),
            key_points: vec!["Point".to_string()],
            definitions: vec!["Term: meaning".to_string()],
            full_notes: "# Title".to_string(),
        };
        let note = NewNote::from_parsed(parsed, "Title", NoteSource::Link, "https://x", "words");
        assert_eq!(note.source, NoteSource::Link);
        assert_eq!(note.transcript, "words");
        assert_eq!(note.full_notes, "# Title");
    }

    fn store_with(notes: &[(&str, NoteSource, &str)]) -> (TempDir, NoteStore) {
        let dir = TempDir::new().unwrap();
        let mut store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        for (title, source, info) in notes {
            let mut note = sample(title);
            note.source = *source;
            note.source_info = info.to_string();
            store.add(note).unwrap();
        }
        (dir, store)
    }

    fn titles(notes: &[&Note]) -> Vec<String> {
        notes.iter().map(|n| n.title.clone()).collect()
    }

    #[test]
    fn test_query_search_matches_title_or_source_info() {
        let (_dir, store) = store_with(&[
            ("Organic Chemistry", NoteSource::Audio, "chem101.mp3"),
            ("Linear Algebra", NoteSource::Link, "https://example.com/MATRICES"),
            ("World History", NoteSource::Video, "history.mp4"),
        ]);

        let query = NoteQuery {
            search: Some("CHEM".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&store.query(&query)), ["Organic Chemistry"]);

        let query = NoteQuery {
            search: Some("matrices".to_string()),
            ..Default::default()
        };
        assert_eq!(titles(&store.query(&query)), ["Linear Algebra"]);

        let query = NoteQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(store.query(&query).len(), 3);
    }

    #[test]
    fn test_query_source_filter() {
        let (_dir, store) = store_with(&[
            ("A", NoteSource::Audio, "a.mp3"),
            ("B", NoteSource::Video, "b.mp4"),
            ("C", NoteSource::Audio, "c.mp3"),
        ]);
        let query = NoteQuery {
            source: Some(NoteSource::Audio),
            ..Default::default()
        };
        assert_eq!(titles(&store.query(&query)), ["C", "A"]);
    }

    #[test]
    fn test_query_sort_orders() {
        let (_dir, mut store) = store_with(&[
            ("banana", NoteSource::Audio, "x"),
            ("Apple", NoteSource::Audio, "x"),
            ("cherry", NoteSource::Audio, "x"),
        ]);
        for (i, note) in store.notes.iter_mut().enumerate() {
            note.date = DateTime::from_timestamp(1_700_000_000 - i as i64 * 60, 0).unwrap();
        }

        let sorted = |sort| titles(&store.query(&NoteQuery { sort, ..Default::default() }));
        assert_eq!(sorted(SortOrder::Newest), ["cherry", "Apple", "banana"]);
        assert_eq!(sorted(SortOrder::Oldest), ["banana", "Apple", "cherry"]);
        assert_eq!(sorted(SortOrder::Az), ["Apple", "banana", "cherry"]);
        assert_eq!(sorted(SortOrder::Za), ["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_counts_per_source() {
        let (_dir, store) = store_with(&[
            ("A", NoteSource::Audio, "a"),
            ("B", NoteSource::Video, "b"),
            ("C", NoteSource::Audio, "c"),
        ]);
        assert_eq!(
            store.counts(),
            SourceCounts {
                total: 3,
                audio: 2,
                video: 1,
                link: 0,
            }
        );
    }

    #[test]
    fn test_sort_order_names() {
        assert_eq!("za".parse::<SortOrder>().unwrap(), SortOrder::Za);
        assert_eq!(SortOrder::Newest.to_string(), "newest");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(NoteStore::open(&path), Err(StoreError::Json(_))));
    }
}
