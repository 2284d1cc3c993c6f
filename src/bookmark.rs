//! Saved verses. Storage is injected through [`BookmarkStore`]; the list is
//! read once and written back whole after every change.

use crate::verse::VerseRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

pub const DEFAULT_COLLECTION: &str = "General";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Bookmark storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bookmark storage is corrupt: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No bookmark with id {0}")]
    Unknown(String),
    #[error("Bookmark store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub mandala: u8,
    pub hymn: u16,
    pub verse: u16,
    #[serde(default)]
    pub note: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    pub timestamp: DateTime<Utc>,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Bookmark {
    pub fn reference(&self) -> VerseRef {
        VerseRef {
            mandala: self.mandala,
            hymn: self.hymn,
            verse: self.verse,
        }
    }
}

pub trait BookmarkStore {
    fn load(&self) -> Result<Vec<Bookmark>, StoreError>;
    fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StoreError>;
}

/// One JSON array in one file, replaced atomically on save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BookmarkStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Bookmark>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StoreError> {
        let parent_dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir)?;

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer_pretty(&mut writer, bookmarks)?;
            writer.flush()?;
        }
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        tracing::info!(path = %self.path.display(), count = bookmarks.len(), "saved bookmarks");
        Ok(())
    }
}

/// In-process store, mainly for tests and the browser build.
#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Option<String>>,
}

impl MemoryStore {
    /// The raw JSON as last saved.
    pub fn raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.saved.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }
}

impl BookmarkStore for MemoryStore {
    fn load(&self) -> Result<Vec<Bookmark>, StoreError> {
        match self.raw()? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StoreError> {
        let json = serde_json::to_string(bookmarks)?;
        *self.saved.lock().map_err(|_| StoreError::Poisoned)? = Some(json);
        Ok(())
    }
}

impl<S: BookmarkStore + ?Sized> BookmarkStore for &S {
    fn load(&self) -> Result<Vec<Bookmark>, StoreError> {
        (**self).load()
    }

    fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StoreError> {
        (**self).save(bookmarks)
    }
}

pub struct Bookmarks<S> {
    store: S,
    items: Vec<Bookmark>,
}

impl<S: BookmarkStore> Bookmarks<S> {
    pub fn open(store: S) -> Result<Self, StoreError> {
        let items = store.load()?;
        tracing::debug!(count = items.len(), "loaded bookmarks");
        Ok(Self { store, items })
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.items
    }

    pub fn add(
        &mut self,
        r: VerseRef,
        note: &str,
        collection: Option<&str>,
    ) -> Result<&Bookmark, StoreError> {
        let collection = collection
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COLLECTION);
        let bookmark = Bookmark {
            id: uuid::Uuid::new_v4().to_string(),
            mandala: r.mandala,
            hymn: r.hymn,
            verse: r.verse,
            note: note.trim().to_string(),
            collection: collection.to_string(),
            timestamp: Utc::now(),
        };
        let mut next = self.items.clone();
        next.push(bookmark);
        self.commit(next)?;
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove(&mut self, id: &str) -> Result<Bookmark, StoreError> {
        let index = self.index_of(id)?;
        let mut next = self.items.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    pub fn set_note(&mut self, id: &str, note: &str) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        let mut next = self.items.clone();
        next[index].note = note.trim().to_string();
        self.commit(next)
    }

    pub fn find(&self, r: VerseRef) -> impl Iterator<Item = &Bookmark> {
        self.items.iter().filter(move |b| b.reference() == r)
    }

    pub fn in_collection<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a Bookmark> {
        self.items.iter().filter(move |b| b.collection == collection)
    }

    /// Distinct collection names in first-use order.
    pub fn collections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for b in &self.items {
            if !names.contains(&b.collection.as_str()) {
                names.push(&b.collection);
            }
        }
        names
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.items
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::Unknown(id.to_string()))
    }

    /// Persist first so memory never runs ahead of storage.
    fn commit(&mut self, next: Vec<Bookmark>) -> Result<(), StoreError> {
        self.store.save(&next)?;
        self.items = next;
        Ok(())
    }
}
