//! A small file-backed document collection for memory records.
//!
//! Stands in for the external document store: the whole collection is held
//! in memory, loaded from a JSON file at open, and rewritten after every
//! mutation. An ephemeral mode backs tests and throwaway servers. The
//! behaviors that leak into the API contract — newest-created-first
//! listing, validate-on-update, a distinct not-found result — live here.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use crate::memory::{Memory, MemoryDraft, MemoryPatch};
use crate::{Error, Result};

/// A persistent collection of [`Memory`] records.
#[derive(Debug)]
pub struct MemoryStore {
    path: Option<PathBuf>,
    records: Vec<Memory>,
}

impl MemoryStore {
    /// Open a store backed by a JSON file, creating an empty collection
    /// when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<MemoryStore> {
        let path = path.into();
        let records = if path.exists() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice(&bytes)
                .map_err(|e| Error::Store(format!("Corrupt store file {}: {e}", path.display())))?
        } else {
            Vec::new()
        };
        tracing::info!(path = %path.display(), records = records.len(), "opened memory store");
        Ok(MemoryStore {
            path: Some(path),
            records,
        })
    }

    /// An in-memory store that never touches the filesystem.
    pub fn ephemeral() -> MemoryStore {
        MemoryStore {
            path: None,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, newest-created-first.
    pub fn list(&self) -> Vec<Memory> {
        let mut out = self.records.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Look up a single record by id.
    pub fn get(&self, id: &str) -> Option<Memory> {
        self.records.iter().find(|m| m.id == id).cloned()
    }

    /// Validate a draft and store it as a new record with a fresh id and
    /// creation/update timestamps.
    pub fn create(&mut self, draft: MemoryDraft) -> Result<Memory> {
        draft.validate()?;
        let memory = draft.into_memory(Uuid::new_v4().to_string(), Utc::now());
        self.records.push(memory.clone());
        self.persist()?;
        Ok(memory)
    }

    /// Apply a partial update to an existing record. Distinguishes a
    /// missing id ([`Error::NotFound`]) from a patch that validates badly
    /// ([`Error::Validation`]).
    pub fn update(&mut self, id: &str, patch: &MemoryPatch) -> Result<Memory> {
        let memory = self
            .records
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(Error::NotFound)?;
        patch.apply(memory, Utc::now())?;
        let updated = memory.clone();
        self.persist()?;
        Ok(updated)
    }

    /// Remove a record by id.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.records.len();
        self.records.retain(|m| m.id != id);
        if self.records.len() == before {
            return Err(Error::NotFound);
        }
        self.persist()
    }

    /// Rewrite the backing file. Writes go to a sibling temp file first so
    /// a crash mid-write cannot truncate the collection.
    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(&self.records)
            .map_err(|e| Error::Store(format!("Serialize failed: {e}")))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Tilt;

    fn draft(title: &str) -> MemoryDraft {
        MemoryDraft::journal_page(
            title,
            "Friday, Aug 1, 2025",
            "a story",
            "data:image/png;base64,AAAA".to_string(),
            None,
            Tilt::Left,
        )
    }

    #[test]
    fn create_assigns_id_and_timestamps() {
        let mut store = MemoryStore::ephemeral();
        let memory = store.create(draft("First")).unwrap();
        assert!(!memory.id.is_empty());
        assert_eq!(memory.created_at, memory.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_rejects_invalid_draft() {
        let mut store = MemoryStore::ephemeral();
        let mut bad = draft("ok");
        bad.title = "  ".into();
        assert!(matches!(store.create(bad), Err(Error::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let mut store = MemoryStore::ephemeral();
        let a = store.create(draft("a")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = store.create(draft("b")).unwrap();

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, b.id);
        assert_eq!(listed[1].id, a.id);
    }

    #[test]
    fn update_and_delete_distinguish_not_found() {
        let mut store = MemoryStore::ephemeral();
        let memory = store.create(draft("a")).unwrap();

        assert!(matches!(
            store.update("missing", &MemoryPatch::default()),
            Err(Error::NotFound)
        ));
        assert!(matches!(store.delete("missing"), Err(Error::NotFound)));

        let patch = MemoryPatch {
            story: Some("updated".into()),
            ..MemoryPatch::default()
        };
        let updated = store.update(&memory.id, &patch).unwrap();
        assert_eq!(updated.story, "updated");
        assert!(updated.updated_at >= updated.created_at);

        store.delete(&memory.id).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memories.json");

        {
            let mut store = MemoryStore::open(&path).unwrap();
            store.create(draft("persisted")).unwrap();
        }

        let store = MemoryStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].title, "persisted");
    }

    #[test]
    fn corrupt_store_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memories.json");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(MemoryStore::open(&path), Err(Error::Store(_))));
    }
}
