//! NoteStore: JSON-file note storage
//!
//! Owns the backing file exclusively. Each mutation holds the write lock
//! across its load-modify-write cycle, so two overlapping requests can never
//! both modify the same snapshot. Reads share the read lock and therefore
//! never observe a write in progress.

use super::error::{NoteResult, NoteStoreError};
use super::file_ops;
use super::types::Note;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub struct NoteStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl NoteStore {
    /// Open the store at `path`, creating the file with an empty array if absent.
    pub async fn open(path: impl Into<PathBuf>) -> NoteResult<Self> {
        let path = path.into();

        if file_ops::ensure_store_file(&path).await? {
            log::info!("[NOTES] Created empty note store at {}", path.display());
        } else {
            log::info!("[NOTES] Using existing note store at {}", path.display());
        }

        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every note in file order
    pub async fn load_all(&self) -> NoteResult<Vec<Note>> {
        let _guard = self.lock.read().await;
        file_ops::read_notes(&self.path).await
    }

    /// First note whose name matches exactly
    pub async fn find_by_name(&self, name: &str) -> NoteResult<Note> {
        let _guard = self.lock.read().await;
        file_ops::read_notes(&self.path)
            .await?
            .into_iter()
            .find(|note| note.note_name == name)
            .ok_or_else(|| NoteStoreError::NotFound(name.to_string()))
    }

    /// Append a new note. Fails if the name is blank or already taken.
    pub async fn insert(&self, name: &str, body: &str) -> NoteResult<()> {
        require_name(name)?;

        let _guard = self.lock.write().await;
        let mut notes = file_ops::read_notes(&self.path).await?;

        if notes.iter().any(|note| note.note_name == name) {
            return Err(NoteStoreError::DuplicateName(name.to_string()));
        }

        notes.push(Note::new(name, body));
        file_ops::write_notes(&self.path, &notes).await
    }

    /// Replace the body of an existing note, leaving every other note untouched.
    pub async fn update(&self, name: &str, body: &str) -> NoteResult<()> {
        require_name(name)?;

        let _guard = self.lock.write().await;
        let mut notes = file_ops::read_notes(&self.path).await?;

        let note = notes
            .iter_mut()
            .find(|note| note.note_name == name)
            .ok_or_else(|| NoteStoreError::NotFound(name.to_string()))?;
        note.note = body.to_string();

        file_ops::write_notes(&self.path, &notes).await
    }

    /// Remove the first note with this name
    pub async fn delete(&self, name: &str) -> NoteResult<()> {
        let _guard = self.lock.write().await;
        let mut notes = file_ops::read_notes(&self.path).await?;

        let index = notes
            .iter()
            .position(|note| note.note_name == name)
            .ok_or_else(|| NoteStoreError::NotFound(name.to_string()))?;
        notes.remove(index);

        file_ops::write_notes(&self.path, &notes).await
    }
}

fn require_name(name: &str) -> NoteResult<()> {
    if name.trim().is_empty() {
        return Err(NoteStoreError::InvalidInput(
            "note name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    async fn store_with(notes: &[Note]) -> (TempDir, NoteStore) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        if !notes.is_empty() {
            std::fs::write(&path, serde_json::to_vec(notes).unwrap()).unwrap();
        }
        let store = NoteStore::open(path).await.expect("Failed to open store");
        (dir, store)
    }

    fn ab() -> Vec<Note> {
        vec![Note::new("a", "1"), Note::new("b", "2")]
    }

    #[tokio::test]
    async fn test_open_initializes_empty_file() {
        let (_dir, store) = store_with(&[]).await;
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_all_is_idempotent() {
        let (_dir, store) = store_with(&ab()).await;
        let first = store.load_all().await.unwrap();
        let second = store.load_all().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, ab());
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let (_dir, store) = store_with(&[]).await;
        store.insert("a", "hello").await.unwrap();

        let note = store.find_by_name("a").await.unwrap();
        assert_eq!(note.note, "hello");
    }

    #[tokio::test]
    async fn test_find_missing_is_not_found() {
        let (_dir, store) = store_with(&ab()).await;
        let err = store.find_by_name("zzz").await.unwrap_err();
        assert!(matches!(err, NoteStoreError::NotFound(name) if name == "zzz"));
    }

    #[tokio::test]
    async fn test_insert_appends_in_order() {
        let (_dir, store) = store_with(&ab()).await;
        store.insert("c", "").await.unwrap();

        let names: Vec<String> = store
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.note_name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let (_dir, store) = store_with(&[]).await;
        store.insert("a", "x").await.unwrap();

        let err = store.insert("a", "x").await.unwrap_err();
        assert!(matches!(err, NoteStoreError::DuplicateName(_)));

        let notes = store.load_all().await.unwrap();
        assert_eq!(notes.iter().filter(|n| n.note_name == "a").count(), 1);
    }

    #[tokio::test]
    async fn test_insert_blank_name_rejected() {
        let (_dir, store) = store_with(&[]).await;
        let err = store.insert("  ", "x").await.unwrap_err();
        assert!(matches!(err, NoteStoreError::InvalidInput(_)));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_only_target() {
        let (_dir, store) = store_with(&ab()).await;
        store.update("a", "9").await.unwrap();
        assert_eq!(
            store.load_all().await.unwrap(),
            vec![Note::new("a", "9"), Note::new("b", "2")]
        );
    }

    #[tokio::test]
    async fn test_update_missing_leaves_collection() {
        let (_dir, store) = store_with(&ab()).await;
        let err = store.update("c", "x").await.unwrap_err();
        assert!(matches!(err, NoteStoreError::NotFound(_)));
        assert_eq!(store.load_all().await.unwrap(), ab());
    }

    #[tokio::test]
    async fn test_update_empty_name_is_invalid() {
        let (_dir, store) = store_with(&ab()).await;
        let err = store.update("", "text").await.unwrap_err();
        assert!(matches!(err, NoteStoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let (_dir, store) = store_with(&ab()).await;
        store.delete("a").await.unwrap();
        assert_eq!(store.load_all().await.unwrap(), vec![Note::new("b", "2")]);
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_collection() {
        let (_dir, store) = store_with(&ab()).await;
        let err = store.delete("c").await.unwrap_err();
        assert!(matches!(err, NoteStoreError::NotFound(_)));
        assert_eq!(store.load_all().await.unwrap(), ab());
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_every_operation() {
        let (_dir, store) = store_with(&[]).await;
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.load_all().await.unwrap_err(),
            NoteStoreError::Corrupt { .. }
        ));
        assert!(store.find_by_name("a").await.unwrap_err().is_internal());
        assert!(store.insert("a", "x").await.unwrap_err().is_internal());
        assert!(store.update("a", "x").await.unwrap_err().is_internal());
        assert!(store.delete("a").await.unwrap_err().is_internal());

        // Never auto-repaired
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_lose_nothing() {
        let (_dir, store) = store_with(&[]).await;
        let store = Arc::new(store);

        let (first, second) = tokio::join!(store.insert("left", "1"), store.insert("right", "2"));
        first.unwrap();
        second.unwrap();

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(&format!("note-{}", i), "body").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let notes = store.load_all().await.unwrap();
        assert_eq!(notes.len(), 34);
        assert!(notes.iter().any(|n| n.note_name == "left"));
        assert!(notes.iter().any(|n| n.note_name == "right"));
        for i in 0..32 {
            let name = format!("note-{}", i);
            assert!(notes.iter().any(|n| n.note_name == name));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_update_and_delete_serialize() {
        let (_dir, store) = store_with(&ab()).await;
        let store = Arc::new(store);

        let updater = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.update("b", "changed").await })
        };
        let deleter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.delete("a").await })
        };
        updater.await.unwrap().unwrap();
        deleter.await.unwrap().unwrap();

        assert_eq!(
            store.load_all().await.unwrap(),
            vec![Note::new("b", "changed")]
        );
    }
}
