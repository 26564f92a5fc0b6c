//! File operations for the note store
//!
//! Decoding/encoding of the persisted JSON array and atomic whole-file writes.

use super::error::{NoteResult, NoteStoreError};
use super::types::Note;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Contents of a freshly initialized store
pub const EMPTY_COLLECTION: &str = "[]";

fn io_error(path: &Path, source: io::Error) -> NoteStoreError {
    NoteStoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Sibling temp path used for write-then-rename (e.g. "notes.json" -> "notes.json.tmp")
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Decode the persisted collection. A literal `null` document counts as empty.
pub fn decode_notes(path: &Path, raw: &[u8]) -> NoteResult<Vec<Note>> {
    serde_json::from_slice::<Option<Vec<Note>>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|source| NoteStoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

/// Encode the collection as a single compact JSON array
pub fn encode_notes(path: &Path, notes: &[Note]) -> NoteResult<Vec<u8>> {
    serde_json::to_vec(notes).map_err(|e| io_error(path, e.into()))
}

/// Read and decode the whole collection
pub async fn read_notes(path: &Path) -> NoteResult<Vec<Note>> {
    let raw = fs::read(path).await.map_err(|e| io_error(path, e))?;
    decode_notes(path, &raw)
}

/// Replace the file contents atomically: write a temp sibling, fsync, rename over.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> NoteResult<()> {
    let tmp = temp_path(path);

    let written: io::Result<()> = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        Ok(())
    }
    .await;

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp).await;
        return Err(io_error(&tmp, e));
    }

    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(io_error(path, e));
    }

    Ok(())
}

/// Encode and atomically persist the whole collection
pub async fn write_notes(path: &Path, notes: &[Note]) -> NoteResult<()> {
    let contents = encode_notes(path, notes)?;
    write_atomic(path, &contents).await
}

/// Create the backing file holding an empty array if it does not exist yet.
/// Returns true when the file was created.
pub async fn ensure_store_file(path: &Path) -> NoteResult<bool> {
    if fs::try_exists(path).await.map_err(|e| io_error(path, e))? {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }
    }

    write_atomic(path, EMPTY_COLLECTION.as_bytes()).await?;
    Ok(true)
}
