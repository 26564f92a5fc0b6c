use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteStoreError {
    #[error("note not found: {0}")]
    NotFound(String),
    #[error("a note named '{0}' already exists")]
    DuplicateName(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The backing file exists but is not a JSON array of notes.
    #[error("note store {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("note store I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NoteStoreError {
    /// True for failures of the backing file itself rather than of the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Corrupt { .. } | Self::Io { .. })
    }
}

pub type NoteResult<T> = Result<T, NoteStoreError>;
