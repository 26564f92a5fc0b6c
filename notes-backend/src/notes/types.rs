use serde::{Deserialize, Serialize};

/// A single stored note. `note_name` is the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note_name: String,
    pub note: String,
}

impl Note {
    pub fn new(note_name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            note_name: note_name.into(),
            note: note.into(),
        }
    }
}
