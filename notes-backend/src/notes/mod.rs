//! Notes system: named text notes persisted as a single JSON array on disk
//!
//! Every request re-reads the backing file; mutations rewrite it whole.
//! `NoteStore` serializes mutations so concurrent handlers never lose updates.

pub mod error;
pub mod file_ops;
pub mod store;
pub mod types;

pub use error::NoteStoreError;
pub use store::NoteStore;
pub use types::Note;
