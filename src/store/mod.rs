//! Local image store.
//!
//! Maps user-chosen string identifiers to JPEG-compressed files in one flat
//! vault directory. There is no manifest and no database: the directory
//! listing itself is the index.

mod error;
mod storage;

pub use error::StoreError;
pub use storage::{validate_id, ImageStore, SavedImage, StoredEntry, DEFAULT_JPEG_QUALITY};
