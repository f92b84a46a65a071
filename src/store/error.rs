//! Error types for the local image store.

use std::io;

/// Errors produced by [`ImageStore`](super::ImageStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The identifier was empty.
    #[error("image id cannot be empty")]
    EmptyId,

    /// The identifier cannot name a file inside the vault directory.
    #[error("invalid image id {id:?}: {reason}")]
    InvalidId {
        id: String,
        reason: &'static str,
    },

    /// A filesystem operation on the vault failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The raster could not be encoded with the storage codec.
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The stored bytes for an identifier are not a decodable image.
    #[error("stored data for {id:?} is not a decodable image: {source}")]
    Decode {
        id: String,
        source: image::ImageError,
    },
}
