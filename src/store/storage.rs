//! Filesystem-backed image store.
//!
//! One file per identifier, all in a single flat directory. The file name
//! is exactly the identifier, so identifiers are restricted to strings that
//! can name a directory entry. Writes encode to memory first and land on
//! disk in a single `fs::write`, so a failed encode never leaves a
//! truncated file behind.

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::StoreError;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Metadata about an image that was just written to the vault.
#[derive(Debug, Clone)]
pub struct SavedImage {
    /// Path of the file that was written.
    pub path: PathBuf,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Encoded size in bytes.
    pub bytes: u64,
}

/// One row of the vault listing.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEntry {
    /// The identifier, equal to the file name.
    pub id: String,
    /// Encoded size in bytes.
    pub bytes: u64,
    /// Last modification time, if the filesystem reports one.
    pub modified: Option<DateTime<Utc>>,
}

/// Flat-directory image store mapping identifiers to JPEG files.
///
/// The vault directory is created lazily by the first successful
/// [`put`](Self::put); `get` and `list` treat a missing directory as an
/// empty store. Operations are driven one at a time by the single-threaded
/// surfaces above this module, so no locking is layered on top of the
/// filesystem.
#[derive(Debug, Clone)]
pub struct ImageStore {
    base_dir: PathBuf,
    quality: u8,
}

impl ImageStore {
    /// Create a store rooted at `base_dir` with the default JPEG quality.
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the JPEG quality used for future writes.
    ///
    /// Values outside 1-100 are clamped.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// The vault directory this store reads and writes.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file a valid identifier maps to.
    pub fn entry_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self.base_dir.join(id))
    }

    /// Store a raster under `id`, replacing any existing record.
    ///
    /// The raster is flattened to RGB (JPEG carries no alpha channel),
    /// encoded at the configured quality, and written in one step. Last
    /// write wins; there is no versioning.
    pub fn put(&self, id: &str, image: &DynamicImage) -> Result<SavedImage, StoreError> {
        let path = self.entry_path(id)?;

        let rgb = image.to_rgb8();
        let mut buf = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buf, self.quality);
        rgb.write_with_encoder(encoder).map_err(StoreError::Encode)?;
        let data = buf.into_inner();

        fs::create_dir_all(&self.base_dir)?;
        fs::write(&path, &data)?;
        debug!(
            "stored {:?}: {}x{}, {} bytes",
            id,
            rgb.width(),
            rgb.height(),
            data.len()
        );

        Ok(SavedImage {
            path,
            width: rgb.width(),
            height: rgb.height(),
            bytes: data.len() as u64,
        })
    }

    /// Retrieve the raster stored under `id`.
    ///
    /// Returns `Ok(None)` when no record exists. Stored bytes that no
    /// longer decode report [`StoreError::Decode`], which is distinct from
    /// the record being absent.
    pub fn get(&self, id: &str) -> Result<Option<DynamicImage>, StoreError> {
        let path = self.entry_path(id)?;
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no record for {:?}", id);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let image = image::load_from_memory(&data).map_err(|source| StoreError::Decode {
            id: id.to_string(),
            source,
        })?;
        debug!("loaded {:?}: {}x{}", id, image.width(), image.height());
        Ok(Some(image))
    }

    /// Whether a record exists under `id`.
    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.entry_path(id)?.exists())
    }

    /// List all stored records, sorted by identifier.
    ///
    /// The directory listing is the index: there is no manifest to consult
    /// or repair. A vault that has never been written to lists as empty.
    pub fn list(&self) -> Result<Vec<StoredEntry>, StoreError> {
        let read_dir = match fs::read_dir(&self.base_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let id = match entry.file_name().into_string() {
                Ok(id) => id,
                Err(name) => {
                    // The store only writes UTF-8 names; skip foreign files.
                    warn!("skipping non-UTF-8 entry {:?}", name);
                    continue;
                }
            };
            let meta = entry.metadata()?;
            let modified = meta.modified().ok().map(DateTime::<Utc>::from);
            entries.push(StoredEntry {
                id,
                bytes: meta.len(),
                modified,
            });
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }
}

/// Check that an identifier can name a file inside the vault directory.
///
/// Runs before any filesystem access, so a rejected identifier never
/// creates the vault directory or touches disk.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() {
        return Err(StoreError::EmptyId);
    }
    if id == "." || id == ".." {
        return Err(StoreError::InvalidId {
            id: id.to_string(),
            reason: "id cannot be a directory reference",
        });
    }
    if id.contains(['/', '\\']) {
        return Err(StoreError::InvalidId {
            id: id.to_string(),
            reason: "id cannot contain path separators",
        });
    }
    if id.contains('\0') {
        return Err(StoreError::InvalidId {
            id: id.to_string(),
            reason: "id cannot contain NUL bytes",
        });
    }
    Ok(())
}
