//! Image source loading.
//!
//! The picker lives outside this program: a file manager, a shell glob, or
//! another tool hands over the path of the image the user chose. This
//! module turns that reference into a decoded raster. Read access is
//! confirmed as an explicit precondition before the file is consumed, so
//! "you cannot read this" and "this is not an image" stay distinguishable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::debug;

/// Errors produced while loading a picked image.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No file exists at the picked path.
    #[error("no file at {0:?}")]
    NotFound(PathBuf),

    /// The picked file exists but read access is denied.
    #[error("read access to {0:?} is denied")]
    AccessDenied(PathBuf),

    /// Reading the picked file failed.
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        source: io::Error,
    },

    /// The picked file is not a decodable image.
    #[error("{path:?} is not a decodable image: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// A decoded raster together with where it came from.
#[derive(Debug)]
pub struct LoadedImage {
    /// The decoded pixel data.
    pub image: DynamicImage,
    /// The file the raster was decoded from.
    pub origin: PathBuf,
}

/// Confirm read access to a picked file before consuming it.
///
/// This is the one capability check gating every open: the file must exist
/// and be readable by the current user.
pub fn check_read_access(path: &Path) -> Result<(), SourceError> {
    match fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) => Err(access_error(path, e)),
    }
}

/// Load and decode the image the user picked.
///
/// The decoder sniffs the content rather than trusting the extension, so
/// extensionless files and mislabeled formats still decode.
pub fn load(path: &Path) -> Result<LoadedImage, SourceError> {
    check_read_access(path)?;
    let data = fs::read(path).map_err(|e| access_error(path, e))?;
    let image = image::load_from_memory(&data).map_err(|source| SourceError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "decoded {}x{} raster from {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(LoadedImage {
        image,
        origin: path.to_path_buf(),
    })
}

fn access_error(path: &Path, source: io::Error) -> SourceError {
    match source.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => SourceError::AccessDenied(path.to_path_buf()),
        _ => SourceError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}
