//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary vault directory with
//! an [`ImageStore`] over it, plus helpers for producing small rasters and
//! writing picked source files.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

use pixvault::store::ImageStore;

/// Test harness wrapping an [`ImageStore`] backed by a temporary directory.
pub struct TestHarness {
    pub store: ImageStore,
    // Holds the directory open for the lifetime of the harness.
    _temp: TempDir,
}

impl TestHarness {
    /// Create a new harness with a fresh, never-written vault.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let store = ImageStore::new(temp.path().join("vault"));
        Self { store, _temp: temp }
    }

    /// Create a new harness with a custom JPEG quality.
    pub fn with_quality(quality: u8) -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let store = ImageStore::new(temp.path().join("vault")).with_quality(quality);
        Self { store, _temp: temp }
    }

    /// The vault directory backing the store.
    pub fn vault_dir(&self) -> &Path {
        self.store.base_dir()
    }
}

/// A solid-color RGB raster.
pub fn solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
}

/// A solid-color RGBA raster.
pub fn solid_rgba(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// Mean per-channel absolute difference between two rasters of equal size.
///
/// Small for images that differ only by lossy re-encoding.
pub fn mean_channel_delta(a: &DynamicImage, b: &DynamicImage) -> f64 {
    let a = a.to_rgb8();
    let b = b.to_rgb8();
    assert_eq!(a.dimensions(), b.dimensions(), "raster sizes differ");

    let mut total: u64 = 0;
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        for (ca, cb) in pa.0.iter().zip(pb.0.iter()) {
            total += (*ca as i64 - *cb as i64).unsigned_abs();
        }
    }
    total as f64 / (f64::from(a.width()) * f64::from(a.height()) * 3.0)
}

/// Write a small solid-color PNG to `path` for use as a picked file.
pub fn write_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    solid_rgb(width, height, rgb)
        .save_with_format(path, image::ImageFormat::Png)
        .expect("failed to write test png");
}
