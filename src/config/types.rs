use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::DEFAULT_JPEG_QUALITY;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the stored images. Defaults to a per-user data
    /// directory when unset. A leading `~` is expanded.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// JPEG quality for stored images, 1-100 (default: 90)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            jpeg_quality: default_jpeg_quality(),
        }
    }
}
