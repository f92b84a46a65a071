mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = ["./pixvault.toml", "~/.config/pixvault/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Pick the directory the store runs over.
///
/// An explicit `storage.data_dir` wins. Otherwise the store lives in a
/// per-user data directory, falling back to a dot directory under the
/// home directory on platforms without one.
pub fn resolve_data_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.storage.data_dir {
        let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
        return Ok(PathBuf::from(expanded));
    }

    if let Some(base) = dirs::data_dir() {
        return Ok(base.join("pixvault").join("images"));
    }
    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".pixvault").join("images"));
    }
    anyhow::bail!("could not determine a data directory, set storage.data_dir in the config")
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    let quality = config.storage.jpeg_quality;
    if quality == 0 || quality > 100 {
        anyhow::bail!(
            "storage.jpeg_quality must be between 1 and 100, got {}",
            quality
        );
    }

    Ok(())
}
